use axum::{
    routing::{get, post, put},
    Router,
};

use crate::handlers;

/// Конфигурация всех роутов приложения
pub fn configure_routes() -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // PRICING
        // ========================================
        // A001 Pricing category handlers
        .route(
            "/api/pricing/categories",
            get(handlers::a001_pricing_category::list_all)
                .post(handlers::a001_pricing_category::create),
        )
        .route(
            "/api/pricing/categories/:id",
            get(handlers::a001_pricing_category::get_by_id)
                .patch(handlers::a001_pricing_category::patch)
                .delete(handlers::a001_pricing_category::delete),
        )
        .route(
            "/api/pricing/categories/:id/vehicles",
            post(handlers::a001_pricing_category::add_vehicles)
                .delete(handlers::a001_pricing_category::remove_vehicles),
        )
        .route(
            "/api/pricing/categories/:id/service-types",
            put(handlers::a001_pricing_category::replace_service_types),
        )
        // A002 Service type handlers
        .route(
            "/api/pricing/service-types",
            get(handlers::a002_service_type::list_all).post(handlers::a002_service_type::create),
        )
        .route(
            "/api/pricing/testdata",
            post(handlers::a001_pricing_category::insert_test_data),
        )
        // ========================================
        // SYSTEM
        // ========================================
        .route(
            "/api/logs",
            get(handlers::logs::list_all)
                .post(handlers::logs::create)
                .delete(handlers::logs::clear_all),
        )
}

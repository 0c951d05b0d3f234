use axum::{extract::Path, http::StatusCode, Json};
use contracts::domain::a001_pricing_category::aggregate::{
    PricingCategory, PricingCategoryDto, PricingCategoryId, PricingCategoryPatch,
    ServiceTypeLinksDto, VehicleLinksDto,
};
use contracts::domain::common::AggregateId;

use crate::domain::a001_pricing_category;
use crate::shared::data::db::get_connection;
use crate::shared::error::{ServiceError, ServiceResult};

fn parse_id(id: &str) -> ServiceResult<PricingCategoryId> {
    PricingCategoryId::from_string(id)
        .map_err(|_| ServiceError::Validation(format!("Invalid category id: {}", id)))
}

/// GET /api/pricing/categories
pub async fn list_all() -> ServiceResult<Json<Vec<PricingCategory>>> {
    let items = a001_pricing_category::service::list_all(get_connection()).await?;
    Ok(Json(items))
}

/// GET /api/pricing/categories/:id
pub async fn get_by_id(Path(id): Path<String>) -> ServiceResult<Json<PricingCategory>> {
    let id = parse_id(&id)?;
    let item = a001_pricing_category::service::get_by_id(get_connection(), id).await?;
    Ok(Json(item))
}

/// POST /api/pricing/categories
pub async fn create(
    Json(dto): Json<PricingCategoryDto>,
) -> ServiceResult<(StatusCode, Json<PricingCategory>)> {
    let item = a001_pricing_category::service::create(get_connection(), dto).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// PATCH /api/pricing/categories/:id
pub async fn patch(
    Path(id): Path<String>,
    Json(patch): Json<PricingCategoryPatch>,
) -> ServiceResult<Json<PricingCategory>> {
    let id = parse_id(&id)?;
    let item = a001_pricing_category::service::patch(get_connection(), id, patch).await?;
    Ok(Json(item))
}

/// DELETE /api/pricing/categories/:id
pub async fn delete(Path(id): Path<String>) -> ServiceResult<StatusCode> {
    let id = parse_id(&id)?;
    a001_pricing_category::service::delete(get_connection(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/pricing/categories/:id/vehicles
pub async fn add_vehicles(
    Path(id): Path<String>,
    Json(dto): Json<VehicleLinksDto>,
) -> ServiceResult<Json<PricingCategory>> {
    let id = parse_id(&id)?;
    let item =
        a001_pricing_category::service::add_vehicles(get_connection(), id, dto.vehicle_ids)
            .await?;
    Ok(Json(item))
}

/// DELETE /api/pricing/categories/:id/vehicles
pub async fn remove_vehicles(
    Path(id): Path<String>,
    Json(dto): Json<VehicleLinksDto>,
) -> ServiceResult<Json<PricingCategory>> {
    let id = parse_id(&id)?;
    let item =
        a001_pricing_category::service::remove_vehicles(get_connection(), id, dto.vehicle_ids)
            .await?;
    Ok(Json(item))
}

/// PUT /api/pricing/categories/:id/service-types
pub async fn replace_service_types(
    Path(id): Path<String>,
    Json(dto): Json<ServiceTypeLinksDto>,
) -> ServiceResult<Json<PricingCategory>> {
    let id = parse_id(&id)?;
    let item = a001_pricing_category::service::replace_service_types(
        get_connection(),
        id,
        dto.service_type_ids,
    )
    .await?;
    Ok(Json(item))
}

/// POST /api/pricing/testdata
pub async fn insert_test_data() -> ServiceResult<Json<Vec<PricingCategory>>> {
    let items = a001_pricing_category::service::insert_test_data(get_connection()).await?;
    Ok(Json(items))
}

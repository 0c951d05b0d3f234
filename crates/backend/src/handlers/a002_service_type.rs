use axum::{http::StatusCode, Json};
use contracts::domain::a002_service_type::aggregate::{ServiceType, ServiceTypeDto};

use crate::domain::a002_service_type;
use crate::shared::data::db::get_connection;
use crate::shared::error::ServiceResult;

/// GET /api/pricing/service-types
pub async fn list_all() -> ServiceResult<Json<Vec<ServiceType>>> {
    let items = a002_service_type::service::list_all(get_connection()).await?;
    Ok(Json(items))
}

/// POST /api/pricing/service-types
pub async fn create(
    Json(dto): Json<ServiceTypeDto>,
) -> ServiceResult<(StatusCode, Json<ServiceType>)> {
    let item = a002_service_type::service::create(get_connection(), dto).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

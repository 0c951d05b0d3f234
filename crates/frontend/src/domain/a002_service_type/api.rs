use contracts::domain::a002_service_type::aggregate::ServiceType;
use gloo_net::http::Request;

use crate::shared::api_utils::api_url;

/// Получить список типов услуг (для бейджей и формы категории)
pub async fn list_service_types() -> Result<Vec<ServiceType>, String> {
    let response = Request::get(&api_url("/api/pricing/service-types"))
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;

    if !response.ok() {
        return Err(format!("HTTP error: {}", response.status()));
    }

    response
        .json()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

use async_trait::async_trait;
use contracts::domain::a001_pricing_category::aggregate::{
    PricingCategory, PricingCategoryDto, PricingCategoryId, PricingCategoryPatch,
};
use gloo_net::http::{Request, Response};

use super::reorder::CategoryStore;
use crate::shared::api_utils::api_url;

const API_BASE: &str = "/api/pricing/categories";

fn item_url(id: PricingCategoryId) -> String {
    api_url(&format!("{}/{}", API_BASE, id))
}

async fn read_json<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, String> {
    if !response.ok() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(error_message(status, &body));
    }
    response
        .json()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

/// Текст ошибки из тела `{"error": "..."}`, иначе код HTTP
fn error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or_else(|| format!("HTTP error: {}", status))
}

/// Получить все категории (порядок задает сервер)
pub async fn list_categories() -> Result<Vec<PricingCategory>, String> {
    let response = Request::get(&api_url(API_BASE))
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;
    read_json(response).await
}

pub async fn get_category(id: PricingCategoryId) -> Result<PricingCategory, String> {
    let response = Request::get(&item_url(id))
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;
    read_json(response).await
}

pub async fn create_category(dto: &PricingCategoryDto) -> Result<PricingCategory, String> {
    let response = Request::post(&api_url(API_BASE))
        .json(dto)
        .map_err(|e| format!("Failed to serialize request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;
    read_json(response).await
}

/// PATCH только заданных полей
pub async fn patch_category(
    id: PricingCategoryId,
    patch: &PricingCategoryPatch,
) -> Result<PricingCategory, String> {
    let response = Request::patch(&item_url(id))
        .json(patch)
        .map_err(|e| format!("Failed to serialize request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;
    read_json(response).await
}

pub async fn delete_category(id: PricingCategoryId) -> Result<(), String> {
    let response = Request::delete(&item_url(id))
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;
    if !response.ok() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(error_message(status, &body));
    }
    Ok(())
}

/// Хранилище категорий поверх HTTP API
#[derive(Clone, Copy, Default)]
pub struct HttpCategoryStore;

#[async_trait(?Send)]
impl CategoryStore for HttpCategoryStore {
    async fn list(&self) -> Result<Vec<PricingCategory>, String> {
        list_categories().await
    }

    async fn update_sort_order(
        &self,
        id: PricingCategoryId,
        sort_order: i32,
    ) -> Result<Option<PricingCategory>, String> {
        patch_category(id, &PricingCategoryPatch::sort_order_only(sort_order))
            .await
            .map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_server_text() {
        assert_eq!(
            error_message(404, r#"{"error":"Pricing category x not found"}"#),
            "Pricing category x not found"
        );
        assert_eq!(error_message(500, "<html>"), "HTTP error: 500");
    }
}

use contracts::shared::logger::CreateLogRequest;
use gloo_net::http::Request;

use super::api_utils::api_url;

/// Отправить запись в серверный лог (`POST /api/logs`).
/// Ошибка отправки только пишется в консоль.
pub fn report(category: &str, message: &str) {
    let request = CreateLogRequest::client(category, message);
    wasm_bindgen_futures::spawn_local(async move {
        if let Err(e) = send(&request).await {
            log::warn!("Failed to forward client log: {}", e);
        }
    });
}

/// Ошибка: в консоль браузера и на сервер
pub fn report_error(category: &str, message: &str) {
    log::error!("[{}] {}", category, message);
    report(category, message);
}

async fn send(request: &CreateLogRequest) -> Result<(), String> {
    let response = Request::post(&api_url("/api/logs"))
        .json(request)
        .map_err(|e| format!("Failed to serialize log entry: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;

    if !response.ok() {
        return Err(format!("HTTP error: {}", response.status()));
    }
    Ok(())
}

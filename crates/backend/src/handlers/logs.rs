use axum::http::StatusCode;
use axum::Json;
use contracts::shared::logger::{CreateLogRequest, LogEntry};

use crate::shared::data::db::get_connection;
use crate::shared::logger;

/// GET /api/logs
pub async fn list_all() -> Result<Json<Vec<LogEntry>>, StatusCode> {
    match logger::repository::get_all_logs(get_connection()).await {
        Ok(logs) => Ok(Json(logs)),
        Err(e) => {
            tracing::error!("Failed to read logs: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// POST /api/logs
pub async fn create(Json(req): Json<CreateLogRequest>) -> StatusCode {
    match logger::repository::log_event(get_connection(), &req.source, &req.category, &req.message)
        .await
    {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::error!("Failed to write log entry: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// DELETE /api/logs
pub async fn clear_all() -> StatusCode {
    match logger::repository::clear_all_logs(get_connection()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

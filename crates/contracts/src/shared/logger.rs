use serde::{Deserialize, Serialize};

/// Запись диагностического лога
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: i64,
    pub timestamp: String,
    pub source: String, // "client" или "server"
    pub category: String,
    pub message: String,
}

/// DTO для создания новой записи лога
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLogRequest {
    pub source: String,
    pub category: String,
    pub message: String,
}

impl CreateLogRequest {
    /// Запись, отправленная из браузера
    pub fn client(category: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            source: "client".to_string(),
            category: category.into(),
            message: message.into(),
        }
    }
}

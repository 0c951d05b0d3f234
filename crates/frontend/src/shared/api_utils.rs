//! API utilities for frontend-backend communication

/// Порт backend-сервера (см. `[server] port` в config.toml)
pub const BACKEND_PORT: u16 = 3000;

/// Get the base URL for API requests
///
/// Берется протокол и хост текущей страницы, порт всегда backend-а.
/// Пустая строка, если `window` недоступен (тогда запросы идут на
/// относительный путь).
pub fn api_base() -> String {
    let Some(window) = web_sys::window() else {
        return String::new();
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    format!("{}//{}:{}", protocol, hostname, BACKEND_PORT)
}

/// Build a full API URL from a path ("/api/...")
pub fn api_url(path: &str) -> String {
    format!("{}{}", api_base(), path)
}

pub mod api_utils;
pub mod client_log;

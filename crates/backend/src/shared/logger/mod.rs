pub mod repository;

use contracts::domain::common::AggregateRoot;
use repository::log_event_internal;

/// Системное событие сервера (старт, конфигурация)
pub fn log(category: &str, message: &str) {
    log_event_internal("server", category, message);
}

/// Событие агрегата; категория записи — `full_name()` агрегата,
/// например `a001_pricing_category`
pub fn log_for<A: AggregateRoot>(message: &str) {
    log(&A::full_name(), message);
}

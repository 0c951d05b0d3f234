//! Общие типы для backend и frontend: агрегаты, DTO и чистая логика,
//! которая должна работать одинаково по обе стороны HTTP.

pub mod domain;
pub mod shared;
pub mod usecases;

pub mod a001_pricing_category;
pub mod a002_service_type;

pub mod aggregate;
pub mod reorder;

pub mod api;
pub mod reorder;
pub mod ui;

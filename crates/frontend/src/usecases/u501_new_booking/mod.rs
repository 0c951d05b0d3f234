pub mod view;

pub use view::ServiceDuration;

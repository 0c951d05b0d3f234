pub mod service_duration;

use crate::usecases::common::UseCaseMetadata;

/// Мастер создания бронирования
pub struct NewBooking;

impl UseCaseMetadata for NewBooking {
    fn usecase_index() -> &'static str {
        "u501"
    }

    fn usecase_name() -> &'static str {
        "new_booking"
    }

    fn display_name() -> &'static str {
        "New booking"
    }
}

pub mod u501_new_booking;

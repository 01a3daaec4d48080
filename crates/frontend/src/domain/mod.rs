pub mod a001_booking;
pub mod a002_discount;
pub mod a003_review;
pub mod a004_room;

pub mod aggregate;
pub mod stats;

pub use aggregate::*;
pub use stats::BookingStats;

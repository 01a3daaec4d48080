mod view;
mod view_model;

pub use view::BookingDetails;
pub use view_model::BookingDetailsViewModel;

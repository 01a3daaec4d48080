pub mod dialog;
pub mod pagination_controls;
pub mod sort_header;
pub mod stat_card;
pub mod status_badge;
pub mod table_checkbox;

pub mod config;
pub mod dates;
pub mod envelope;
pub mod error;
pub mod export;
pub mod format;
pub mod severity;

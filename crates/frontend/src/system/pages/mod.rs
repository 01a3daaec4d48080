pub mod access_denied;
pub mod login;

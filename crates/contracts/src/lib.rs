//! Shared contracts between the hotel front-end and its REST backend.
//!
//! Everything here is plain data plus the pure rules the UI relies on
//! (discount evaluation, booking statistics, permissions, export encoding).

pub mod dashboards;
pub mod domain;
pub mod shared;
pub mod system;

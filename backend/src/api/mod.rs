//! API module
//!
//! Contains HTTP request handlers for the booking endpoints and the health check

pub mod bookings;
pub mod extract;
pub mod health;

pub use extract::{LenientQuery, ValidId};

//! Database module
//!
//! SQLite-backed storage for bookings plus the employee and service lookups
//! used for referential checks.

pub mod bookings;
pub mod directory;

pub use bookings::BookingDb;

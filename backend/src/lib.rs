//! Clinic Bookings Library
//!
//! Booking resource handling for a clinic backend: validation, referential
//! checks against employees and services, persistence and status mapping.
//! The server binary is in `src/main.rs`.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod logger;
pub mod models;
pub mod router;
/// Shared handler state
pub mod state;

pub use router::create_router;

//! Data models
//!
//! Booking records, the employee/service lookups they reference, record
//! identifiers, and listing/search query types.

pub mod booking;
pub mod directory;
pub mod ids;
pub mod query;

pub use booking::{Booking, BookingUpdate, NewBooking, BOOKING_ID_PREFIX};
pub use directory::{DirectorySeed, Employee, Service};
pub use ids::{generate_id, InvalidObjectId, ObjectId};
pub use query::{ListParams, ListQuery, SearchParams, SearchQuery, SortField, SortOrder};

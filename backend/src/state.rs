//! Shared handler state

use crate::db::BookingDb;
use std::sync::Arc;

/// State handed to every handler; cheap to clone
#[derive(Clone)]
pub struct AppState {
    /// Booking store and its lookups
    pub db: Arc<BookingDb>,
}

impl AppState {
    /// Wrap an open database
    pub fn new(db: BookingDb) -> Self {
        Self { db: Arc::new(db) }
    }
}

//! Record identifiers
//!
//! Every stored record is keyed by an [`ObjectId`]: 12 bytes rendered as 24
//! lowercase hex characters (4 bytes of big-endian Unix seconds followed by
//! 8 random bytes). Bookings additionally carry a human-facing booking
//! identifier produced by [`generate_id`].

use chrono::Utc;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Length of an object identifier in hex characters
pub const OBJECT_ID_LEN: usize = 24;

/// Number of random characters appended to a booking identifier prefix
const GENERATED_ID_SUFFIX_LEN: usize = 10;

/// Returned when a string is not a well-formed object identifier
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid object id: {0:?}")]
pub struct InvalidObjectId(pub String);

/// Record key shared by bookings, employees and services
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, sqlx::Type)]
#[sqlx(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    /// Generate a fresh identifier from the current time and random bytes
    pub fn new() -> Self {
        let seconds = Utc::now().timestamp() as u32;
        let random = Uuid::new_v4();

        let mut hex = String::with_capacity(OBJECT_ID_LEN);
        for byte in seconds
            .to_be_bytes()
            .iter()
            .chain(random.as_bytes()[8..].iter())
        {
            hex.push_str(&format!("{:02x}", byte));
        }

        Self(hex)
    }

    /// Check whether `candidate` is exactly 24 hex characters
    pub fn is_valid(candidate: &str) -> bool {
        candidate.len() == OBJECT_ID_LEN && candidate.bytes().all(|b| b.is_ascii_hexdigit())
    }

    /// Borrow the hex representation
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for ObjectId {
    type Err = InvalidObjectId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if Self::is_valid(s) {
            Ok(Self(s.to_ascii_lowercase()))
        } else {
            Err(InvalidObjectId(s.to_string()))
        }
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Generate a booking-style identifier: `prefix` followed by ten uppercase
/// alphanumeric characters.
///
/// Uniqueness is not checked here; the store rejects duplicates.
pub fn generate_id(prefix: &str) -> String {
    let suffix: String = Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(GENERATED_ID_SUFFIX_LEN)
        .collect();
    format!("{}{}", prefix, suffix.to_ascii_uppercase())
}

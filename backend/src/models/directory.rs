//! Employee and service records
//!
//! Bookings only read these: a receptionist must be a known employee and a
//! booked service must be a known service.

use crate::models::ids::ObjectId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A clinic employee (receptionists, staff)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Employee {
    /// Record key
    #[serde(rename = "_id", default)]
    pub id: ObjectId,
    /// Display name
    pub name: String,
    /// Job role, e.g. "receptionist"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl Employee {
    /// Create an employee with a fresh key
    pub fn new(name: impl Into<String>, role: Option<String>) -> Self {
        Self {
            id: ObjectId::new(),
            name: name.into(),
            role,
        }
    }
}

/// A bookable clinic service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Service {
    /// Record key
    #[serde(rename = "_id", default)]
    pub id: ObjectId,
    /// Display name
    pub name: String,
    /// List price
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

impl Service {
    /// Create a service with a fresh key
    pub fn new(name: impl Into<String>, price: Option<f64>) -> Self {
        Self {
            id: ObjectId::new(),
            name: name.into(),
            price,
        }
    }
}

/// Employees and services to load into an empty store at startup
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DirectorySeed {
    /// Employees to insert
    #[serde(default)]
    pub employees: Vec<Employee>,
    /// Services to insert
    #[serde(default)]
    pub services: Vec<Service>,
}

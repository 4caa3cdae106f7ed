//! Booking records
//!
//! [`Booking`] is the stored record. [`NewBooking`] is a creation payload that
//! has passed schema validation, and [`BookingUpdate`] carries the fields of a
//! partial update.

use crate::models::ids::ObjectId;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Deserializer;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::FromRow;

/// Prefix for generated booking identifiers
pub const BOOKING_ID_PREFIX: &str = "b";

/// Fields a client must supply when creating a booking, in validation order
const REQUIRED_FIELDS: [&str; 7] = [
    "receptionistId",
    "receptionistName",
    "serviceId",
    "serviceName",
    "patientName",
    "bookingDate",
    "bookingTime",
];

/// Fields a client may supply when creating a booking
const OPTIONAL_FIELDS: [&str; 4] = ["assignedStaffName", "patientId", "status", "remarks"];

/// Fields assigned by the service; ignored when sent by a client
const SERVER_FIELDS: [&str; 3] = ["_id", "bookingId", "updated"];

/// A stored appointment linking a patient, a service and staff
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    /// Record key
    #[serde(rename = "_id")]
    pub id: ObjectId,
    /// Human-facing booking identifier (e.g. `b3F9A1C07D2`)
    pub booking_id: String,
    /// Employee who took the booking
    pub receptionist_id: String,
    /// Display name of the receptionist, copied at creation
    pub receptionist_name: String,
    /// Booked service
    pub service_id: String,
    /// Display name of the service, copied at creation
    pub service_name: String,
    /// Staff member assigned to carry out the service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_staff_name: Option<String>,
    /// Patient reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
    /// Display name of the patient
    pub patient_name: String,
    /// Appointment date (`YYYY-MM-DD` when created through the API)
    pub booking_date: String,
    /// Appointment time (`HH:MM[:SS]` when created through the API)
    pub booking_time: String,
    /// Free-text booking status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Free-text remarks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    /// Last time the record was written
    pub updated: DateTime<Utc>,
}

/// A creation payload that passed schema validation
#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    /// Receptionist reference, not yet checked for format or existence
    pub receptionist_id: String,
    /// Receptionist display name
    pub receptionist_name: String,
    /// Service reference, not yet checked for format or existence
    pub service_id: String,
    /// Service display name
    pub service_name: String,
    /// Assigned staff display name
    pub assigned_staff_name: Option<String>,
    /// Patient reference
    pub patient_id: Option<String>,
    /// Patient display name
    pub patient_name: String,
    /// Normalized `YYYY-MM-DD` date
    pub booking_date: String,
    /// Normalized `HH:MM` or `HH:MM:SS` time
    pub booking_time: String,
    /// Booking status
    pub status: Option<String>,
    /// Remarks
    pub remarks: Option<String>,
}

impl NewBooking {
    /// Validate a raw JSON creation payload
    ///
    /// Fields are checked in declaration order and the first failure is
    /// reported, followed by a check for keys the schema does not know.
    ///
    /// # Returns
    /// * `Ok(NewBooking)` - Payload is valid
    /// * `Err(String)` - Message describing the first failing field
    pub fn validate(payload: &Value) -> Result<Self, String> {
        let fields = payload
            .as_object()
            .ok_or_else(|| "\"value\" must be of type object".to_string())?;

        for name in REQUIRED_FIELDS {
            let value = required_string(fields, name)?;
            if name == "bookingDate" {
                parse_booking_date(value)
                    .ok_or_else(|| format!("\"{}\" must be a valid date", name))?;
            }
            if name == "bookingTime" {
                normalize_booking_time(value)
                    .ok_or_else(|| format!("\"{}\" must be a valid time", name))?;
            }
        }
        for name in OPTIONAL_FIELDS {
            optional_string(fields, name)?;
        }
        if let Some(unknown) = fields.keys().find(|key| {
            !REQUIRED_FIELDS.contains(&key.as_str())
                && !OPTIONAL_FIELDS.contains(&key.as_str())
                && !SERVER_FIELDS.contains(&key.as_str())
        }) {
            return Err(format!("\"{}\" is not allowed", unknown));
        }

        let text = |name: &str| fields.get(name).and_then(Value::as_str).map(str::to_string);
        let booking_date = text("bookingDate")
            .as_deref()
            .and_then(parse_booking_date)
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_default();

        Ok(Self {
            receptionist_id: text("receptionistId").unwrap_or_default(),
            receptionist_name: text("receptionistName").unwrap_or_default(),
            service_id: text("serviceId").unwrap_or_default(),
            service_name: text("serviceName").unwrap_or_default(),
            assigned_staff_name: text("assignedStaffName"),
            patient_id: text("patientId"),
            patient_name: text("patientName").unwrap_or_default(),
            booking_date,
            booking_time: text("bookingTime")
                .as_deref()
                .and_then(normalize_booking_time)
                .unwrap_or_default(),
            status: text("status"),
            remarks: text("remarks"),
        })
    }

    /// Turn the validated payload into a record with a fresh key
    pub fn into_booking(self, booking_id: String) -> Booking {
        Booking {
            id: ObjectId::new(),
            booking_id,
            receptionist_id: self.receptionist_id,
            receptionist_name: self.receptionist_name,
            service_id: self.service_id,
            service_name: self.service_name,
            assigned_staff_name: self.assigned_staff_name,
            patient_id: self.patient_id,
            patient_name: self.patient_name,
            booking_date: self.booking_date,
            booking_time: self.booking_time,
            status: self.status,
            remarks: self.remarks,
            updated: Utc::now(),
        }
    }
}

fn required_string<'a>(fields: &'a Map<String, Value>, name: &str) -> Result<&'a str, String> {
    match fields.get(name) {
        None => Err(format!("\"{}\" is required", name)),
        Some(Value::String(s)) if s.trim().is_empty() => {
            Err(format!("\"{}\" is not allowed to be empty", name))
        }
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(format!("\"{}\" must be a string", name)),
    }
}

fn optional_string(fields: &Map<String, Value>, name: &str) -> Result<(), String> {
    match fields.get(name) {
        None | Some(Value::String(_)) => Ok(()),
        Some(_) => Err(format!("\"{}\" must be a string", name)),
    }
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp
fn parse_booking_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw.trim())
                .ok()
                .map(|dt| dt.date_naive())
        })
}

/// Accepts 24-hour `H:MM`, `H:MM:SS` or 12-hour `H:MM AM`
///
/// Returns the zero-padded 24-hour form, keeping seconds only when supplied.
fn normalize_booking_time(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if let Ok(time) = NaiveTime::parse_from_str(raw, "%H:%M:%S") {
        return Some(time.format("%H:%M:%S").to_string());
    }
    ["%H:%M", "%I:%M %p", "%I:%M%p"]
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(raw, format).ok())
        .map(|time| time.format("%H:%M").to_string())
}

/// Partial update of a booking; absent fields are left untouched
///
/// Server-assigned fields (`_id`, `bookingId`, `updated`) are not part of
/// this type and are dropped during deserialization. Optional fields sent
/// as `null` are cleared; required fields reject `null`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingUpdate {
    /// New receptionist reference
    #[serde(default, deserialize_with = "non_null")]
    pub receptionist_id: Option<String>,
    /// New receptionist display name
    #[serde(default, deserialize_with = "non_null")]
    pub receptionist_name: Option<String>,
    /// New service reference
    #[serde(default, deserialize_with = "non_null")]
    pub service_id: Option<String>,
    /// New service display name
    #[serde(default, deserialize_with = "non_null")]
    pub service_name: Option<String>,
    /// New assigned staff display name (`Some(None)` clears it)
    #[serde(default, deserialize_with = "nullable")]
    pub assigned_staff_name: Option<Option<String>>,
    /// New patient reference (`Some(None)` clears it)
    #[serde(default, deserialize_with = "nullable")]
    pub patient_id: Option<Option<String>>,
    /// New patient display name
    #[serde(default, deserialize_with = "non_null")]
    pub patient_name: Option<String>,
    /// New date
    #[serde(default, deserialize_with = "non_null")]
    pub booking_date: Option<String>,
    /// New time
    #[serde(default, deserialize_with = "non_null")]
    pub booking_time: Option<String>,
    /// New status (`Some(None)` clears it)
    #[serde(default, deserialize_with = "nullable")]
    pub status: Option<Option<String>>,
    /// New remarks (`Some(None)` clears it)
    #[serde(default, deserialize_with = "nullable")]
    pub remarks: Option<Option<String>>,
}

/// A present field must hold a string
fn non_null<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    String::deserialize(deserializer).map(Some)
}

/// A present field holds a string or `null`
fn nullable<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Option<String>>, D::Error> {
    Option::<String>::deserialize(deserializer).map(Some)
}

impl BookingUpdate {
    /// Overwrite the supplied fields on `booking` and refresh its timestamp
    pub fn apply(&self, booking: &mut Booking) {
        fn set(target: &mut String, value: &Option<String>) {
            if let Some(value) = value {
                target.clone_from(value);
            }
        }
        fn set_opt(target: &mut Option<String>, value: &Option<Option<String>>) {
            if let Some(value) = value {
                target.clone_from(value);
            }
        }

        set(&mut booking.receptionist_id, &self.receptionist_id);
        set(&mut booking.receptionist_name, &self.receptionist_name);
        set(&mut booking.service_id, &self.service_id);
        set(&mut booking.service_name, &self.service_name);
        set_opt(&mut booking.assigned_staff_name, &self.assigned_staff_name);
        set_opt(&mut booking.patient_id, &self.patient_id);
        set(&mut booking.patient_name, &self.patient_name);
        set(&mut booking.booking_date, &self.booking_date);
        set(&mut booking.booking_time, &self.booking_time);
        set_opt(&mut booking.status, &self.status);
        set_opt(&mut booking.remarks, &self.remarks);
        booking.updated = Utc::now();
    }
}

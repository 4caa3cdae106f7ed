//! Query-string parameters for listing and searching bookings
//!
//! Raw parameters arrive as optional strings so malformed values never
//! reject a request; they fall back to defaults instead.

use serde::Deserialize;

/// Page size used when `limit` is absent or not a positive integer
pub const DEFAULT_LIMIT: i64 = 10;

/// Raw `GET /` query parameters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    /// Page size
    pub limit: Option<String>,
    /// 1-based page number
    pub page: Option<String>,
    /// `1` for ascending, `-1` for descending
    pub order: Option<String>,
    /// Field to sort by
    pub sort: Option<String>,
}

/// Column(s) a listing can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    /// Booking date, then booking time
    #[default]
    DateTime,
    /// Booking date only
    BookingDate,
    /// Booking time only
    BookingTime,
    /// Booking identifier
    BookingId,
    /// Patient display name
    PatientName,
    /// Service display name
    ServiceName,
    /// Receptionist display name
    ReceptionistName,
    /// Assigned staff display name
    AssignedStaffName,
    /// Booking status
    Status,
    /// Last update time
    Updated,
}

impl SortField {
    /// Resolve a client-facing field name; unknown names yield `None`
    pub fn from_name(name: &str) -> Option<Self> {
        let field = match name {
            "dateTime" => Self::DateTime,
            "bookingDate" => Self::BookingDate,
            "bookingTime" => Self::BookingTime,
            "bookingId" => Self::BookingId,
            "patientName" => Self::PatientName,
            "serviceName" => Self::ServiceName,
            "receptionistName" => Self::ReceptionistName,
            "assignedStaffName" => Self::AssignedStaffName,
            "status" => Self::Status,
            "updated" => Self::Updated,
            _ => return None,
        };
        Some(field)
    }

    /// Store columns backing this field, most significant first
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            Self::DateTime => &["booking_date", "booking_time"],
            Self::BookingDate => &["booking_date"],
            Self::BookingTime => &["booking_time"],
            Self::BookingId => &["booking_id"],
            Self::PatientName => &["patient_name"],
            Self::ServiceName => &["service_name"],
            Self::ReceptionistName => &["receptionist_name"],
            Self::AssignedStaffName => &["assigned_staff_name"],
            Self::Status => &["status"],
            Self::Updated => &["updated"],
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Smallest first
    #[default]
    Ascending,
    /// Largest first
    Descending,
}

impl SortOrder {
    /// SQL keyword for this direction
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
        }
    }
}

/// A resolved listing request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListQuery {
    /// Maximum number of records to return
    pub limit: i64,
    /// Number of records to skip
    pub skip: i64,
    /// Sort field
    pub sort: SortField,
    /// Sort direction
    pub order: SortOrder,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            skip: 0,
            sort: SortField::default(),
            order: SortOrder::default(),
        }
    }
}

impl From<&ListParams> for ListQuery {
    fn from(params: &ListParams) -> Self {
        let limit = params
            .limit
            .as_deref()
            .and_then(parse_int_prefix)
            .filter(|limit| *limit > 0)
            .unwrap_or(DEFAULT_LIMIT);
        let page_index = params
            .page
            .as_deref()
            .and_then(parse_int_prefix)
            .filter(|page| *page > 0)
            .map(|page| page - 1)
            .unwrap_or(0);
        let order = match params.order.as_deref() {
            Some("-1") => SortOrder::Descending,
            _ => SortOrder::Ascending,
        };
        let sort = params
            .sort
            .as_deref()
            .and_then(SortField::from_name)
            .unwrap_or_default();

        Self {
            limit,
            skip: page_index.saturating_mul(limit),
            sort,
            order,
        }
    }
}

/// Parse the leading integer of `raw`, ignoring trailing garbage
///
/// `"25"`, `" 25"` and `"25abc"` all give 25; `"abc"` gives `None`.
/// Values outside `i64` are treated as unparseable.
pub fn parse_int_prefix(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (sign, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => ("-", &trimmed[1..]),
        Some(b'+') => ("", &trimmed[1..]),
        _ => ("", trimmed),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    format!("{}{}", sign, &digits[..end]).parse().ok()
}

/// Raw `GET /search` query parameters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    /// Substring of the service name
    pub service: Option<String>,
    /// Substring of the patient name
    pub patient: Option<String>,
}

/// A resolved search; empty filters are dropped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    /// Case-insensitive substring of the service name
    pub service: Option<String>,
    /// Case-insensitive substring of the patient name
    pub patient: Option<String>,
}

impl SearchQuery {
    /// True when no filter is set; such a search matches nothing
    pub fn is_empty(&self) -> bool {
        self.service.is_none() && self.patient.is_none()
    }
}

impl From<&SearchParams> for SearchQuery {
    fn from(params: &SearchParams) -> Self {
        let non_empty = |value: &Option<String>| value.clone().filter(|v| !v.is_empty());
        Self {
            service: non_empty(&params.service),
            patient: non_empty(&params.patient),
        }
    }
}

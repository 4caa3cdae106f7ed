//! Booking API handlers
//!
//! Contains HTTP request handlers for booking CRUD, search and count.
//! Success bodies are the raw record or collection; errors are
//! `{"message": ...}` envelopes produced by [`AppError`].

use crate::api::extract::{LenientQuery, ValidId};
use crate::error::AppError;
use crate::models::{
    generate_id, Booking, BookingUpdate, ListParams, ListQuery, NewBooking, ObjectId,
    SearchParams, SearchQuery, BOOKING_ID_PREFIX,
};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

/// Count response
#[derive(Debug, Serialize)]
pub struct CountResponse {
    /// Total number of bookings
    pub count: i64,
}

/// GET / - List one page of bookings
pub async fn list_bookings(
    State(state): State<AppState>,
    LenientQuery(params): LenientQuery<ListParams>,
) -> Result<Json<Vec<Booking>>, AppError> {
    let query = ListQuery::from(&params);
    let bookings = state.db.list_bookings(&query).await?;
    Ok(Json(bookings))
}

/// POST / - Create a booking
///
/// The payload is schema-checked first, then the receptionist and service
/// references are checked for format and existence, in that order.
pub async fn create_booking(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    let Json(payload) = payload?;
    let booking_id = generate_id(BOOKING_ID_PREFIX);

    let mut new_booking = NewBooking::validate(&payload).map_err(AppError::BadRequest)?;

    let receptionist_id: ObjectId = new_booking
        .receptionist_id
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid receptionistId".to_string()))?;
    state
        .db
        .find_employee(&receptionist_id)
        .await?
        .ok_or_else(|| AppError::BadRequest("Employee Not Found!".to_string()))?;

    let service_id: ObjectId = new_booking
        .service_id
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid serviceId".to_string()))?;
    state
        .db
        .find_service(&service_id)
        .await?
        .ok_or_else(|| AppError::BadRequest("Service Not Found!".to_string()))?;

    new_booking.receptionist_id = receptionist_id.to_string();
    new_booking.service_id = service_id.to_string();

    let booking = new_booking.into_booking(booking_id);
    state.db.insert_booking(&booking).await?;

    info!(booking_id = %booking.booking_id, id = %booking.id, "Booking created");
    Ok((StatusCode::CREATED, Json(booking)))
}

/// GET /search - Filter bookings by service and/or patient name
pub async fn search_bookings(
    State(state): State<AppState>,
    LenientQuery(params): LenientQuery<SearchParams>,
) -> Result<Json<Vec<Booking>>, AppError> {
    let query = SearchQuery::from(&params);
    let bookings = state.db.search_bookings(&query).await?;
    Ok(Json(bookings))
}

/// GET /count - Total number of bookings
pub async fn count_bookings(State(state): State<AppState>) -> Result<Json<CountResponse>, AppError> {
    let count = state.db.count_bookings().await?;
    Ok(Json(CountResponse { count }))
}

/// GET /:id - Get a specific booking
pub async fn get_booking(
    State(state): State<AppState>,
    ValidId(id): ValidId,
) -> Result<Json<Booking>, AppError> {
    let booking = state
        .db
        .get_booking(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking Not Found!".to_string()))?;

    Ok(Json(booking))
}

/// PUT /:id - Overwrite the supplied fields of a booking
pub async fn update_booking(
    State(state): State<AppState>,
    ValidId(id): ValidId,
    payload: Result<Json<BookingUpdate>, JsonRejection>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    let Json(update) = payload?;

    let booking = state
        .db
        .update_booking(&id, &update)
        .await?
        .ok_or_else(|| AppError::BadRequest("Booking Update Failed".to_string()))?;

    info!(id = %id, "Booking updated");
    Ok((StatusCode::CREATED, Json(booking)))
}

/// DELETE /:id - Delete a booking
pub async fn delete_booking(
    State(state): State<AppState>,
    ValidId(id): ValidId,
) -> Result<StatusCode, AppError> {
    state
        .db
        .delete_booking(&id)
        .await?
        .ok_or_else(|| AppError::BadRequest("Deletion Failed".to_string()))?;

    info!(id = %id, "Booking deleted");
    Ok(StatusCode::CREATED)
}

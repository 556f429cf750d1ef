//! HTTP handlers for booking endpoints.

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::handlers::{ConfirmBookingCommand, CreateBookingCommand, GetBookingQuery};
use crate::domain::foundation::{BookingId, ClassOccurrenceId, ValidationError};

use super::super::error::ApiError;
use super::super::extract::OptionalUser;
use super::super::state::AppState;
use super::dto::{booking_party, BookingResponse, ConfirmBookingRequest, CreateBookingRequest};

/// POST /api/bookings - Book a place, pending payment
pub async fn create_booking(
    State(state): State<AppState>,
    OptionalUser(user_id): OptionalUser,
    Json(request): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let class_id: ClassOccurrenceId = parse_id("classId", &request.class_id)?;
    let party = booking_party(user_id, request.guest)?
        .ok_or_else(|| ValidationError::empty_field("guest"))?;

    let booking = state
        .create_booking_handler()
        .handle(CreateBookingCommand { class_id, party })
        .await?;

    Ok((StatusCode::CREATED, Json(BookingResponse::from(booking))))
}

/// GET /api/bookings/:id
pub async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let booking_id: BookingId = parse_id("id", &id)?;
    let booking = state
        .get_booking_handler()
        .handle(GetBookingQuery { booking_id })
        .await?;
    Ok(Json(BookingResponse::from(booking)))
}

/// POST /api/bookings/:id/confirm - Confirm from a paid checkout session
pub async fn confirm_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<ConfirmBookingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let booking_id: BookingId = parse_id("id", &id)?;
    let booking = state
        .confirm_booking_handler()
        .handle(ConfirmBookingCommand {
            booking_id,
            session_id: request.session_id,
        })
        .await?;
    Ok(Json(BookingResponse::from(booking)))
}

pub(crate) fn parse_id<T: std::str::FromStr>(field: &str, raw: &str) -> Result<T, ValidationError> {
    raw.trim()
        .parse()
        .map_err(|_| ValidationError::invalid_format(field, "not a valid id"))
}

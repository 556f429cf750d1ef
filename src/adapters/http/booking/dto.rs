//! HTTP DTOs for booking endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::booking::{Booking, BookingParty, BookingStatus, GuestContact};
use crate::domain::foundation::{to_major_units, UserId, ValidationError};

/// Contact details for a visitor booking without an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestDto {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub email: String,
}

impl GuestDto {
    pub fn into_contact(self) -> Result<GuestContact, ValidationError> {
        GuestContact::new(self.first_name, self.last_name, self.email)
    }
}

impl From<GuestContact> for GuestDto {
    fn from(guest: GuestContact) -> Self {
        Self {
            first_name: guest.first_name,
            last_name: guest.last_name,
            email: guest.email,
        }
    }
}

/// Combines the signed-in user (if any) with optional guest details.
pub fn booking_party(
    user_id: Option<UserId>,
    guest: Option<GuestDto>,
) -> Result<Option<BookingParty>, ValidationError> {
    let guest = guest.map(GuestDto::into_contact).transpose()?;
    if user_id.is_none() && guest.is_none() {
        return Ok(None);
    }
    BookingParty::new(user_id, guest).map(Some)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub class_id: String,
    #[serde(default)]
    pub guest: Option<GuestDto>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmBookingRequest {
    pub session_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub id: String,
    pub class_occurrence_id: String,
    pub user_id: Option<String>,
    pub guest: Option<GuestDto>,
    pub status: BookingStatus,
    pub amount_paid_cents: Option<i64>,
    /// `amount_paid_cents` in major units.
    pub amount_paid: Option<f64>,
    pub currency: Option<String>,
    pub payment_reference: Option<String>,
    pub booked_at: String,
    pub updated_at: String,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id.to_string(),
            class_occurrence_id: booking.class_occurrence_id.to_string(),
            user_id: booking.user_id.map(|u| u.as_str().to_string()),
            guest: booking.guest.map(GuestDto::from),
            status: booking.status,
            amount_paid_cents: booking.amount_paid_cents,
            amount_paid: booking.amount_paid_cents.map(to_major_units),
            currency: booking.currency.map(|c| c.as_str().to_string()),
            payment_reference: booking.payment_reference,
            booked_at: booking.booked_at.as_datetime().to_rfc3339(),
            updated_at: booking.updated_at.as_datetime().to_rfc3339(),
        }
    }
}

//! Booking aggregate - one person's place in one class occurrence.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    BookingId, ClassOccurrenceId, CurrencyCode, Timestamp, UserId, ValidationError,
};

use super::{BookingError, BookingStatus};

/// Contact details for someone booking without an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestContact {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl GuestContact {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let email = email.into().trim().to_string();
        if email.is_empty() {
            return Err(ValidationError::empty_field("email"));
        }
        let valid = email
            .split_once('@')
            .map(|(local, domain)| !local.is_empty() && domain.contains('.'))
            .unwrap_or(false);
        if !valid {
            return Err(ValidationError::invalid_format("email", "not an email address"));
        }
        Ok(Self {
            first_name: first_name.into().trim().to_string(),
            last_name: last_name.into().trim().to_string(),
            email,
        })
    }

    /// Splits a provider-supplied full name on the first whitespace.
    pub fn from_full_name(name: Option<&str>, email: &str) -> Result<Self, ValidationError> {
        let name = name.unwrap_or("").trim();
        let (first, last) = name.split_once(char::is_whitespace).unwrap_or((name, ""));
        Self::new(first, last, email)
    }
}

/// Who a booking belongs to: an account, a guest, or both.
///
/// Only paid bookings may be unattributed; see [`BookingParty::unattributed`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingParty {
    pub user_id: Option<UserId>,
    pub guest: Option<GuestContact>,
}

impl BookingParty {
    pub fn new(user_id: Option<UserId>, guest: Option<GuestContact>) -> Result<Self, ValidationError> {
        if user_id.is_none() && guest.is_none() {
            return Err(ValidationError::empty_field("user_id"));
        }
        Ok(Self { user_id, guest })
    }

    pub fn user(user_id: UserId) -> Self {
        Self { user_id: Some(user_id), guest: None }
    }

    /// No account and no contact details. A completed checkout still
    /// becomes a booking; the payment reference identifies it.
    pub fn unattributed() -> Self {
        Self { user_id: None, guest: None }
    }
}

/// Settled payment captured from the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentReceipt {
    /// Provider payment reference (payment intent id).
    pub reference: String,
    pub amount_cents: Option<i64>,
    pub currency: Option<CurrencyCode>,
}

/// Result of applying a status transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Applied,
    /// The booking was already in the target state.
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub class_occurrence_id: ClassOccurrenceId,
    pub user_id: Option<UserId>,
    pub guest: Option<GuestContact>,
    pub status: BookingStatus,
    pub amount_paid_cents: Option<i64>,
    pub currency: Option<CurrencyCode>,
    /// Unique across all bookings when present.
    pub payment_reference: Option<String>,
    pub booked_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Booking {
    /// A booking awaiting payment.
    pub fn pending(
        id: BookingId,
        class_occurrence_id: ClassOccurrenceId,
        party: BookingParty,
        now: Timestamp,
    ) -> Self {
        Self {
            id,
            class_occurrence_id,
            user_id: party.user_id,
            guest: party.guest,
            status: BookingStatus::Pending,
            amount_paid_cents: None,
            currency: None,
            payment_reference: None,
            booked_at: now,
            updated_at: now,
        }
    }

    /// A booking created directly from a completed payment.
    pub fn paid(
        id: BookingId,
        class_occurrence_id: ClassOccurrenceId,
        party: BookingParty,
        receipt: PaymentReceipt,
        now: Timestamp,
    ) -> Self {
        let mut booking = Self::pending(id, class_occurrence_id, party, now);
        booking.record_payment(receipt);
        booking.status = BookingStatus::Confirmed;
        booking
    }

    /// Marks the booking paid.
    ///
    /// A canceled booking may still be confirmed, since a payment intent can
    /// succeed after an earlier attempt failed. Confirming twice with the same
    /// reference is a no-op.
    pub fn confirm(&mut self, receipt: PaymentReceipt, now: Timestamp) -> Result<Transition, BookingError> {
        match self.status {
            BookingStatus::Pending | BookingStatus::Canceled => {
                self.record_payment(receipt);
                self.status = BookingStatus::Confirmed;
                self.updated_at = now;
                Ok(Transition::Applied)
            }
            BookingStatus::Confirmed
                if self.payment_reference.is_none()
                    || self.payment_reference.as_deref() == Some(receipt.reference.as_str()) =>
            {
                if self.payment_reference.is_none() {
                    self.record_payment(receipt);
                    self.updated_at = now;
                    return Ok(Transition::Applied);
                }
                Ok(Transition::Unchanged)
            }
            from => Err(BookingError::InvalidTransition { from, to: BookingStatus::Confirmed }),
        }
    }

    pub fn cancel(&mut self, now: Timestamp) -> Result<Transition, BookingError> {
        self.move_to(BookingStatus::Canceled, &[BookingStatus::Pending, BookingStatus::Confirmed], now)
    }

    pub fn refund(&mut self, now: Timestamp) -> Result<Transition, BookingError> {
        self.move_to(BookingStatus::Refunded, &[BookingStatus::Confirmed], now)
    }

    pub fn is_pending(&self) -> bool {
        self.status == BookingStatus::Pending
    }

    fn move_to(
        &mut self,
        to: BookingStatus,
        allowed_from: &[BookingStatus],
        now: Timestamp,
    ) -> Result<Transition, BookingError> {
        if self.status == to {
            return Ok(Transition::Unchanged);
        }
        if !allowed_from.contains(&self.status) {
            return Err(BookingError::InvalidTransition { from: self.status, to });
        }
        self.status = to;
        self.updated_at = now;
        Ok(Transition::Applied)
    }

    fn record_payment(&mut self, receipt: PaymentReceipt) {
        self.payment_reference = Some(receipt.reference);
        if receipt.amount_cents.is_some() {
            self.amount_paid_cents = receipt.amount_cents;
        }
        if receipt.currency.is_some() {
            self.currency = receipt.currency;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending() -> Booking {
        Booking::pending(
            BookingId::new(),
            ClassOccurrenceId::new(),
            BookingParty::user(UserId::new("user_1").unwrap()),
            Timestamp::now(),
        )
    }

    fn receipt(reference: &str) -> PaymentReceipt {
        PaymentReceipt {
            reference: reference.to_string(),
            amount_cents: Some(2500),
            currency: Some(CurrencyCode::gbp()),
        }
    }

    #[test]
    fn guest_contact_requires_plausible_email() {
        assert!(GuestContact::new("Ana", "Lopez", "ana@example.com").is_ok());
        assert!(GuestContact::new("Ana", "Lopez", "").is_err());
        assert!(GuestContact::new("Ana", "Lopez", "ana.example.com").is_err());
        assert!(GuestContact::new("Ana", "Lopez", "@example.com").is_err());
    }

    #[test]
    fn guest_from_full_name_splits_once() {
        let g = GuestContact::from_full_name(Some("Ana Maria Lopez"), "ana@example.com").unwrap();
        assert_eq!(g.first_name, "Ana");
        assert_eq!(g.last_name, "Maria Lopez");

        let g = GuestContact::from_full_name(None, "ana@example.com").unwrap();
        assert_eq!(g.first_name, "");
    }

    #[test]
    fn party_needs_user_or_guest() {
        assert!(BookingParty::new(None, None).is_err());
        let guest = GuestContact::new("A", "B", "a@b.co").unwrap();
        assert!(BookingParty::new(None, Some(guest)).is_ok());
    }

    #[test]
    fn paid_booking_may_be_unattributed() {
        let b = Booking::paid(
            BookingId::new(),
            ClassOccurrenceId::new(),
            BookingParty::unattributed(),
            receipt("pi_1"),
            Timestamp::now(),
        );
        assert_eq!(b.status, BookingStatus::Confirmed);
        assert!(b.user_id.is_none() && b.guest.is_none());
    }

    #[test]
    fn confirm_pending_records_payment() {
        let mut b = pending();
        assert_eq!(b.confirm(receipt("pi_1"), Timestamp::now()).unwrap(), Transition::Applied);
        assert_eq!(b.status, BookingStatus::Confirmed);
        assert_eq!(b.payment_reference.as_deref(), Some("pi_1"));
        assert_eq!(b.amount_paid_cents, Some(2500));
    }

    #[test]
    fn confirm_is_idempotent_for_same_reference() {
        let mut b = pending();
        b.confirm(receipt("pi_1"), Timestamp::now()).unwrap();
        assert_eq!(b.confirm(receipt("pi_1"), Timestamp::now()).unwrap(), Transition::Unchanged);
    }

    #[test]
    fn confirm_rejects_different_reference_once_paid() {
        let mut b = pending();
        b.confirm(receipt("pi_1"), Timestamp::now()).unwrap();
        assert!(matches!(
            b.confirm(receipt("pi_2"), Timestamp::now()),
            Err(BookingError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn canceled_booking_can_still_be_paid() {
        let mut b = pending();
        b.cancel(Timestamp::now()).unwrap();
        assert_eq!(b.confirm(receipt("pi_1"), Timestamp::now()).unwrap(), Transition::Applied);
    }

    #[test]
    fn refund_requires_confirmed() {
        let mut b = pending();
        assert!(b.refund(Timestamp::now()).is_err());
        b.confirm(receipt("pi_1"), Timestamp::now()).unwrap();
        assert_eq!(b.refund(Timestamp::now()).unwrap(), Transition::Applied);
        assert_eq!(b.refund(Timestamp::now()).unwrap(), Transition::Unchanged);
        assert!(b.cancel(Timestamp::now()).is_err());
        assert!(b.confirm(receipt("pi_1"), Timestamp::now()).is_err());
    }

    #[test]
    fn paid_constructor_starts_confirmed() {
        let b = Booking::paid(
            BookingId::new(),
            ClassOccurrenceId::new(),
            BookingParty::user(UserId::new("u").unwrap()),
            receipt("pi_9"),
            Timestamp::now(),
        );
        assert_eq!(b.status, BookingStatus::Confirmed);
        assert_eq!(b.payment_reference.as_deref(), Some("pi_9"));
    }
}

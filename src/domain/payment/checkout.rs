//! Checkout request building.
//!
//! Turns a class, a price, and the paying party into a provider checkout
//! request: one line item, return URLs on the storefront, and correlation
//! metadata for the webhook to find its way back.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::domain::booking::BookingParty;
use crate::domain::catalog::ClassOccurrence;
use crate::domain::foundation::{to_minor_units, BookingId, CurrencyCode, ValidationError};
use crate::ports::{CheckoutLineItem, CheckoutSessionRequest};

use super::metadata::CorrelationMetadata;

pub const PRODUCT_NAME: &str = "Dance Class Booking";

/// Placeholder the provider substitutes with the real session id.
pub const SESSION_ID_PLACEHOLDER: &str = "{CHECKOUT_SESSION_ID}";

/// How the customer completes payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutMode {
    /// Redirect to a provider-hosted page.
    #[default]
    Hosted,
    /// Render the provider widget inside the storefront.
    Embedded,
}

impl CheckoutMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutMode::Hosted => "hosted",
            CheckoutMode::Embedded => "embedded",
        }
    }
}

impl FromStr for CheckoutMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hosted" => Ok(CheckoutMode::Hosted),
            "embedded" => Ok(CheckoutMode::Embedded),
            other => Err(ValidationError::invalid_format(
                "checkout_mode",
                format!("expected hosted or embedded, got '{}'", other),
            )),
        }
    }
}

/// Deployment-wide checkout settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSettings {
    /// Storefront origin used for return URLs.
    pub public_base_url: String,
    pub currency: CurrencyCode,
    pub mode: CheckoutMode,
}

/// What is being paid for and by whom.
#[derive(Debug, Clone)]
pub struct CheckoutOrder<'a> {
    pub class: &'a ClassOccurrence,
    /// Decimal price in major units, as entered by the customer-facing form.
    pub price: f64,
    pub party: Option<BookingParty>,
    pub booking_id: Option<BookingId>,
    pub customer_email: Option<String>,
}

impl CheckoutSettings {
    pub fn success_url(&self, booking_id: Option<&BookingId>) -> String {
        let mut url = format!(
            "{}/booking-success?session_id={}",
            self.base(),
            SESSION_ID_PLACEHOLDER
        );
        if let Some(id) = booking_id {
            url.push_str("&booking_id=");
            url.push_str(&id.to_string());
        }
        url
    }

    pub fn cancel_url(&self, class: &ClassOccurrence) -> String {
        format!("{}/classes/{}", self.base(), class.id)
    }

    fn base(&self) -> &str {
        self.public_base_url.trim_end_matches('/')
    }
}

/// Builds the provider request for an order.
///
/// # Errors
///
/// `OutOfRange`/`InvalidFormat` on `price` when it is not a finite positive
/// amount.
pub fn build_checkout_request(
    settings: &CheckoutSettings,
    order: &CheckoutOrder<'_>,
) -> Result<CheckoutSessionRequest, ValidationError> {
    let unit_amount = to_minor_units("price", order.price)?;

    let mut metadata = CorrelationMetadata::for_class(&order.class.id)
        .with_booking(order.booking_id.as_ref());
    if let Some(party) = &order.party {
        metadata = metadata.with_party(party);
    }

    let customer_email = order.customer_email.clone().or_else(|| {
        order
            .party
            .as_ref()
            .and_then(|p| p.guest.as_ref())
            .map(|g| g.email.clone())
    });

    let cancel_url = match settings.mode {
        CheckoutMode::Hosted => Some(settings.cancel_url(order.class)),
        CheckoutMode::Embedded => None,
    };

    Ok(CheckoutSessionRequest {
        mode: settings.mode,
        line_item: CheckoutLineItem {
            name: format!("{} - {}", PRODUCT_NAME, order.class.title),
            unit_amount,
            currency: settings.currency.clone(),
            quantity: 1,
        },
        success_url: settings.success_url(order.booking_id.as_ref()),
        cancel_url,
        customer_email,
        metadata: metadata.to_map(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::booking::GuestContact;
    use crate::domain::catalog::fixtures::class_on;
    use crate::domain::foundation::UserId;
    use chrono::NaiveDate;

    fn settings(mode: CheckoutMode) -> CheckoutSettings {
        CheckoutSettings {
            public_base_url: "https://dance.example/".to_string(),
            currency: CurrencyCode::gbp(),
            mode,
        }
    }

    fn class() -> ClassOccurrence {
        class_on(NaiveDate::from_ymd_opt(2025, 1, 10).unwrap())
    }

    #[test]
    fn hosted_request_has_minor_units_and_urls() {
        let class = class();
        let order = CheckoutOrder {
            class: &class,
            price: 25.0,
            party: Some(BookingParty::user(UserId::new("user_1").unwrap())),
            booking_id: None,
            customer_email: None,
        };

        let request = build_checkout_request(&settings(CheckoutMode::Hosted), &order).unwrap();

        assert_eq!(request.line_item.unit_amount, 2500);
        assert_eq!(request.line_item.quantity, 1);
        assert_eq!(request.line_item.currency.to_provider_code(), "gbp");
        assert_eq!(request.line_item.name, "Dance Class Booking - Salsa Beginners");
        assert_eq!(
            request.success_url,
            "https://dance.example/booking-success?session_id={CHECKOUT_SESSION_ID}"
        );
        assert_eq!(
            request.cancel_url,
            Some(format!("https://dance.example/classes/{}", class.id))
        );
        assert_eq!(request.metadata.get("classId"), Some(&class.id.to_string()));
        assert_eq!(request.metadata.get("userId").map(String::as_str), Some("user_1"));
    }

    #[test]
    fn price_is_rounded_to_nearest_minor_unit() {
        let class = class();
        let order = CheckoutOrder {
            class: &class,
            price: 19.999,
            party: None,
            booking_id: None,
            customer_email: None,
        };
        let request = build_checkout_request(&settings(CheckoutMode::Hosted), &order).unwrap();
        assert_eq!(request.line_item.unit_amount, 2000);
    }

    #[test]
    fn invalid_prices_are_rejected() {
        let class = class();
        for price in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let order = CheckoutOrder {
                class: &class,
                price,
                party: None,
                booking_id: None,
                customer_email: None,
            };
            assert!(
                build_checkout_request(&settings(CheckoutMode::Hosted), &order).is_err(),
                "price {} accepted",
                price
            );
        }
    }

    #[test]
    fn booking_id_is_carried_in_url_and_metadata() {
        let class = class();
        let booking_id = BookingId::new();
        let order = CheckoutOrder {
            class: &class,
            price: 12.5,
            party: None,
            booking_id: Some(booking_id),
            customer_email: None,
        };

        let request = build_checkout_request(&settings(CheckoutMode::Hosted), &order).unwrap();

        assert!(request.success_url.ends_with(&format!("&booking_id={}", booking_id)));
        assert_eq!(request.metadata.get("bookingId"), Some(&booking_id.to_string()));
    }

    #[test]
    fn embedded_mode_has_no_cancel_url() {
        let class = class();
        let order = CheckoutOrder {
            class: &class,
            price: 25.0,
            party: None,
            booking_id: None,
            customer_email: None,
        };
        let request = build_checkout_request(&settings(CheckoutMode::Embedded), &order).unwrap();
        assert_eq!(request.mode, CheckoutMode::Embedded);
        assert!(request.cancel_url.is_none());
    }

    #[test]
    fn guest_email_prefills_checkout() {
        let class = class();
        let guest = GuestContact::new("Ana", "Lopez", "ana@example.com").unwrap();
        let order = CheckoutOrder {
            class: &class,
            price: 25.0,
            party: Some(BookingParty::new(None, Some(guest)).unwrap()),
            booking_id: None,
            customer_email: None,
        };
        let request = build_checkout_request(&settings(CheckoutMode::Hosted), &order).unwrap();
        assert_eq!(request.customer_email.as_deref(), Some("ana@example.com"));
        assert_eq!(request.metadata.get("guestEmail").map(String::as_str), Some("ana@example.com"));
    }

    #[test]
    fn checkout_mode_parses_case_insensitively() {
        assert_eq!("Embedded".parse::<CheckoutMode>().unwrap(), CheckoutMode::Embedded);
        assert!("popup".parse::<CheckoutMode>().is_err());
    }
}

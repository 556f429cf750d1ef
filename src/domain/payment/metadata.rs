//! Correlation metadata attached to checkout sessions and payment intents.
//!
//! Keys are camelCase because the storefront reads and writes them verbatim.

use std::collections::{BTreeMap, HashMap};

use crate::domain::booking::{BookingParty, GuestContact};
use crate::domain::foundation::{BookingId, ClassOccurrenceId, UserId, ValidationError};

pub const CLASS_ID: &str = "classId";
pub const USER_ID: &str = "userId";
pub const BOOKING_ID: &str = "bookingId";
pub const GUEST_FIRST_NAME: &str = "guestFirstName";
pub const GUEST_LAST_NAME: &str = "guestLastName";
pub const GUEST_EMAIL: &str = "guestEmail";

/// Identifiers linking a provider payment back to a class, a person, and
/// optionally an existing booking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorrelationMetadata {
    pub class_id: Option<String>,
    pub user_id: Option<String>,
    pub booking_id: Option<String>,
    pub guest_first_name: Option<String>,
    pub guest_last_name: Option<String>,
    pub guest_email: Option<String>,
}

impl CorrelationMetadata {
    pub fn for_class(class_id: &ClassOccurrenceId) -> Self {
        Self {
            class_id: Some(class_id.to_string()),
            ..Default::default()
        }
    }

    pub fn with_party(mut self, party: &BookingParty) -> Self {
        self.user_id = party.user_id.as_ref().map(|u| u.as_str().to_string());
        if let Some(guest) = &party.guest {
            self.guest_first_name = Some(guest.first_name.clone());
            self.guest_last_name = Some(guest.last_name.clone());
            self.guest_email = Some(guest.email.clone());
        }
        self
    }

    pub fn with_booking(mut self, booking_id: Option<&BookingId>) -> Self {
        self.booking_id = booking_id.map(ToString::to_string);
        self
    }

    /// Reads metadata from a provider object. Blank values count as absent.
    pub fn from_map(map: &HashMap<String, String>) -> Self {
        let get = |key: &str| {
            map.get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        Self {
            class_id: get(CLASS_ID),
            user_id: get(USER_ID),
            booking_id: get(BOOKING_ID),
            guest_first_name: get(GUEST_FIRST_NAME),
            guest_last_name: get(GUEST_LAST_NAME),
            guest_email: get(GUEST_EMAIL),
        }
    }

    /// Serializes to the provider's flat string map, omitting absent keys.
    pub fn to_map(&self) -> BTreeMap<String, String> {
        [
            (CLASS_ID, &self.class_id),
            (USER_ID, &self.user_id),
            (BOOKING_ID, &self.booking_id),
            (GUEST_FIRST_NAME, &self.guest_first_name),
            (GUEST_LAST_NAME, &self.guest_last_name),
            (GUEST_EMAIL, &self.guest_email),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_ref().map(|v| (key.to_string(), v.clone())))
        .collect()
    }

    pub fn parsed_class_id(&self) -> Result<Option<ClassOccurrenceId>, ValidationError> {
        self.class_id
            .as_deref()
            .map(|s| {
                s.parse::<ClassOccurrenceId>()
                    .map_err(|_| ValidationError::invalid_format(CLASS_ID, "not a class id"))
            })
            .transpose()
    }

    pub fn parsed_booking_id(&self) -> Result<Option<BookingId>, ValidationError> {
        self.booking_id
            .as_deref()
            .map(|s| {
                s.parse::<BookingId>()
                    .map_err(|_| ValidationError::invalid_format(BOOKING_ID, "not a booking id"))
            })
            .transpose()
    }

    /// Who paid, as far as the metadata says.
    ///
    /// Guest details need at least an email. Returns `None` when neither a
    /// user nor a usable guest is present.
    pub fn party(&self) -> Option<BookingParty> {
        let user_id = self.user_id.as_deref().and_then(|u| UserId::new(u).ok());
        let guest = self.guest_email.as_deref().and_then(|email| {
            GuestContact::new(
                self.guest_first_name.clone().unwrap_or_default(),
                self.guest_last_name.clone().unwrap_or_default(),
                email,
            )
            .ok()
        });
        BookingParty::new(user_id, guest).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_map_omits_absent_keys() {
        let class_id = ClassOccurrenceId::new();
        let meta = CorrelationMetadata::for_class(&class_id)
            .with_party(&BookingParty::user(UserId::new("user_1").unwrap()));

        let map = meta.to_map();

        assert_eq!(map.len(), 2);
        assert_eq!(map.get("classId"), Some(&class_id.to_string()));
        assert_eq!(map.get("userId").map(String::as_str), Some("user_1"));
        assert!(!map.contains_key("bookingId"));
    }

    #[test]
    fn guest_party_writes_all_guest_keys() {
        let guest = GuestContact::new("Ana", "Lopez", "ana@example.com").unwrap();
        let party = BookingParty::new(None, Some(guest)).unwrap();
        let booking_id = BookingId::new();

        let map = CorrelationMetadata::for_class(&ClassOccurrenceId::new())
            .with_party(&party)
            .with_booking(Some(&booking_id))
            .to_map();

        assert_eq!(map.get("guestFirstName").map(String::as_str), Some("Ana"));
        assert_eq!(map.get("guestLastName").map(String::as_str), Some("Lopez"));
        assert_eq!(map.get("guestEmail").map(String::as_str), Some("ana@example.com"));
        assert_eq!(map.get("bookingId"), Some(&booking_id.to_string()));
    }

    #[test]
    fn from_map_treats_blank_as_absent() {
        let map: HashMap<String, String> =
            [("classId".to_string(), "  ".to_string()), ("userId".to_string(), "u1".to_string())]
                .into_iter()
                .collect();

        let meta = CorrelationMetadata::from_map(&map);

        assert!(meta.class_id.is_none());
        assert_eq!(meta.user_id.as_deref(), Some("u1"));
    }

    #[test]
    fn parsed_ids_reject_garbage() {
        let meta = CorrelationMetadata {
            class_id: Some("not-a-uuid".to_string()),
            booking_id: Some("also-bad".to_string()),
            ..Default::default()
        };
        assert!(meta.parsed_class_id().is_err());
        assert!(meta.parsed_booking_id().is_err());
        assert_eq!(CorrelationMetadata::default().parsed_class_id().unwrap(), None);
    }

    #[test]
    fn party_requires_user_or_guest_email() {
        assert!(CorrelationMetadata::default().party().is_none());

        let meta = CorrelationMetadata {
            guest_first_name: Some("Ana".to_string()),
            ..Default::default()
        };
        assert!(meta.party().is_none());

        let meta = CorrelationMetadata {
            guest_email: Some("ana@example.com".to_string()),
            ..Default::default()
        };
        let party = meta.party().unwrap();
        assert!(party.user_id.is_none());
        assert_eq!(party.guest.unwrap().email, "ana@example.com");
    }
}

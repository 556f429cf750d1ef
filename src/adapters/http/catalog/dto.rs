//! HTTP DTOs for class catalog endpoints.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::application::handlers::ClassAvailability;
use crate::domain::catalog::{parse_time_of_day, ClassChanges, ClassDetails, ClassOccurrence};
use crate::domain::foundation::{to_minor_units, ValidationError};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Query string for `GET /classes`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListClassesParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(default)]
    pub include_inactive: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateClassRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// `YYYY-MM-DD`
    pub date: String,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    /// Major currency units, e.g. `12.50`.
    pub price: f64,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub instructor: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
    pub max_capacity: u32,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl CreateClassRequest {
    pub fn into_details(self) -> Result<ClassDetails, ValidationError> {
        Ok(ClassDetails {
            title: self.title,
            description: self.description,
            date: parse_date("date", &self.date)?,
            start_time: parse_time("startTime", self.start_time.as_deref())?,
            end_time: parse_time("endTime", self.end_time.as_deref())?,
            price_pence: to_minor_units("price", self.price)?,
            location: self.location,
            instructor: self.instructor,
            level: self.level,
            max_capacity: self.max_capacity,
            is_active: self.is_active,
        })
    }
}

/// Partial update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClassRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub price: Option<f64>,
    pub location: Option<String>,
    pub instructor: Option<String>,
    pub level: Option<String>,
    pub max_capacity: Option<u32>,
    pub is_active: Option<bool>,
}

impl UpdateClassRequest {
    pub fn into_changes(self) -> Result<ClassChanges, ValidationError> {
        Ok(ClassChanges {
            title: self.title,
            description: self.description,
            date: self.date.map(|d| parse_date("date", &d)).transpose()?,
            start_time: parse_time("startTime", self.start_time.as_deref())?,
            end_time: parse_time("endTime", self.end_time.as_deref())?,
            price_pence: self.price.map(|p| to_minor_units("price", p)).transpose()?,
            location: self.location,
            instructor: self.instructor,
            level: self.level,
            max_capacity: self.max_capacity,
            is_active: self.is_active,
        })
    }
}

pub(crate) fn parse_date(field: &str, value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| ValidationError::invalid_format(field, "expected YYYY-MM-DD"))
}

fn parse_time(field: &str, value: Option<&str>) -> Result<Option<NaiveTime>, ValidationError> {
    match value {
        None => Ok(None),
        Some(raw) => parse_time_of_day(raw)
            .map(Some)
            .ok_or_else(|| ValidationError::invalid_format(field, "expected a time such as 19:30 or 7:30 PM")),
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassResponse {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub duration_minutes: Option<u32>,
    /// Major units.
    pub price: f64,
    pub price_pence: i64,
    pub location: Option<String>,
    pub instructor: Option<String>,
    pub level: Option<String>,
    pub max_capacity: u32,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spots_remaining: Option<u32>,
    pub created_at: String,
    pub updated_at: String,
}

fn format_time(time: Option<NaiveTime>) -> Option<String> {
    time.map(|t| t.format("%H:%M").to_string())
}

impl From<ClassOccurrence> for ClassResponse {
    fn from(class: ClassOccurrence) -> Self {
        Self {
            id: class.id.to_string(),
            price: class.price(),
            title: class.title,
            slug: class.slug,
            description: class.description,
            date: class.date,
            start_time: format_time(class.start_time),
            end_time: format_time(class.end_time),
            duration_minutes: class.duration_minutes,
            price_pence: class.price_pence,
            location: class.location,
            instructor: class.instructor,
            level: class.level,
            max_capacity: class.max_capacity,
            is_active: class.is_active,
            spots_remaining: None,
            created_at: class.created_at.as_datetime().to_rfc3339(),
            updated_at: class.updated_at.as_datetime().to_rfc3339(),
        }
    }
}

impl From<ClassAvailability> for ClassResponse {
    fn from(availability: ClassAvailability) -> Self {
        Self {
            spots_remaining: Some(availability.spots_remaining),
            ..Self::from(availability.class)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::fixtures::class_on;
    use serde_json::json;

    fn create_request() -> CreateClassRequest {
        serde_json::from_value(json!({
            "title": "Salsa Beginners",
            "date": "2025-03-14",
            "startTime": "7:00 PM",
            "endTime": "20:30",
            "price": 12.5,
            "maxCapacity": 16
        }))
        .unwrap()
    }

    #[test]
    fn create_request_converts_units_and_times() {
        let details = create_request().into_details().unwrap();
        assert_eq!(details.date, NaiveDate::from_ymd_opt(2025, 3, 14).unwrap());
        assert_eq!(details.start_time, NaiveTime::from_hms_opt(19, 0, 0));
        assert_eq!(details.end_time, NaiveTime::from_hms_opt(20, 30, 0));
        assert_eq!(details.price_pence, 1250);
        assert!(details.is_active);
    }

    #[test]
    fn create_request_rejects_bad_date() {
        let mut request = create_request();
        request.date = "14/03/2025".to_string();
        let err = request.into_details().unwrap_err();
        assert_eq!(err.field(), "date");
    }

    #[test]
    fn create_request_rejects_bad_time() {
        let mut request = create_request();
        request.start_time = Some("teatime".to_string());
        assert_eq!(request.into_details().unwrap_err().field(), "startTime");
    }

    #[test]
    fn update_request_leaves_absent_fields_alone() {
        let request: UpdateClassRequest = serde_json::from_value(json!({"price": 9.99})).unwrap();
        let changes = request.into_changes().unwrap();
        assert_eq!(changes.price_pence, Some(999));
        assert_eq!(changes.title, None);
        assert_eq!(changes.start_time, None);
    }

    #[test]
    fn list_params_accept_camel_case() {
        let params: ListClassesParams = serde_json::from_value(json!({
            "startDate": "2025-01-01",
            "includeInactive": true
        }))
        .unwrap();
        assert_eq!(params.start_date.as_deref(), Some("2025-01-01"));
        assert!(params.include_inactive);
    }

    #[test]
    fn response_serializes_camel_case_with_major_units() {
        let class = class_on(NaiveDate::from_ymd_opt(2025, 3, 14).unwrap());
        let body = serde_json::to_value(ClassResponse::from(ClassAvailability {
            class,
            spots_remaining: 5,
        }))
        .unwrap();
        assert_eq!(body["slug"], "salsa-beginners");
        assert_eq!(body["startTime"], "19:00");
        assert_eq!(body["date"], "2025-03-14");
        assert_eq!(body["price"], 25.0);
        assert_eq!(body["pricePence"], 2500);
        assert_eq!(body["spotsRemaining"], 5);
    }
}

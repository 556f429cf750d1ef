//! ClassOccurrence entity - a single scheduled instance of a dance class.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{to_major_units, ClassOccurrenceId, Timestamp, ValidationError};

use super::duration::duration_minutes;

/// A scheduled class that can be booked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassOccurrence {
    pub id: ClassOccurrenceId,
    pub title: String,
    /// Unique, derived from the title.
    pub slug: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    /// Derived from start and end time.
    pub duration_minutes: Option<u32>,
    /// Price in minor currency units.
    pub price_pence: i64,
    pub location: Option<String>,
    pub instructor: Option<String>,
    pub level: Option<String>,
    pub max_capacity: u32,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Staff-supplied fields for a new class occurrence.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDetails {
    pub title: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub price_pence: i64,
    pub location: Option<String>,
    pub instructor: Option<String>,
    pub level: Option<String>,
    pub max_capacity: u32,
    pub is_active: bool,
}

/// Partial update of a class occurrence; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub price_pence: Option<i64>,
    pub location: Option<String>,
    pub instructor: Option<String>,
    pub level: Option<String>,
    pub max_capacity: Option<u32>,
    pub is_active: Option<bool>,
}

impl ClassOccurrence {
    /// Builds a new occurrence with an already-resolved unique slug.
    pub fn create(
        id: ClassOccurrenceId,
        details: ClassDetails,
        slug: String,
        now: Timestamp,
    ) -> Result<Self, ValidationError> {
        validate_title(&details.title)?;
        validate_price(details.price_pence)?;
        validate_capacity(details.max_capacity)?;

        let mut occurrence = Self {
            id,
            title: details.title.trim().to_string(),
            slug,
            description: details.description,
            date: details.date,
            start_time: details.start_time,
            end_time: details.end_time,
            duration_minutes: None,
            price_pence: details.price_pence,
            location: details.location,
            instructor: details.instructor,
            level: details.level,
            max_capacity: details.max_capacity,
            is_active: details.is_active,
            created_at: now,
            updated_at: now,
        };
        occurrence.refresh_duration();
        Ok(occurrence)
    }

    /// Applies staff edits. The caller is responsible for re-resolving the
    /// slug when the title is part of the change set.
    pub fn apply(&mut self, changes: ClassChanges, now: Timestamp) -> Result<(), ValidationError> {
        if let Some(title) = &changes.title {
            validate_title(title)?;
        }
        if let Some(price) = changes.price_pence {
            validate_price(price)?;
        }
        if let Some(capacity) = changes.max_capacity {
            validate_capacity(capacity)?;
        }

        if let Some(title) = changes.title {
            self.title = title.trim().to_string();
        }
        if let Some(description) = changes.description {
            self.description = Some(description);
        }
        if let Some(date) = changes.date {
            self.date = date;
        }
        if let Some(start) = changes.start_time {
            self.start_time = Some(start);
        }
        if let Some(end) = changes.end_time {
            self.end_time = Some(end);
        }
        if let Some(price) = changes.price_pence {
            self.price_pence = price;
        }
        if let Some(location) = changes.location {
            self.location = Some(location);
        }
        if let Some(instructor) = changes.instructor {
            self.instructor = Some(instructor);
        }
        if let Some(level) = changes.level {
            self.level = Some(level);
        }
        if let Some(capacity) = changes.max_capacity {
            self.max_capacity = capacity;
        }
        if let Some(active) = changes.is_active {
            self.is_active = active;
        }

        self.refresh_duration();
        self.updated_at = now;
        Ok(())
    }

    /// Midnight UTC on the class date. Booking windows are measured from
    /// here, not from the start time.
    pub fn date_instant(&self) -> Timestamp {
        Timestamp::at(self.date, NaiveTime::MIN)
    }

    /// Price in decimal major units.
    pub fn price(&self) -> f64 {
        to_major_units(self.price_pence)
    }

    /// Places left given the number of bookings already holding a spot.
    pub fn spots_remaining(&self, taken: u32) -> u32 {
        self.max_capacity.saturating_sub(taken)
    }

    fn refresh_duration(&mut self) {
        self.duration_minutes = match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => duration_minutes(start, end),
            _ => None,
        };
    }
}

fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::empty_field("title"));
    }
    Ok(())
}

fn validate_price(price_pence: i64) -> Result<(), ValidationError> {
    if price_pence <= 0 {
        return Err(ValidationError::out_of_range("price", 1, i64::MAX, price_pence));
    }
    Ok(())
}

fn validate_capacity(capacity: u32) -> Result<(), ValidationError> {
    if capacity == 0 {
        return Err(ValidationError::out_of_range("max_capacity", 1, u32::MAX as i64, 0));
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// An active evening class on the given date, priced at £25.
    pub fn class_on(date: NaiveDate) -> ClassOccurrence {
        ClassOccurrence::create(
            ClassOccurrenceId::new(),
            ClassDetails {
                title: "Salsa Beginners".to_string(),
                description: None,
                date,
                start_time: NaiveTime::from_hms_opt(19, 0, 0),
                end_time: NaiveTime::from_hms_opt(20, 0, 0),
                price_pence: 2500,
                location: Some("Studio 1".to_string()),
                instructor: None,
                level: Some("beginner".to_string()),
                max_capacity: 12,
                is_active: true,
            },
            "salsa-beginners".to_string(),
            Timestamp::now(),
        )
        .unwrap()
    }
}

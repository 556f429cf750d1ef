//! Time-of-day parsing and class duration calculation.

use chrono::{NaiveTime, Timelike};

/// Parses the time formats staff type into the CMS.
///
/// Accepts `"3"` (hour only), `"14:30"`, `"14:30:00"`, and 12-hour forms
/// such as `"2:30 PM"`, `"2pm"` or `"12 AM"`.
pub fn parse_time_of_day(input: &str) -> Option<NaiveTime> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    let upper = trimmed.to_ascii_uppercase();
    let (clock, meridiem) = if let Some(rest) = upper.strip_suffix("AM") {
        (rest.trim_end(), Some(false))
    } else if let Some(rest) = upper.strip_suffix("PM") {
        (rest.trim_end(), Some(true))
    } else {
        (upper.as_str(), None)
    };

    let mut parts = clock.split(':');
    let hours: u32 = parse_digits(parts.next()?, 1, 2)?;
    let minutes: u32 = match parts.next() {
        Some(m) => parse_digits(m, 2, 2)?,
        None => 0,
    };
    let seconds: u32 = match parts.next() {
        Some(s) if meridiem.is_none() => parse_digits(s, 2, 2)?,
        Some(_) => return None,
        None => 0,
    };
    if parts.next().is_some() {
        return None;
    }

    let hours = match meridiem {
        Some(is_pm) => {
            if hours == 0 || hours > 12 {
                return None;
            }
            match (is_pm, hours) {
                (true, 12) => 12,
                (true, h) => h + 12,
                (false, 12) => 0,
                (false, h) => h,
            }
        }
        None => hours,
    };

    NaiveTime::from_hms_opt(hours, minutes, seconds)
}

fn parse_digits(s: &str, min_len: usize, max_len: usize) -> Option<u32> {
    if s.len() < min_len || s.len() > max_len || !s.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Length of a class in whole minutes.
///
/// An end time earlier than the start is taken to fall on the next day.
/// Returns `None` when the two times are equal.
pub fn duration_minutes(start: NaiveTime, end: NaiveTime) -> Option<u32> {
    let start_secs = start.num_seconds_from_midnight() as i64;
    let mut end_secs = end.num_seconds_from_midnight() as i64;
    if end_secs < start_secs {
        end_secs += 24 * 60 * 60;
    }

    let minutes = ((end_secs - start_secs) as f64 / 60.0).round() as i64;
    if minutes > 0 {
        u32::try_from(minutes).ok()
    } else {
        None
    }
}

//! Existing appointments and lenient intake from caller payloads.
//!
//! Appointment lists usually arrive as JSON fetched by the caller. Intake
//! never fails: a payload that is not an array counts as no appointments, a
//! record without a usable start time is dropped, and a record with an
//! unusable duration keeps its start and falls back to the default duration
//! when it is counted.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::overlap::Interval;

/// Keys accepted for an appointment's start time, in lookup order.
const START_KEYS: &[&str] = &["startTime", "start_time", "start"];

/// Keys accepted for an appointment's duration, in lookup order.
const DURATION_KEYS: &[&str] = &[
    "durationMinutes",
    "duration_minutes",
    "relatedServiceDuration",
    "duration",
];

/// Naive formats tried after RFC 3339.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// An already-booked appointment on the evaluated day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExistingAppointment {
    pub start: NaiveDateTime,
    /// Booked duration. `None`, zero and negative values mean "use the
    /// configured default" when the appointment is counted.
    pub duration_minutes: Option<i64>,
}

impl ExistingAppointment {
    pub fn new(start: NaiveDateTime, duration_minutes: i64) -> Self {
        Self {
            start,
            duration_minutes: Some(duration_minutes),
        }
    }

    /// An appointment whose duration was not supplied.
    pub fn without_duration(start: NaiveDateTime) -> Self {
        Self {
            start,
            duration_minutes: None,
        }
    }

    /// Duration actually counted for this appointment.
    pub fn effective_duration_minutes(&self, default_minutes: i64) -> i64 {
        match self.duration_minutes {
            Some(minutes) if minutes > 0 => minutes,
            Some(minutes) => {
                warn!(
                    start = %self.start,
                    duration_minutes = minutes,
                    default_minutes,
                    "appointment duration not positive, using default"
                );
                default_minutes
            }
            None => default_minutes,
        }
    }

    /// The busy interval `[start, start + duration)`, or `None` when the end
    /// cannot be represented.
    pub fn interval(&self, default_minutes: i64) -> Option<Interval> {
        let minutes = self.effective_duration_minutes(default_minutes);
        let end = Duration::try_minutes(minutes).and_then(|d| self.start.checked_add_signed(d));
        match end {
            Some(end) => Some(Interval {
                start: self.start,
                end,
            }),
            None => {
                warn!(start = %self.start, duration_minutes = minutes, "appointment end out of range, skipping");
                None
            }
        }
    }
}

/// Use `minutes` when it is positive, otherwise `default_minutes`.
pub fn normalize_duration(minutes: Option<i64>, default_minutes: i64) -> i64 {
    match minutes {
        Some(m) if m > 0 => m,
        Some(m) => {
            warn!(duration_minutes = m, default_minutes, "service duration not positive, using default");
            default_minutes
        }
        None => {
            debug!(default_minutes, "no service duration given, using default");
            default_minutes
        }
    }
}

/// Parse a timestamp into a local wall-clock instant.
///
/// Accepts RFC 3339 (the written local time is kept and the offset dropped)
/// and naive `YYYY-MM-DDTHH:MM[:SS[.fff]]`, with either `T` or a space as the
/// separator.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

/// Parse a calendar day from `YYYY-MM-DD` or from any timestamp accepted by
/// [`parse_timestamp`].
pub fn parse_day(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_timestamp(s).map(|dt| dt.date()))
}

/// Read a duration in minutes from a JSON number or numeric string.
///
/// Fractional values are truncated to whole minutes. Returns `None` for
/// anything that does not amount to at least one minute.
pub fn duration_from_json(value: &Value) -> Option<i64> {
    let minutes = match value {
        Value::Number(n) => match n.as_i64() {
            Some(i) => Some(i as f64),
            None => n.as_f64(),
        },
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;

    if minutes.is_finite() && minutes >= 1.0 && minutes <= i64::MAX as f64 {
        Some(minutes.trunc() as i64)
    } else {
        None
    }
}

/// Build the appointment list from a caller payload.
///
/// Anything other than a JSON array yields an empty list. Array elements
/// that are not objects, or that lack a parseable start time, are skipped.
pub fn appointments_from_json(value: &Value) -> Vec<ExistingAppointment> {
    let items = match value {
        Value::Array(items) => items,
        other => {
            warn!(
                kind = json_kind(other),
                "appointments payload is not a list, treating as empty"
            );
            return Vec::new();
        }
    };

    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| match item {
            Value::Object(record) => appointment_from_record(index, record),
            other => {
                warn!(index, kind = json_kind(other), "appointment record is not an object, skipping");
                None
            }
        })
        .collect()
}

fn appointment_from_record(index: usize, record: &Map<String, Value>) -> Option<ExistingAppointment> {
    let Some(raw_start) = first_present(record, START_KEYS) else {
        warn!(index, "appointment has no start time, skipping");
        return None;
    };
    let Some(start) = raw_start.as_str().and_then(parse_timestamp) else {
        warn!(index, start = %raw_start, "appointment start time unparseable, skipping");
        return None;
    };

    let duration_minutes = match first_present(record, DURATION_KEYS) {
        Some(raw) => {
            let parsed = duration_from_json(raw);
            if parsed.is_none() {
                warn!(index, duration = %raw, "appointment duration invalid, default will apply");
            }
            parsed
        }
        None => None,
    };

    Some(ExistingAppointment {
        start,
        duration_minutes,
    })
}

/// First key in `keys` whose value is present and not `null`.
fn first_present<'a>(record: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| record.get(*key))
        .find(|value| !value.is_null())
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

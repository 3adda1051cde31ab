//! Bookable slot computation for one working day.
//!
//! Candidate start times are laid on a fixed grid from the work-day start.
//! A candidate is offered when it has not already ended, fits inside the
//! work-day window, and fewer than `capacity` existing appointments overlap it.
//!
//! The public entry points never fail. Malformed input is defaulted or
//! skipped with a log line, and any internal fault is logged and turned into
//! an empty result. [`try_find_available_slots`] exposes the strict variant.

use std::fmt;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Serialize, Serializer};
use serde_json::Value;
use tracing::{debug, error, instrument, warn};

use crate::appointment::{
    appointments_from_json, duration_from_json, normalize_duration, parse_day, ExistingAppointment,
};
use crate::clock::Clock;
use crate::config::SlotConfig;
use crate::error::{Result, SlotError};
use crate::overlap::{count_overlapping, find_overlapping, Interval, Overlap};

/// A bookable slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailableSlot {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Existing appointments overlapping this slot, always below capacity.
    pub overlapping: usize,
}

impl AvailableSlot {
    /// Start time as 24-hour `HH:MM`.
    pub fn label(&self) -> String {
        self.start.format("%H:%M").to_string()
    }
}

/// Why a particular start time is or is not offered.
///
/// Serializes as the string returned by [`SlotStatus::as_str`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotStatus {
    Bookable,
    /// The slot ends before the current instant.
    Past,
    /// The slot starts before the window opens or ends after it closes.
    OutsideWindow,
    /// The start time is not on the slot grid.
    OffGrid,
    /// Capacity is already reached for part of the slot.
    Full,
}

impl SlotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotStatus::Bookable => "bookable",
            SlotStatus::Past => "past",
            SlotStatus::OutsideWindow => "outside_window",
            SlotStatus::OffGrid => "off_grid",
            SlotStatus::Full => "full",
        }
    }
}

impl fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SlotStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Diagnostic view of one candidate start time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotExplanation {
    pub slot: Interval,
    pub status: SlotStatus,
    pub capacity: u32,
    pub overlaps: Vec<Overlap>,
}

/// Bookable start times for `day` as `HH:MM` strings, ascending.
///
/// # Arguments
///
/// * `day` - The calendar day. `None` yields no slots.
/// * `appointments` - Existing bookings on that day. `None` counts as none.
/// * `service_duration_minutes` - Length of the service to book. Missing or
///   non-positive values fall back to `config.default_duration_minutes`.
/// * `config` - Capacity, window and grid; invalid fields fall back to defaults.
/// * `clock` - Source of "now" for the past-time rule.
pub fn compute_available_slots(
    day: Option<NaiveDate>,
    appointments: Option<&[ExistingAppointment]>,
    service_duration_minutes: Option<i64>,
    config: &SlotConfig,
    clock: &dyn Clock,
) -> Vec<String> {
    find_available_slots(day, appointments, service_duration_minutes, config, clock)
        .iter()
        .map(AvailableSlot::label)
        .collect()
}

/// Like [`compute_available_slots`], returning full slot details.
#[instrument(level = "debug", skip(appointments, config, clock))]
pub fn find_available_slots(
    day: Option<NaiveDate>,
    appointments: Option<&[ExistingAppointment]>,
    service_duration_minutes: Option<i64>,
    config: &SlotConfig,
    clock: &dyn Clock,
) -> Vec<AvailableSlot> {
    let Some(day) = day else {
        warn!("no day given, returning no slots");
        return Vec::new();
    };
    let appointments: &[ExistingAppointment] = match appointments {
        Some(list) => list,
        None => {
            warn!("no appointment list given, treating as empty");
            &[]
        }
    };

    match try_find_available_slots(
        day,
        appointments,
        service_duration_minutes,
        config,
        clock.now(),
    ) {
        Ok(slots) => {
            debug!(%day, slots = slots.len(), "slot scan finished");
            slots
        }
        Err(e) => {
            error!(%day, error = %e, "slot scan failed, returning no slots");
            Vec::new()
        }
    }
}

/// Strict slot scan.
///
/// Input defaulting is identical to [`find_available_slots`]; the difference
/// is that date arithmetic that leaves chrono's representable range is
/// returned as `SlotError::Arithmetic` instead of being absorbed.
pub fn try_find_available_slots(
    day: NaiveDate,
    appointments: &[ExistingAppointment],
    service_duration_minutes: Option<i64>,
    config: &SlotConfig,
    now: NaiveDateTime,
) -> Result<Vec<AvailableSlot>> {
    let config = config.sanitized();
    let default_minutes = i64::from(config.default_duration_minutes);
    let duration = service_duration(service_duration_minutes, default_minutes)?;
    let step = Duration::minutes(i64::from(config.slot_interval_minutes));
    let (work_start, work_end) = work_day(day, &config)?;
    let capacity = config.capacity as usize;

    let busy: Vec<Interval> = appointments
        .iter()
        .filter_map(|a| a.interval(default_minutes))
        .collect();

    let mut slots = Vec::with_capacity(config.max_slots());
    let mut start = work_start;
    while start < work_end {
        let candidate = Interval {
            start,
            end: shift(start, duration)?,
        };

        if candidate.end < now {
            debug!(start = %candidate.start, "slot already over");
        } else if candidate.end > work_end {
            // Later starts end even later.
            break;
        } else {
            let overlapping = count_overlapping(&candidate, &busy);
            if overlapping < capacity {
                slots.push(AvailableSlot {
                    start: candidate.start,
                    end: candidate.end,
                    overlapping,
                });
            } else {
                debug!(start = %candidate.start, overlapping, capacity, "slot at capacity");
            }
        }

        start = shift(start, step)?;
    }

    Ok(slots)
}

/// Explain whether the slot starting at `at` on `day` is offered.
///
/// Applies the same defaulting and rules as [`find_available_slots`], so a
/// start time is `Bookable` here exactly when it appears in that list.
pub fn explain_slot(
    day: NaiveDate,
    at: NaiveTime,
    appointments: &[ExistingAppointment],
    service_duration_minutes: Option<i64>,
    config: &SlotConfig,
    clock: &dyn Clock,
) -> Result<SlotExplanation> {
    let config = config.sanitized();
    let default_minutes = i64::from(config.default_duration_minutes);
    let duration = service_duration(service_duration_minutes, default_minutes)?;
    let (work_start, work_end) = work_day(day, &config)?;

    let start = day.and_time(at);
    let slot = Interval {
        start,
        end: shift(start, duration)?,
    };
    let overlaps = find_overlapping(&slot, appointments, default_minutes);
    let grid_seconds = i64::from(config.slot_interval_minutes) * 60;

    let status = if start < work_start || start >= work_end || slot.end > work_end {
        SlotStatus::OutsideWindow
    } else if (start - work_start).num_seconds() % grid_seconds != 0 {
        SlotStatus::OffGrid
    } else if slot.end < clock.now() {
        SlotStatus::Past
    } else if overlaps.len() >= config.capacity as usize {
        SlotStatus::Full
    } else {
        SlotStatus::Bookable
    };

    Ok(SlotExplanation {
        slot,
        status,
        capacity: config.capacity,
        overlaps,
    })
}

/// [`compute_available_slots`] over a raw caller payload.
///
/// `day` is parsed with [`parse_day`], `appointments` with
/// [`appointments_from_json`] and `service_duration` with
/// [`duration_from_json`]; whatever does not parse is defaulted or skipped.
pub fn compute_available_slots_from_json(
    day: Option<&str>,
    appointments: &Value,
    service_duration: &Value,
    config: &SlotConfig,
    clock: &dyn Clock,
) -> Vec<String> {
    find_available_slots_from_json(day, appointments, service_duration, config, clock)
        .iter()
        .map(AvailableSlot::label)
        .collect()
}

/// [`find_available_slots`] over a raw caller payload.
pub fn find_available_slots_from_json(
    day: Option<&str>,
    appointments: &Value,
    service_duration: &Value,
    config: &SlotConfig,
    clock: &dyn Clock,
) -> Vec<AvailableSlot> {
    let day = day.and_then(|raw| {
        let parsed = parse_day(raw);
        if parsed.is_none() {
            warn!(day = raw, "day unparseable");
        }
        parsed
    });
    let appointments = appointments_from_json(appointments);
    let duration = duration_from_json(service_duration);
    if duration.is_none() && !service_duration.is_null() {
        warn!(duration = %service_duration, "service duration invalid, using default");
    }

    find_available_slots(day, Some(appointments.as_slice()), duration, config, clock)
}

fn service_duration(minutes: Option<i64>, default_minutes: i64) -> Result<Duration> {
    let minutes = normalize_duration(minutes, default_minutes);
    Duration::try_minutes(minutes)
        .ok_or_else(|| SlotError::Arithmetic(format!("service duration of {minutes} minutes")))
}

/// Opening and closing instants of the work-day window on `day`.
fn work_day(day: NaiveDate, config: &SlotConfig) -> Result<(NaiveDateTime, NaiveDateTime)> {
    Ok((
        day_at_hour(day, config.start_hour)?,
        day_at_hour(day, config.end_hour)?,
    ))
}

/// `day` at `hour:00:00.000`; hour 24 is midnight at the end of `day`.
fn day_at_hour(day: NaiveDate, hour: u32) -> Result<NaiveDateTime> {
    shift(day.and_time(NaiveTime::MIN), Duration::hours(i64::from(hour)))
        .map_err(|_| SlotError::InvalidDay(format!("{day} has no hour {hour}")))
}

fn shift(instant: NaiveDateTime, by: Duration) -> Result<NaiveDateTime> {
    instant
        .checked_add_signed(by)
        .ok_or_else(|| SlotError::Arithmetic(format!("{instant} + {}s", by.num_seconds())))
}

//! Half-open interval overlap between candidate slots and booked appointments.
//!
//! Adjacent intervals (one ends exactly when the other starts) do NOT overlap.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::appointment::ExistingAppointment;

/// A `[start, end)` time range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Interval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Interval {
    /// Two intervals overlap iff `self.start < other.end && self.end > other.start`.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && self.end > other.start
    }

    /// Length of the shared part of both intervals, 0 when they do not overlap.
    pub fn overlap_minutes(&self, other: &Interval) -> i64 {
        if !self.overlaps(other) {
            return 0;
        }
        let overlap_start = self.start.max(other.start);
        let overlap_end = self.end.min(other.end);
        (overlap_end - overlap_start).num_minutes()
    }
}

/// A booked appointment that collides with a candidate slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overlap {
    pub appointment: ExistingAppointment,
    /// The appointment's busy interval after duration defaulting.
    pub busy: Interval,
    pub overlap_minutes: i64,
}

/// Number of busy intervals overlapping `candidate`.
///
/// Every interval counts on its own; duplicates are not merged.
pub fn count_overlapping(candidate: &Interval, busy: &[Interval]) -> usize {
    busy.iter().filter(|b| candidate.overlaps(b)).count()
}

/// All appointments overlapping `candidate`, in input order.
///
/// Appointments whose end cannot be computed are left out, exactly as they
/// are left out of the capacity count.
pub fn find_overlapping(
    candidate: &Interval,
    appointments: &[ExistingAppointment],
    default_duration_minutes: i64,
) -> Vec<Overlap> {
    appointments
        .iter()
        .filter_map(|appointment| {
            let busy = appointment.interval(default_duration_minutes)?;
            candidate.overlaps(&busy).then(|| Overlap {
                appointment: appointment.clone(),
                busy,
                overlap_minutes: candidate.overlap_minutes(&busy),
            })
        })
        .collect()
}

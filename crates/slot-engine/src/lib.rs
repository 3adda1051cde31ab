//! # slot-engine
//!
//! Deterministic appointment slot availability for booking front-ends.
//!
//! Given a calendar day, the appointments already booked on it, and the
//! duration of the service a customer wants, the engine lists every start
//! time on the day's slot grid that still fits the working window, has not
//! already passed, and keeps the number of simultaneous appointments below a
//! shared capacity (for example three work bays).
//!
//! The engine is a set of pure functions: no I/O, no shared state, and the
//! current time comes from an injected [`Clock`].
//!
//! ## Quick start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use slot_engine::{compute_available_slots, ExistingAppointment, FixedClock, SlotConfig};
//!
//! let day = NaiveDate::from_ymd_opt(2026, 3, 16).unwrap();
//! let booked = vec![ExistingAppointment::new(day.and_hms_opt(9, 0, 0).unwrap(), 60)];
//! let clock = FixedClock(day.and_hms_opt(7, 0, 0).unwrap());
//!
//! let slots = compute_available_slots(Some(day), Some(booked.as_slice()), Some(60), &SlotConfig::default(), &clock);
//! assert_eq!(slots.first().map(String::as_str), Some("08:00"));
//! assert_eq!(slots.last().map(String::as_str), Some("17:00"));
//! assert_eq!(slots.len(), 19);
//! ```
//!
//! ## Modules
//!
//! - [`calculator`] - slot scan, `HH:MM` formatting, per-slot explanations
//! - [`overlap`] - half-open interval overlap and counting
//! - [`appointment`] - booked appointments and lenient JSON intake
//! - [`config`] - window, grid and capacity settings
//! - [`clock`] - current-time sources
//! - [`error`] - Error types

pub mod appointment;
pub mod calculator;
pub mod clock;
pub mod config;
pub mod error;
pub mod overlap;

pub use appointment::{appointments_from_json, parse_day, parse_timestamp, ExistingAppointment};
pub use calculator::{
    compute_available_slots, compute_available_slots_from_json, explain_slot, find_available_slots,
    find_available_slots_from_json, try_find_available_slots, AvailableSlot, SlotExplanation,
    SlotStatus,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::SlotConfig;
pub use error::SlotError;

//! Error types for slot-engine operations.
//!
//! The public calculator functions never return these: they absorb every
//! error, log it, and degrade to an empty slot list. `SlotError` surfaces
//! from strict configuration validation and from the internal scan.

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum SlotError {
    #[error("Invalid day: {0}")]
    InvalidDay(String),

    #[error("Invalid work-day window: start hour {start_hour} must be before end hour {end_hour} (max 24)")]
    InvalidWindow { start_hour: u32, end_hour: u32 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Date arithmetic overflow: {0}")]
    Arithmetic(String),
}

pub type Result<T> = std::result::Result<T, SlotError>;

//! WASM bindings for slot-engine.
//!
//! Exposes slot computation to the booking form in the browser via
//! `wasm-bindgen`. Appointment lists and options are passed as JSON strings.
//! Only text that is not JSON at all is rejected; everything inside a
//! well-formed payload is defaulted or skipped the same way the library does,
//! so the form always has a (possibly empty) list to render.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p slot-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir packages/slot-engine-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/slot_engine_wasm.wasm
//! ```

use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::{Number, Value};
use slot_engine::{
    find_available_slots_from_json, parse_timestamp, AvailableSlot, Clock, FixedClock, SlotConfig,
    SystemClock,
};
use tracing::warn;
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AvailableSlotDto {
    label: String,
    start: String,
    end: String,
    overlapping: usize,
}

impl From<&AvailableSlot> for AvailableSlotDto {
    fn from(s: &AvailableSlot) -> Self {
        Self {
            label: s.label(),
            start: format_local(s.start),
            end: format_local(s.end),
            overlapping: s.overlapping,
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers (plain Rust, no JsValue, so they run natively under `cargo test`)
// ---------------------------------------------------------------------------

fn format_local(dt: NaiveDateTime) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// Parse one JSON argument. `null`/`undefined` and blank text read as `null`.
fn parse_json(what: &str, json: Option<&str>) -> Result<Value, String> {
    match json.map(str::trim) {
        None | Some("") => Ok(Value::Null),
        Some(json) => serde_json::from_str(json).map_err(|e| format!("Invalid {} JSON: {}", what, e)),
    }
}

/// The `now` (or `nowIso`) option pins the clock; absent or unparseable means
/// the browser clock.
fn clock_for(options: &Value) -> Box<dyn Clock> {
    match options.get("now").or_else(|| options.get("nowIso")) {
        None | Some(Value::Null) => Box::new(SystemClock),
        Some(raw) => match raw.as_str().and_then(parse_timestamp) {
            Some(now) => Box::new(FixedClock(now)),
            None => {
                warn!(now = %raw, "unparseable now option, using the current time");
                Box::new(SystemClock)
            }
        },
    }
}

/// A JS number (possibly `undefined` or NaN) as a JSON duration value.
fn duration_value(minutes: Option<f64>) -> Value {
    minutes
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

fn scan(
    day: Option<&str>,
    appointments_json: Option<&str>,
    service_duration_minutes: Option<f64>,
    options_json: Option<&str>,
) -> Result<Vec<AvailableSlot>, String> {
    let appointments = parse_json("appointments", appointments_json)?;
    let options = parse_json("options", options_json)?;
    let config = SlotConfig::from_json_value(&options);
    let clock = clock_for(&options);

    Ok(find_available_slots_from_json(
        day,
        &appointments,
        &duration_value(service_duration_minutes),
        &config,
        clock.as_ref(),
    ))
}

fn slot_labels_json(
    day: Option<&str>,
    appointments_json: Option<&str>,
    service_duration_minutes: Option<f64>,
    options_json: Option<&str>,
) -> Result<String, String> {
    let slots = scan(day, appointments_json, service_duration_minutes, options_json)?;
    let labels: Vec<String> = slots.iter().map(AvailableSlot::label).collect();
    serde_json::to_string(&labels).map_err(|e| format!("Serialization error: {}", e))
}

fn slot_details_json(
    day: Option<&str>,
    appointments_json: Option<&str>,
    service_duration_minutes: Option<f64>,
    options_json: Option<&str>,
) -> Result<String, String> {
    let slots = scan(day, appointments_json, service_duration_minutes, options_json)?;
    let dtos: Vec<AvailableSlotDto> = slots.iter().map(AvailableSlotDto::from).collect();
    serde_json::to_string(&dtos).map_err(|e| format!("Serialization error: {}", e))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Bookable start times for a day.
///
/// Returns a JSON string containing an array of `"HH:MM"` strings. Throws only
/// when `appointments_json` or `options_json` is not JSON at all.
///
/// # Arguments
/// - `day` -- Calendar day (e.g., "2026-03-16"); missing or unparseable yields `[]`
/// - `appointments_json` -- JSON array of `{startTime, durationMinutes}` records; `null`/`undefined` means none
/// - `service_duration_minutes` -- Service length; missing or non-positive means 60
/// - `options_json` -- Optional `{capacity, startHour, endHour, slotIntervalMinutes, defaultDurationMinutes, now}`;
///   unusable fields keep their defaults
#[wasm_bindgen(js_name = "computeAvailableSlots")]
pub fn compute_available_slots(
    day: Option<String>,
    appointments_json: Option<String>,
    service_duration_minutes: Option<f64>,
    options_json: Option<String>,
) -> Result<String, JsValue> {
    slot_labels_json(
        day.as_deref(),
        appointments_json.as_deref(),
        service_duration_minutes,
        options_json.as_deref(),
    )
    .map_err(|e| JsValue::from_str(&e))
}

/// Bookable slots for a day with their end times and overlap counts.
///
/// Takes the same arguments as `computeAvailableSlots`. Returns a JSON string
/// containing an array of `{label, start, end, overlapping}` objects.
#[wasm_bindgen(js_name = "findAvailableSlots")]
pub fn find_available_slots(
    day: Option<String>,
    appointments_json: Option<String>,
    service_duration_minutes: Option<f64>,
    options_json: Option<String>,
) -> Result<String, JsValue> {
    slot_details_json(
        day.as_deref(),
        appointments_json.as_deref(),
        service_duration_minutes,
        options_json.as_deref(),
    )
    .map_err(|e| JsValue::from_str(&e))
}

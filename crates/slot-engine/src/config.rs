//! Work-day window, slot granularity and capacity settings.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::appointment::json_kind;
use crate::error::{Result, SlotError};

pub const DEFAULT_CAPACITY: u32 = 3;
pub const DEFAULT_START_HOUR: u32 = 8;
pub const DEFAULT_END_HOUR: u32 = 18;
pub const DEFAULT_SLOT_INTERVAL_MINUTES: u32 = 30;
pub const DEFAULT_DURATION_MINUTES: u32 = 60;

/// Latest accepted end hour: a window may run up to midnight of the next day.
const MAX_END_HOUR: u32 = 24;

/// Settings for one slot computation.
///
/// Every field has a default, so a partial JSON document (or `{}`) is a valid
/// configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SlotConfig {
    /// Maximum number of appointments that may overlap any instant.
    pub capacity: u32,
    /// First hour of the work-day window (inclusive).
    pub start_hour: u32,
    /// Hour the work-day window closes; no slot may end after it.
    pub end_hour: u32,
    /// Distance between consecutive candidate start times.
    pub slot_interval_minutes: u32,
    /// Duration used for the service, and for any existing appointment,
    /// whose own duration is missing or not positive.
    pub default_duration_minutes: u32,
}

impl Default for SlotConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            start_hour: DEFAULT_START_HOUR,
            end_hour: DEFAULT_END_HOUR,
            slot_interval_minutes: DEFAULT_SLOT_INTERVAL_MINUTES,
            default_duration_minutes: DEFAULT_DURATION_MINUTES,
        }
    }
}

impl SlotConfig {
    /// Parse a JSON configuration document and validate it.
    ///
    /// # Errors
    /// Returns `SlotError::InvalidConfig` if the JSON does not describe a
    /// configuration, or any error from [`SlotConfig::validate`].
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SlotConfig =
            serde_json::from_str(json).map_err(|e| SlotError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read a configuration from an already-parsed JSON value, field by field.
    ///
    /// Unlike [`SlotConfig::from_json_str`] this never fails: a field that is
    /// absent, `null`, or not an unsigned 32-bit integer keeps its default,
    /// and anything other than an object yields the default configuration.
    /// Range checks are left to [`SlotConfig::sanitized`].
    pub fn from_json_value(value: &Value) -> Self {
        let mut config = SlotConfig::default();
        let fields = match value {
            Value::Object(fields) => fields,
            Value::Null => return config,
            other => {
                warn!(kind = json_kind(other), "slot options are not an object, using defaults");
                return config;
            }
        };

        read_u32(fields, "capacity", &mut config.capacity);
        read_u32(fields, "startHour", &mut config.start_hour);
        read_u32(fields, "endHour", &mut config.end_hour);
        read_u32(fields, "slotIntervalMinutes", &mut config.slot_interval_minutes);
        read_u32(fields, "defaultDurationMinutes", &mut config.default_duration_minutes);
        config
    }

    /// Check every constraint, failing on the first violation.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(SlotError::InvalidConfig("capacity must be at least 1".to_string()));
        }
        if !self.window_is_valid() {
            return Err(SlotError::InvalidWindow {
                start_hour: self.start_hour,
                end_hour: self.end_hour,
            });
        }
        if self.slot_interval_minutes == 0 {
            return Err(SlotError::InvalidConfig(
                "slot interval must be positive".to_string(),
            ));
        }
        if self.default_duration_minutes == 0 {
            return Err(SlotError::InvalidConfig(
                "default duration must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Copy of this configuration with each invalid field replaced by its
    /// default. A broken window resets both hours.
    pub fn sanitized(&self) -> Self {
        let mut config = *self;

        if config.capacity == 0 {
            warn!(capacity = config.capacity, "capacity below 1, using default");
            config.capacity = DEFAULT_CAPACITY;
        }
        if !config.window_is_valid() {
            warn!(
                start_hour = config.start_hour,
                end_hour = config.end_hour,
                "invalid work-day window, using default hours"
            );
            config.start_hour = DEFAULT_START_HOUR;
            config.end_hour = DEFAULT_END_HOUR;
        }
        if config.slot_interval_minutes == 0 {
            warn!("slot interval of 0 minutes, using default");
            config.slot_interval_minutes = DEFAULT_SLOT_INTERVAL_MINUTES;
        }
        if config.default_duration_minutes == 0 {
            warn!("default duration of 0 minutes, using built-in default");
            config.default_duration_minutes = DEFAULT_DURATION_MINUTES;
        }

        config
    }

    /// Upper bound on the number of slots this window can yield.
    pub fn max_slots(&self) -> usize {
        if !self.window_is_valid() || self.slot_interval_minutes == 0 {
            return 0;
        }
        let window_minutes = (self.end_hour - self.start_hour) * 60;
        window_minutes.div_ceil(self.slot_interval_minutes) as usize
    }

    fn window_is_valid(&self) -> bool {
        self.start_hour < self.end_hour && self.end_hour <= MAX_END_HOUR
    }
}

fn read_u32(fields: &Map<String, Value>, key: &str, target: &mut u32) {
    match fields.get(key) {
        None => {}
        Some(Value::Null) => debug!(key, "option is null, using default"),
        Some(raw) => match raw.as_u64().and_then(|n| u32::try_from(n).ok()) {
            Some(n) => *target = n,
            None => warn!(key, value = %raw, "option is not a whole non-negative number, using default"),
        },
    }
}

//! Tests for slot configuration parsing, validation and sanitizing.

use serde_json::json;
use slot_engine::{SlotConfig, SlotError};

#[test]
fn defaults_match_the_standard_working_day() {
    let config = SlotConfig::default();

    assert_eq!(config.capacity, 3);
    assert_eq!(config.start_hour, 8);
    assert_eq!(config.end_hour, 18);
    assert_eq!(config.slot_interval_minutes, 30);
    assert_eq!(config.default_duration_minutes, 60);
    assert!(config.validate().is_ok());
    assert_eq!(config.max_slots(), 20);
}

#[test]
fn empty_json_document_is_the_default_config() {
    assert_eq!(SlotConfig::from_json_str("{}").unwrap(), SlotConfig::default());
}

#[test]
fn partial_json_overrides_only_named_fields() {
    let config = SlotConfig::from_json_str(r#"{"capacity": 5, "endHour": 20}"#).unwrap();

    assert_eq!(config.capacity, 5);
    assert_eq!(config.end_hour, 20);
    assert_eq!(config.start_hour, 8);
    assert_eq!(config.slot_interval_minutes, 30);
}

#[test]
fn config_serializes_in_camel_case() {
    let json = serde_json::to_string(&SlotConfig::default()).unwrap();

    assert!(json.contains("\"slotIntervalMinutes\":30"));
    assert!(json.contains("\"defaultDurationMinutes\":60"));
}

#[test]
fn malformed_json_is_an_invalid_config() {
    let err = SlotConfig::from_json_str(r#"{"capacity": "three"}"#).unwrap_err();
    assert!(matches!(err, SlotError::InvalidConfig(_)));

    let err = SlotConfig::from_json_str("not json").unwrap_err();
    assert!(matches!(err, SlotError::InvalidConfig(_)));
}

#[test]
fn validate_rejects_each_broken_field() {
    let zero_capacity = SlotConfig {
        capacity: 0,
        ..SlotConfig::default()
    };
    assert!(matches!(zero_capacity.validate(), Err(SlotError::InvalidConfig(_))));

    let inverted = SlotConfig {
        start_hour: 18,
        end_hour: 8,
        ..SlotConfig::default()
    };
    assert_eq!(
        inverted.validate(),
        Err(SlotError::InvalidWindow {
            start_hour: 18,
            end_hour: 8
        })
    );

    let empty_window = SlotConfig {
        start_hour: 9,
        end_hour: 9,
        ..SlotConfig::default()
    };
    assert!(matches!(empty_window.validate(), Err(SlotError::InvalidWindow { .. })));

    let past_midnight = SlotConfig {
        end_hour: 25,
        ..SlotConfig::default()
    };
    assert!(matches!(past_midnight.validate(), Err(SlotError::InvalidWindow { .. })));

    let zero_interval = SlotConfig {
        slot_interval_minutes: 0,
        ..SlotConfig::default()
    };
    assert!(matches!(zero_interval.validate(), Err(SlotError::InvalidConfig(_))));

    let zero_duration = SlotConfig {
        default_duration_minutes: 0,
        ..SlotConfig::default()
    };
    assert!(matches!(zero_duration.validate(), Err(SlotError::InvalidConfig(_))));
}

#[test]
fn from_json_str_validates() {
    let err = SlotConfig::from_json_str(r#"{"startHour": 20, "endHour": 10}"#).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid work-day window: start hour 20 must be before end hour 10 (max 24)"
    );
}

#[test]
fn sanitized_keeps_valid_fields_and_replaces_broken_ones() {
    let config = SlotConfig {
        capacity: 0,
        start_hour: 10,
        end_hour: 30,
        slot_interval_minutes: 15,
        default_duration_minutes: 0,
    };

    let sanitized = config.sanitized();

    assert_eq!(
        sanitized,
        SlotConfig {
            capacity: 3,
            start_hour: 8,
            end_hour: 18,
            slot_interval_minutes: 15,
            default_duration_minutes: 60,
        }
    );
    assert!(sanitized.validate().is_ok());
}

#[test]
fn sanitized_valid_config_is_unchanged() {
    let config = SlotConfig {
        capacity: 1,
        start_hour: 0,
        end_hour: 24,
        slot_interval_minutes: 7,
        default_duration_minutes: 20,
    };
    assert_eq!(config.sanitized(), config);
}

#[test]
fn max_slots_rounds_up_partial_steps() {
    let config = SlotConfig {
        start_hour: 8,
        end_hour: 10,
        slot_interval_minutes: 50,
        ..SlotConfig::default()
    };
    assert_eq!(config.max_slots(), 3);

    let broken = SlotConfig {
        slot_interval_minutes: 0,
        ..SlotConfig::default()
    };
    assert_eq!(broken.max_slots(), 0);
}

// ── Lenient reading from JSON values ────────────────────────────────────────

#[test]
fn from_json_value_reads_whole_numbers() {
    let config = SlotConfig::from_json_value(&json!({
        "capacity": 2,
        "startHour": 9,
        "endHour": 17,
        "slotIntervalMinutes": 15,
        "defaultDurationMinutes": 45,
        "now": "2026-03-16T08:00",
    }));

    assert_eq!(
        config,
        SlotConfig {
            capacity: 2,
            start_hour: 9,
            end_hour: 17,
            slot_interval_minutes: 15,
            default_duration_minutes: 45,
        }
    );
}

#[test]
fn from_json_value_defaults_each_unusable_field() {
    for options in [
        json!({"capacity": "3"}),
        json!({"capacity": -1}),
        json!({"startHour": 8.5}),
        json!({"endHour": null}),
        json!({"slotIntervalMinutes": [30]}),
        json!({"defaultDurationMinutes": 5_000_000_000u64}),
    ] {
        assert_eq!(SlotConfig::from_json_value(&options), SlotConfig::default(), "{options}");
    }
}

#[test]
fn from_json_value_keeps_good_fields_next_to_bad_ones() {
    let config = SlotConfig::from_json_value(&json!({"capacity": "lots", "endHour": 20}));

    assert_eq!(config.capacity, 3);
    assert_eq!(config.end_hour, 20);
}

#[test]
fn from_json_value_non_object_is_the_default_config() {
    for options in [json!(null), json!([]), json!(4), json!("capacity=2")] {
        assert_eq!(SlotConfig::from_json_value(&options), SlotConfig::default(), "{options}");
    }
}

#[test]
fn from_json_value_leaves_range_checks_to_sanitized() {
    let config = SlotConfig::from_json_value(&json!({"capacity": 0, "startHour": 19}));

    assert_eq!(config.capacity, 0);
    assert_eq!(config.sanitized(), SlotConfig::default());
}

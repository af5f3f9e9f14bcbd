//! Property-based tests for opslog using proptest

use opslog::prelude::*;
use opslog::{DEFAULT_MAX_AGE_DAYS, DEFAULT_MAX_BACKUPS, DEFAULT_MAX_SIZE_MB};
use proptest::prelude::*;

fn any_level() -> impl Strategy<Value = LogLevel> {
    prop_oneof![
        Just(LogLevel::Debug),
        Just(LogLevel::Info),
        Just(LogLevel::Warn),
        Just(LogLevel::Error),
        Just(LogLevel::Fatal),
        Just(LogLevel::Panic),
    ]
}

fn any_threshold() -> impl Strategy<Value = LogLevel> {
    prop_oneof![
        Just(LogLevel::Debug),
        Just(LogLevel::Info),
        Just(LogLevel::Warn),
        Just(LogLevel::Error),
    ]
}

// ============================================================================
// LogLevel Tests
// ============================================================================

proptest! {
    /// Anything other than the four exact names resolves to Info
    #[test]
    fn test_unknown_level_names_resolve_to_info(name in "\\PC{0,12}") {
        prop_assume!(!["debug", "info", "warn", "error"].contains(&name.as_str()));
        prop_assert_eq!(LogLevel::resolve(&name), LogLevel::Info);
    }

    /// Fatal and Panic pass every configurable threshold
    #[test]
    fn test_terminal_levels_always_pass(threshold in any_threshold()) {
        prop_assert!(LogLevel::Fatal.passes(threshold));
        prop_assert!(LogLevel::Panic.passes(threshold));
    }

    /// Filtering agrees with the discriminant order
    #[test]
    fn test_passes_matches_ordering(level in any_level(), threshold in any_threshold()) {
        prop_assert_eq!(level.passes(threshold), level as u8 >= threshold as u8);
    }

    /// Display matches to_str and parses back
    #[test]
    fn test_log_level_display_roundtrip(level in any_level()) {
        let shown = format!("{}", level);
        prop_assert_eq!(shown.as_str(), level.to_str());
        prop_assert_eq!(shown.parse::<LogLevel>().unwrap(), level);
    }
}

// ============================================================================
// LoggerConfig Tests
// ============================================================================

proptest! {
    /// Only zero knobs are replaced by defaults
    #[test]
    fn test_defaults_replace_only_zero(
        size in -5i64..200,
        backups in -5i64..20,
        age in -5i64..400,
    ) {
        let config = LoggerConfig::default()
            .with_max_size_mb(size)
            .with_max_backups(backups)
            .with_max_age_days(age)
            .with_defaults();

        prop_assert_eq!(config.max_size_mb, if size == 0 { DEFAULT_MAX_SIZE_MB } else { size });
        prop_assert_eq!(config.max_backups, if backups == 0 { DEFAULT_MAX_BACKUPS } else { backups });
        prop_assert_eq!(config.max_age_days, if age == 0 { DEFAULT_MAX_AGE_DAYS } else { age });
    }

    /// Applying defaults twice changes nothing
    #[test]
    fn test_defaults_idempotent(size in -5i64..200, backups in -5i64..20, age in -5i64..400) {
        let once = LoggerConfig::default()
            .with_max_size_mb(size)
            .with_max_backups(backups)
            .with_max_age_days(age)
            .with_defaults();
        let twice = once.clone().with_defaults();
        prop_assert_eq!(once.max_size_mb, twice.max_size_mb);
        prop_assert_eq!(once.max_backups, twice.max_backups);
        prop_assert_eq!(once.max_age_days, twice.max_age_days);
    }
}

// ============================================================================
// LogEntry / Formatting Tests
// ============================================================================

proptest! {
    /// A record never spans more than one line
    #[test]
    fn test_message_is_single_line(message in "\\PC*|[a-z\\n\\r\\t ]{0,40}") {
        let entry = LogEntry::new(LogLevel::Info, message.clone());
        prop_assert_eq!(&entry.message, &message);

        let text = OutputFormat::Text
            .format(&entry, &TimestampFormat::Console, false)
            .unwrap();
        prop_assert_eq!(text.lines().count(), 1);

        let json = OutputFormat::Json
            .format(&entry, &TimestampFormat::Rfc3339, false)
            .unwrap();
        prop_assert_eq!(json.lines().count(), 1);
        let record: serde_json::Value = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(record["msg"].as_str().unwrap(), message.as_str());
    }

    /// JSON records always parse and keep the record's own keys intact
    #[test]
    fn test_json_record_keeps_reserved_keys(
        message in "\\PC{0,40}",
        keys in prop::collection::vec(
            prop_oneof![Just("time".to_string()), Just("msg".to_string()), "[a-z_]{1,10}"],
            0..6,
        ),
        level in any_level(),
    ) {
        let mut fields = Fields::new();
        for (i, key) in keys.iter().enumerate() {
            fields.insert(key.clone(), i as i64);
        }

        let entry = LogEntry::new(level, message)
            .with_location("src/worker.rs", 42)
            .with_fields(fields);
        let line = OutputFormat::Json
            .format(&entry, &TimestampFormat::Rfc3339, false)
            .unwrap();
        let record: serde_json::Value = serde_json::from_str(&line).unwrap();

        prop_assert_eq!(record["msg"].as_str().unwrap(), entry.message.as_str());
        prop_assert_eq!(record["level"].as_str().unwrap(), level.as_json_str());
        prop_assert_eq!(record["file"].as_str().unwrap(), "src/worker.rs:42");
        for key in &keys {
            if ["time", "level", "msg", "file"].contains(&key.as_str()) {
                let prefixed = format!("fields.{}", key);
                prop_assert!(record.get(&prefixed).is_some());
            } else {
                prop_assert!(record.get(key).is_some());
            }
        }
    }
}

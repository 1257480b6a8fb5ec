//! Tests for the logger configuration and file writer

use super::*;
use std::path::PathBuf;

mod config_tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = LoggerConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.console.enabled);
        assert!(!config.file.enabled);
        assert_eq!(config.file.format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_log_level() {
        let config = LoggerConfig {
            level: "loud".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(LoggerError::Config { .. })));
    }

    #[test]
    fn test_both_outputs_disabled() {
        let mut config = LoggerConfig::default();
        config.console.enabled = false;
        assert!(matches!(config.validate(), Err(LoggerError::NoOutput)));
    }

    #[test]
    fn test_empty_path_fails_only_when_enabled() {
        let mut file = FileConfig {
            path: PathBuf::new(),
            ..Default::default()
        };
        assert!(file.validate().is_ok());
        file.enabled = true;
        assert!(file.validate().is_err());
    }

    #[test]
    fn test_log_format_parsing() {
        assert_eq!("full".parse::<LogFormat>().unwrap(), LogFormat::Full);
        assert_eq!("COMPACT".parse::<LogFormat>().unwrap(), LogFormat::Compact);
        assert_eq!("Json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert!("yaml".parse::<LogFormat>().is_err());
        assert_eq!(LogFormat::default(), LogFormat::Full);
    }
}

mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn property_known_levels_validate(
            level in prop::sample::select(vec!["trace", "debug", "info", "warn", "error"]),
            upper in any::<bool>()
        ) {
            let level = if upper { level.to_uppercase() } else { level.to_string() };
            let config = LoggerConfig { level, ..Default::default() };
            prop_assert!(config.validate().is_ok());
        }

        #[test]
        fn property_unknown_levels_fail(level in "[a-z]{6,12}") {
            let config = LoggerConfig { level, ..Default::default() };
            prop_assert!(config.validate().is_err());
        }
    }
}

mod writer_tests {
    use super::*;
    use crate::logger::writer::FileWriter;
    use std::fs;
    use std::io::Write;
    use tempfile::tempdir;
    use tracing_subscriber::fmt::MakeWriter;

    fn file_config(path: PathBuf, append: bool) -> FileConfig {
        FileConfig {
            enabled: true,
            path,
            append,
            format: LogFormat::Full,
        }
    }

    #[test]
    fn test_writer_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b").join("arena.log");

        let writer = FileWriter::new(&file_config(nested.clone(), true)).unwrap();

        assert!(nested.parent().unwrap().exists());
        assert!(!writer.is_in_fallback_mode());
    }

    #[test]
    fn test_append_mode_preserves_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("arena.log");
        fs::write(&path, "first line\n").unwrap();

        let writer = FileWriter::new(&file_config(path.clone(), true)).unwrap();
        let mut guard = writer.make_writer();
        guard.write_all(b"second line\n").unwrap();
        guard.flush().unwrap();
        drop(guard);

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("first line"));
        assert!(content.contains("second line"));
    }

    #[test]
    fn test_truncate_mode_replaces_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("arena.log");
        fs::write(&path, "stale").unwrap();

        let writer = FileWriter::new(&file_config(path.clone(), false)).unwrap();
        let mut guard = writer.make_writer();
        guard.write_all(b"fresh").unwrap();
        drop(guard);

        assert_eq!(fs::read_to_string(&path).unwrap(), "fresh");
    }

    #[test]
    fn test_writer_rejects_directory_path() {
        let dir = tempdir().unwrap();
        assert!(FileWriter::new(&file_config(dir.path().to_path_buf(), true)).is_err());
    }
}

mod subscriber_tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn both_outputs(path: PathBuf, format: LogFormat) -> LoggerConfig {
        LoggerConfig {
            console: ConsoleConfig::new(true, false),
            file: FileConfig {
                enabled: true,
                path,
                append: false,
                format,
            },
            level: "info".to_string(),
        }
    }

    #[test]
    fn test_console_and_file_subscriber_for_every_format() {
        for format in [LogFormat::Full, LogFormat::Compact, LogFormat::Json] {
            let dir = tempdir().unwrap();
            let path = dir.path().join("arena.log");
            let config = both_outputs(path.clone(), format);

            let subscriber = both_subscriber(&config, EnvFilter::new("info")).unwrap();
            tracing::subscriber::with_default(subscriber, || {
                tracing::info!(user_id = "u-1", "User created");
                tracing::debug!("filtered out");
            });

            let content = fs::read_to_string(&path).unwrap();
            assert!(content.contains("User created"), "{}: {}", format.as_str(), content);
            assert!(!content.contains("filtered out"));
            assert!(!content.contains('\u{1b}'), "ANSI escape leaked into {}", format.as_str());
            if format == LogFormat::Json {
                let line = content.lines().next().unwrap();
                let value: serde_json::Value = serde_json::from_str(line).unwrap();
                assert_eq!(value["fields"]["message"], "User created");
            }
        }
    }
}

// armorpack: Obfuscated Bundle Packer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{LogConfig, LogLevel};
use tracing::Level;

#[test]
fn test_log_level_bounds() {
    assert!(LogLevel::new(0).is_ok());
    assert!(LogLevel::new(6).is_ok());
    assert!(LogLevel::new(7).is_err());
    assert_eq!(LogLevel::from_u8(9), None);
    assert_eq!(LogLevel::try_from(4).map(u8::from).ok(), Some(4));
}

#[test]
fn test_log_level_to_tracing() {
    let levels: Vec<_> = (0..=6)
        .map(|n| LogLevel::from_u8(n).and_then(LogLevel::to_tracing_level))
        .collect();
    assert_eq!(
        levels,
        vec![
            None,
            Some(Level::ERROR),
            Some(Level::WARN),
            Some(Level::INFO),
            Some(Level::DEBUG),
            Some(Level::TRACE),
            Some(Level::TRACE),
        ]
    );
}

#[test]
fn test_filter_strings() {
    insta::assert_snapshot!(LogLevel::INFO.to_filter_string(), @"warn,armorpack=info");
    insta::assert_snapshot!(LogLevel::DUMP.to_filter_string(), @"trace");
    insta::assert_snapshot!(LogLevel::SILENT.to_filter_string(), @"off");
}

#[test]
fn test_log_config_defaults() {
    let config = LogConfig::default();
    assert_eq!(config.console_level(), LogLevel::INFO);
    assert_eq!(config.file_level(), LogLevel::TRACE);
    assert!(config.log_file().is_none());
    assert!(!config.show_target());
}

#[test]
fn test_log_level_deserialize_rejects_out_of_range() {
    let ok: Result<LogLevel, _> = serde_json::from_str("5");
    assert_eq!(ok.ok(), Some(LogLevel::TRACE));

    let bad: Result<LogLevel, _> = serde_json::from_str("12");
    assert!(bad.is_err());
}

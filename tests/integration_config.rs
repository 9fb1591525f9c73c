// armorpack: Obfuscated Bundle Packer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for configuration loading.
//!
//! Tests the Config module with realistic TOML configurations.

use std::path::PathBuf;

use armorpack::config::{Config, ConfigLoader};
use armorpack::error::ConfigError;
use armorpack::logging::LogLevel;
use armorpack::pack::backend::Backend;

// =============================================================================
// Loading from TOML strings
// =============================================================================

#[test]
fn config_parse_empty_is_default() {
    let config = Config::parse("").unwrap();
    assert_eq!(config.pack.backend, Backend::PyInstaller);
    assert_eq!(config.tools.armor, ["pyarmor"]);
    assert_eq!(config.process.timeout(), None);
    assert_eq!(config.global.output_log_level, LogLevel::INFO);
}

#[test]
fn config_parse_full() {
    let toml = r#"
[global]
output_log_level = 2
file_log_level = 5
log_file = "armorpack.log"

[tools]
python = "python3.11"
armor = ["python3.11", "-m", "pyarmor.cli"]
runtime_module = "/opt/runtime/pytransform.py"

[process]
timeout_secs = 1800

[pack]
backend = "py2exe"
clean = true
"#;
    let config = Config::parse(toml).unwrap();

    let lines: Vec<_> = config
        .format_options()
        .iter()
        .map(|line| line.trim_end().to_string())
        .collect();
    insta::assert_snapshot!(lines.join("\n"), @r"
    global.dry              = false
    global.file_log_level   = 5
    global.log_file         = armorpack.log
    global.output_log_level = 2
    pack.backend            = py2exe
    pack.clean              = true
    process.timeout_secs    = 1800
    tools.armor             = python3.11 -m pyarmor.cli
    tools.python            = python3.11
    tools.runtime_module    = /opt/runtime/pytransform.py
    ");
}

#[test]
fn config_rejects_unknown_backend() {
    let err = Config::parse("[pack]\nbackend = \"nuitka\"").unwrap_err();
    assert!(format!("{err:#}").contains("expected one of PyInstaller, py2exe, py2app, cx_Freeze"));
}

#[test]
fn config_rejects_unknown_keys() {
    assert!(Config::parse("[tools]\npyarmor = \"x\"").is_err());
    assert!(Config::parse("[paths]\nprefix = \"/build\"").is_err());
}

#[test]
fn config_rejects_log_level_out_of_range() {
    assert!(Config::parse("[global]\noutput_log_level = 9").is_err());
}

// =============================================================================
// Layering
// =============================================================================

#[test]
fn config_later_files_override_earlier() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.toml");
    let second = dir.path().join("second.toml");
    std::fs::write(&first, "[pack]\nbackend = \"py2app\"\nclean = true\n").unwrap();
    std::fs::write(&second, "[pack]\nbackend = \"cx_Freeze\"\n").unwrap();

    let loader = ConfigLoader::new()
        .add_toml_file_optional(dir.path().join("armorpack.toml"))
        .add_toml_file(&first)
        .add_toml_file(&second);
    assert_eq!(loader.format_loaded_files().len(), 2);

    let config = loader.build().unwrap();
    assert_eq!(config.pack.backend, Backend::CxFreeze);
    assert!(config.pack.clean);
}

#[test]
fn config_set_beats_files() {
    let config = ConfigLoader::new()
        .add_toml_str("[tools]\npython = \"python3\"")
        .set_all(&["tools.python=/usr/bin/python3.12", "tools.runtime_module=rt/pytransform.py"])
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(config.tools.python, PathBuf::from("/usr/bin/python3.12"));
    assert_eq!(
        config.tools.runtime_module,
        Some(PathBuf::from("rt/pytransform.py"))
    );
}

#[test]
fn config_missing_required_file() {
    let result = ConfigLoader::new()
        .add_toml_file("/nonexistent/armorpack.toml")
        .build();
    assert!(result.is_err());
}

#[test]
fn config_set_without_equals() {
    let err = ConfigLoader::new().set_all(&["tools.python"]).err().unwrap();
    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::ParseError { .. })
    ));
}

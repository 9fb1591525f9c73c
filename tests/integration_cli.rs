// armorpack: Obfuscated Bundle Packer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for CLI parsing.
//!
//! Tests the CLI module with realistic command-line argument patterns.

use std::path::PathBuf;

use armorpack::cli::global::GlobalOptions;
use armorpack::cli::{Cli, Command};
use armorpack::config::Config;
use armorpack::pack::backend::Backend;
use clap::Parser;

// =============================================================================
// Version / config commands
// =============================================================================

#[test]
fn cli_version_alias() {
    let cli = Cli::try_parse_from(["armorpack", "-v"]).unwrap();
    assert!(matches!(cli.command, Some(Command::Version)));
}

#[test]
fn cli_options_and_inis() {
    let cli = Cli::try_parse_from(["armorpack", "--ini", "a.toml", "--ini", "b.toml", "inis"]).unwrap();
    assert!(matches!(cli.command, Some(Command::Inis)));
    assert_eq!(cli.global.inis, [PathBuf::from("a.toml"), PathBuf::from("b.toml")]);

    let cli = Cli::try_parse_from(["armorpack", "options"]).unwrap();
    assert!(matches!(cli.command, Some(Command::Options)));
}

#[test]
fn cli_no_command() {
    let cli = Cli::try_parse_from(["armorpack"]).unwrap();
    assert!(cli.command.is_none());
}

// =============================================================================
// Pack command
// =============================================================================

#[test]
fn cli_pack_backend_names_case_insensitive() {
    for (name, expected) in [
        ("PyInstaller", Backend::PyInstaller),
        ("pyinstaller", Backend::PyInstaller),
        ("py2exe", Backend::Py2exe),
        ("Py2App", Backend::Py2app),
        ("cx_freeze", Backend::CxFreeze),
    ] {
        let cli = Cli::try_parse_from(["armorpack", "pack", "-t", name, "hello.py"]).unwrap();
        let Some(Command::Pack(args)) = cli.command else {
            panic!("expected pack");
        };
        assert_eq!(args.backend, Some(expected), "{name}");
    }
}

#[test]
fn cli_pack_request_from_args() {
    let cli = Cli::try_parse_from([
        "armorpack",
        "--dry",
        "pack",
        "-t",
        "py2exe",
        "--setup",
        "tools/setup.py",
        "-O",
        "/out",
        "-e",
        "--bundle-files 1",
        "-x",
        "--exclude 'my tests'",
        "app/main.py",
    ])
    .unwrap();
    assert!(cli.global.dry);

    let Some(Command::Pack(args)) = cli.command else {
        panic!("expected pack");
    };
    let request = args.to_request(&Config::default()).unwrap();

    assert_eq!(request.backend, Backend::Py2exe);
    assert_eq!(request.entry, PathBuf::from("app/main.py"));
    assert_eq!(request.setup, Some(PathBuf::from("tools/setup.py")));
    assert_eq!(request.output, Some(PathBuf::from("/out")));
    assert_eq!(request.options, ["--bundle-files", "1"]);
    assert_eq!(request.xoptions, ["--exclude", "my tests"]);
    assert!(!request.clean);
}

#[test]
fn cli_pack_setup_has_no_short_flag() {
    // -s belongs to the global --set
    let cli = Cli::try_parse_from(["armorpack", "-s", "pack.clean=true", "pack", "hello.py"]).unwrap();
    assert_eq!(cli.global.options, ["pack.clean=true"]);
}

// =============================================================================
// Global options
// =============================================================================

#[test]
fn cli_overrides_file_level_falls_back() {
    let global = GlobalOptions {
        log_level: Some(2),
        log_file: Some(PathBuf::from("pack.log")),
        ..GlobalOptions::default()
    };

    insta::assert_snapshot!(global.to_config_overrides().join("\n"), @r"
    global.output_log_level=2
    global.file_log_level=2
    global.log_file=pack.log
    ");
}

#[test]
fn cli_overrides_apply_to_config() {
    let cli = Cli::try_parse_from([
        "armorpack",
        "-l",
        "4",
        "--file-log-level",
        "6",
        "-s",
        "tools.python=python3.11",
        "list",
    ])
    .unwrap();

    let config = Config::builder()
        .set_all(&cli.global.to_config_overrides())
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(config.global.output_log_level.as_u8(), 4);
    assert_eq!(config.global.file_log_level.as_u8(), 6);
    assert_eq!(config.tools.python, PathBuf::from("python3.11"));
}

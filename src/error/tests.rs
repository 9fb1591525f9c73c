// armorpack: Obfuscated Bundle Packer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{
    ConfigError, PackError, PackResult, ProcessError, SpecfileError, bail_out, precondition,
};

#[test]
fn test_config_error_display() {
    let err = ConfigError::MissingKey {
        section: "tools".to_string(),
        key: "python".to_string(),
    };
    insta::assert_snapshot!(err.to_string(), @"missing required config key 'python' in section '[tools]'");
}

#[test]
fn test_non_zero_exit_carries_output() {
    let err = ProcessError::NonZeroExit {
        what: "run setup script".to_string(),
        command: "python setup.py py2exe".to_string(),
        code: 1,
        output: "Traceback: boom".to_string(),
    };
    let text = err.to_string();
    assert!(text.contains("exited with code 1"));
    assert!(text.ends_with("Traceback: boom"));
}

#[test]
fn test_specfile_error_display() {
    let err = SpecfileError::NoAnchor {
        path: "hello.spec".to_string(),
        anchor: "pyz = PYZ(a.pure",
    };
    insta::assert_snapshot!(err.to_string(), @"unsupported specfile 'hello.spec': no line starting with 'pyz = PYZ(a.pure' found");
}

#[test]
fn test_boxed_conversions() {
    let err: PackError = ProcessError::Interrupted {
        command: "pyarmor".to_string(),
    }
    .into();
    assert!(matches!(err, PackError::Process(_)));

    let err: PackError = std::io::Error::other("disk").into();
    assert!(matches!(err, PackError::Io(_)));
}

#[test]
fn test_helpers() {
    assert_eq!(bail_out("stop").to_string(), "fatal error: stop");
    assert_eq!(
        precondition("no setup script setup.py found").to_string(),
        "precondition failed: no setup script setup.py found"
    );
}

#[test]
fn test_pack_error_size() {
    // Box<str> variants are 16 bytes; discriminant + alignment = 24 bytes
    let size = std::mem::size_of::<PackError>();
    assert!(size <= 24, "PackError is {size} bytes, expected <= 24");
}

#[test]
fn test_pack_result_size() {
    let size = std::mem::size_of::<PackResult<()>>();
    assert!(size <= 24, "PackResult<()> is {size} bytes, expected <= 24");
}

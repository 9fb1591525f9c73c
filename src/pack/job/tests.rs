// armorpack: Obfuscated Bundle Packer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::{Path, PathBuf};

use super::{PackRequest, PackageJob, split_options};
use crate::error::ConfigError;
use crate::pack::backend::{Backend, InterpreterInfo};

fn job(request: PackRequest) -> PackageJob {
    let info = InterpreterInfo {
        platform: "linux-x86_64".to_string(),
        major: 3,
        minor: 10,
    };
    let profile = request.backend.profile(Some(&info)).expect("profile");
    PackageJob::resolve(request, profile).expect("resolve")
}

#[test]
fn test_split_options() {
    assert!(split_options(None, "options").expect("none").is_empty());
    assert_eq!(
        split_options(Some("--onefile -n 'my app'"), "options").expect("split"),
        ["--onefile", "-n", "my app"]
    );

    let err = split_options(Some("--name 'open"), "xoptions").expect_err("unbalanced");
    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::InvalidValue { key, .. }) if key == "xoptions"
    ));
}

#[cfg(unix)]
#[test]
fn test_resolve_pyinstaller_defaults() {
    let job = job(PackRequest::builder()
        .with_backend(Backend::PyInstaller)
        .with_entry("/proj/src/hello.py")
        .with_options(vec!["--onefile".to_string()])
        .build());

    assert_eq!(job.src(), Path::new("/proj/src"));
    assert_eq!(job.entry(), "hello.py");
    assert_eq!(job.build(), Path::new("/proj/src"));
    assert_eq!(job.output(), Path::new("/proj/src/dist"));
    assert_eq!(job.project(), PathBuf::from("/proj/src/dist/obf"));
    assert_eq!(job.obfdist(), PathBuf::from("/proj/src/dist/obf/dist"));
    assert_eq!(job.specfile(), PathBuf::from("/proj/src/hello.spec"));
    assert_eq!(job.library_archive(), None);
    insta::assert_snapshot!(
        job.pack_command().join(" "),
        @"-m PyInstaller --distpath /proj/src/dist --onefile"
    );
}

#[cfg(unix)]
#[test]
fn test_resolve_library_backend_with_setup_and_relative_output() {
    let job = job(PackRequest::builder()
        .with_backend(Backend::Py2exe)
        .with_entry("/proj/src/./hello.py")
        .with_setup("/proj/build/make.py")
        .with_output("../out/")
        .with_clean(true)
        .build());

    assert_eq!(job.src(), Path::new("/proj/src"));
    assert_eq!(job.build(), Path::new("/proj/build"));
    assert_eq!(job.output(), Path::new("/proj/out"));
    assert_eq!(job.project(), PathBuf::from("/proj/build/obf"));
    assert_eq!(job.setup_script(), PathBuf::from("/proj/build/make.py"));
    assert_eq!(job.library_archive(), Some(PathBuf::from("/proj/out/library.zip")));
    assert!(job.clean());
}

#[cfg(unix)]
#[test]
fn test_resolve_cx_freeze_conventions() {
    let job = job(PackRequest::builder()
        .with_backend(Backend::CxFreeze)
        .with_entry("/proj/hello.py")
        .build());

    assert_eq!(job.setup_script(), PathBuf::from("/proj/setup.py"));
    assert_eq!(
        job.output(),
        Path::new("/proj/build/exe.linux-x86_64-3.10")
    );
    assert_eq!(
        job.library_archive(),
        Some(PathBuf::from("/proj/build/exe.linux-x86_64-3.10/python310.zip"))
    );
}

#[cfg(unix)]
#[test]
fn test_resolve_absolute_output_and_spec_override() {
    let job = job(PackRequest::builder()
        .with_backend(Backend::PyInstaller)
        .with_entry("/proj/src/hello.py")
        .with_setup("/proj/specs/custom.spec")
        .with_output("/srv/bundle")
        .build());

    assert_eq!(job.output(), Path::new("/srv/bundle"));
    assert_eq!(job.specfile(), PathBuf::from("/proj/specs/custom.spec"));
    assert_eq!(job.obfdist(), PathBuf::from("/srv/bundle/obf/dist"));
}

#[test]
fn test_resolve_bare_entry_uses_current_dir() {
    let job = job(PackRequest::builder()
        .with_backend(Backend::Py2app)
        .with_entry("hello.py")
        .build());

    let cwd = std::env::current_dir().expect("cwd");
    assert_eq!(job.src(), crate::utility::fs::path::normalize_path(&cwd));
    assert_eq!(job.output(), job.src().join("dist"));
}

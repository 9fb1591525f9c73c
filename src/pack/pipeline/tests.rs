// armorpack: Obfuscated Bundle Packer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use anyhow::Result;
use regex::Regex;

use super::{pack, prepare_job};
use crate::config::Config;
use crate::error::PackError;
use crate::pack::backend::Backend;
use crate::pack::job::PackRequest;
use crate::pack::tools::test_utils::{context, dry_run_lines, run_with_logs};

/// Dry-run messages without their fields.
fn dry_run_steps(logs: &str) -> Result<String> {
    let fields = Regex::new(r"\s[a-z_]+=.*$")?;
    Ok(dry_run_lines(logs)
        .lines()
        .map(|line| fields.replace(line, "").into_owned())
        .collect::<Vec<_>>()
        .join("\n"))
}

#[tokio::test(flavor = "current_thread")]
async fn test_descriptor_pipeline_dry_run() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let entry = dir.path().join("hello.py");
    std::fs::write(&entry, "print('hello')\n")?;

    let logs = run_with_logs(|| async {
        let ctx = context(Config::default(), true);
        let request = PackRequest::builder()
            .with_backend(Backend::PyInstaller)
            .with_entry(entry.clone())
            .with_clean(true)
            .build();
        let output = pack(&ctx, request).await?;
        assert_eq!(output, dir.path().join("dist"));
        Ok(())
    })
    .await?;

    insta::assert_snapshot!(dry_run_steps(&logs)?, @r"
    [dry-run] Would remove build path
    [dry-run] Would run obfuscation engine obfuscate for PyInstaller
    [dry-run] Would run PyInstaller spec file generation
    [dry-run] Would patch spec file
    [dry-run] Would run PyInstaller build
    ");
    assert!(!dir.path().join("dist").exists());
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn test_descriptor_pipeline_existing_spec_skips_generation() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let entry = dir.path().join("hello.py");
    std::fs::write(&entry, "")?;
    std::fs::write(dir.path().join("hello.spec"), "pyz = PYZ(a.pure)\n")?;

    let logs = run_with_logs(|| async {
        let ctx = context(Config::default(), true);
        let request = PackRequest::builder()
            .with_backend(Backend::PyInstaller)
            .with_entry(entry.clone())
            .build();
        pack(&ctx, request).await.map(|_| ())
    })
    .await?;

    let steps = dry_run_steps(&logs)?;
    assert!(!steps.contains("spec file generation"));
    assert!(logs.contains("hello-patched.spec"));
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn test_library_pipeline_dry_run() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let entry = dir.path().join("hello.py");
    std::fs::write(&entry, "print('hello')\n")?;
    std::fs::write(dir.path().join("setup.py"), "")?;

    let logs = run_with_logs(|| async {
        let ctx = context(Config::default(), true);
        let request = PackRequest::builder()
            .with_backend(Backend::Py2exe)
            .with_entry(entry.clone())
            .build();
        pack(&ctx, request).await.map(|_| ())
    })
    .await?;

    insta::assert_snapshot!(dry_run_steps(&logs)?, @r"
    [dry-run] Would run obfuscation engine init for py2exe
    [dry-run] Would run obfuscation engine config for py2exe
    [dry-run] Would run obfuscation engine build for py2exe
    [dry-run] Would swap in obfuscated entry
    [dry-run] Would run py2exe setup script
    [dry-run] Would rebuild library archive from obfuscated tree
    [dry-run] Would copy runtime files *.lic *.key _pytransform.*
    ");
    assert_eq!(std::fs::read_to_string(&entry)?, "print('hello')\n");
    Ok(())
}

#[tokio::test]
async fn test_library_pipeline_requires_setup_script() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let entry = dir.path().join("hello.py");
    std::fs::write(&entry, "")?;

    let ctx = context(Config::default(), true);
    let request = PackRequest::builder()
        .with_backend(Backend::Py2app)
        .with_entry(entry)
        .build();
    let err = pack(&ctx, request).await.expect_err("no setup script");

    assert!(matches!(
        err.downcast_ref::<PackError>(),
        Some(PackError::Precondition(_))
    ));
    assert!(err.to_string().contains("no setup script"));
    assert!(err.to_string().contains("setup.py"));
    Ok(())
}

#[tokio::test]
async fn test_prepare_job_probe_failure_stops_cx_freeze() {
    let mut config = Config::default();
    config.tools.python = "nonexistent_python_12345".into();
    let ctx = context(config, false);

    let request = PackRequest::builder()
        .with_backend(Backend::CxFreeze)
        .with_entry("/proj/hello.py")
        .build();
    let err = prepare_job(&ctx, request).await.expect_err("no interpreter");

    assert!(err.to_string().contains("nonexistent_python_12345"));
}

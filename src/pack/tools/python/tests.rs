// armorpack: Obfuscated Bundle Packer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::PathBuf;

use anyhow::Result;

use super::{COMPILE_BATCH, PythonTool};
use crate::config::Config;
use crate::pack::tools::Tool;
use crate::pack::tools::test_utils::{context, dry_run_lines, run_with_logs};

#[tokio::test(flavor = "current_thread")]
async fn test_compile_dry_run_batches() -> Result<()> {
    let sources: Vec<PathBuf> = (0..=COMPILE_BATCH)
        .map(|i| PathBuf::from(format!("/obf/m{i}.py")))
        .collect();

    let logs = run_with_logs(|| async {
        let ctx = context(Config::default(), true);
        PythonTool::compile(sources).run(&ctx).await
    })
    .await?;

    assert_eq!(dry_run_lines(&logs).lines().count(), 2);
    Ok(())
}

#[tokio::test]
async fn test_compile_nothing_runs_nothing() {
    let mut config = Config::default();
    config.tools.python = PathBuf::from("nonexistent_python_12345");
    let ctx = context(config, false);

    PythonTool::compile(Vec::new())
        .run(&ctx)
        .await
        .expect("no sources means no interpreter run");
}

#[cfg(unix)]
mod unix {
    use super::super::PythonTool;
    use crate::config::Config;
    use crate::pack::tools::Tool;
    use crate::pack::tools::test_utils::{context, write_script};

    #[tokio::test]
    async fn test_probe_parses_fake_interpreter() {
        let dir = tempfile::tempdir().expect("tempdir");
        let python = dir.path().join("python");
        write_script(&python, "echo 'linux-x86_64 3.10'\n");

        let mut config = Config::default();
        config.tools.python = python;
        let ctx = context(config, false);

        let info = PythonTool::probe(&ctx).await.expect("probe");
        assert_eq!(info.platform, "linux-x86_64");
        assert_eq!((info.major, info.minor), (3, 10));
    }

    #[tokio::test]
    async fn test_compile_passes_sources_as_arguments() {
        let dir = tempfile::tempdir().expect("tempdir");
        let python = dir.path().join("python");
        // argv: -c <script> files...; mimic py_compile by touching s + "c"
        write_script(&python, "shift 2\nfor f in \"$@\"; do : > \"${f}c\"; done\n");

        let a = dir.path().join("a.py");
        let b = dir.path().join("B.PY");
        std::fs::write(&a, "").expect("write");
        std::fs::write(&b, "").expect("write");

        let mut config = Config::default();
        config.tools.python = python;
        let ctx = context(config, false);

        PythonTool::compile(vec![a.clone(), b.clone()])
            .run(&ctx)
            .await
            .expect("compile");

        assert!(dir.path().join("a.pyc").exists());
        assert!(dir.path().join("B.PYc").exists());
    }
}

// armorpack: Obfuscated Bundle Packer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Runtime-support files shipped next to the bundle.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::pack::tools::ToolContext;
use crate::pack::tools::armor::RUNTIME_MODULE;
use crate::utility::fs::copy::copy_matching_async;

/// License, key and native loader files produced by the obfuscation engine.
pub const RUNTIME_PATTERNS: [&str; 3] = ["*.lic", "*.key", "_pytransform.*"];

/// The runtime module copied next to the entry during substitution.
///
/// `tools.runtime_module` wins; otherwise the engine's copy under `obfdist`.
#[must_use]
pub fn runtime_module(config: &Config, obfdist: &Path) -> PathBuf {
    config
        .tools
        .runtime_module
        .clone()
        .unwrap_or_else(|| obfdist.join(RUNTIME_MODULE))
}

/// Copies the runtime files directly under `obfdist` into `output`.
///
/// # Errors
///
/// Fails if `obfdist` is missing or a copy fails.
pub async fn copy_runtime_files(ctx: &ToolContext, obfdist: &Path, output: &Path) -> Result<Vec<PathBuf>> {
    if ctx.is_dry_run() {
        info!(
            from = %obfdist.display(),
            to = %output.display(),
            "[dry-run] Would copy runtime files {}",
            RUNTIME_PATTERNS.join(" ")
        );
        return Ok(Vec::new());
    }

    let copied = copy_matching_async(obfdist, output, &RUNTIME_PATTERNS).await?;
    info!(count = copied.len(), to = %output.display(), "copied runtime files");
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::{copy_runtime_files, runtime_module};
    use crate::config::Config;
    use crate::pack::tools::test_utils::context;

    #[test]
    fn test_runtime_module_default_and_override() {
        let mut config = Config::default();
        assert_eq!(
            runtime_module(&config, Path::new("/obf/dist")),
            PathBuf::from("/obf/dist/pytransform.py")
        );

        config.tools.runtime_module = Some(PathBuf::from("/opt/rt/pytransform.py"));
        assert_eq!(
            runtime_module(&config, Path::new("/obf/dist")),
            PathBuf::from("/opt/rt/pytransform.py")
        );
    }

    #[tokio::test]
    async fn test_copy_runtime_files_only_matching() {
        let dir = tempfile::tempdir().expect("tempdir");
        let obfdist = dir.path().join("obf");
        std::fs::create_dir_all(obfdist.join("sub")).expect("mkdir");
        for name in ["license.lic", "product.key", "_pytransform.so", "hello.py", "pytransform.py"] {
            std::fs::write(obfdist.join(name), name).expect("write");
        }
        std::fs::write(obfdist.join("sub").join("nested.key"), "nested").expect("write");
        let output = dir.path().join("dist");

        let copied = copy_runtime_files(&context(Config::default(), false), &obfdist, &output)
            .await
            .expect("copy");

        let mut names: Vec<String> = copied
            .iter()
            .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .collect();
        names.sort();
        assert_eq!(names, ["_pytransform.so", "license.lic", "product.key"]);
        assert!(!output.join("nested.key").exists());
        assert!(!output.join("hello.py").exists());
    }

    #[tokio::test]
    async fn test_copy_runtime_files_dry_run() {
        let dir = tempfile::tempdir().expect("tempdir");
        let copied = copy_runtime_files(
            &context(Config::default(), true),
            &dir.path().join("missing"),
            &dir.path().join("dist"),
        )
        .await
        .expect("dry run");

        assert!(copied.is_empty());
        assert!(!dir.path().join("dist").exists());
    }
}

// armorpack: Obfuscated Bundle Packer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::error::{FsError, Result};
use anyhow::Context;
use std::path::{Path, PathBuf};
use tokio::fs;

use super::walk::{WalkOptions, find_files};

/// Copies files directly under `src` whose names match any glob into `dst`.
///
/// Does not recurse. Creates `dst` if needed. Returns the copied destination
/// paths, sorted.
///
/// # Example
/// ```no_run
/// use armorpack::utility::fs::copy::copy_matching_async;
/// use std::path::Path;
///
/// # async fn example() -> anyhow::Result<()> {
/// copy_matching_async(Path::new("obf/dist"), Path::new("dist"), &["*.key", "*.lic"]).await?;
/// # Ok(())
/// # }
/// ```
/// # Errors
///
/// Returns an error if `src` does not exist, a pattern is invalid, or any
/// IO operation fails.
pub async fn copy_matching_async(
    src: &Path,
    dst: &Path,
    patterns: &[&str],
) -> Result<Vec<PathBuf>> {
    if !fs::try_exists(src).await.unwrap_or(false) {
        return Err(FsError::NotFound(src.display().to_string()).into());
    }

    let root = src.to_path_buf();
    let owned: Vec<String> = patterns.iter().map(|p| (*p).to_string()).collect();
    let mut sources = tokio::task::spawn_blocking(move || -> Result<Vec<PathBuf>> {
        let options = WalkOptions::top_level();
        let mut found = Vec::new();
        for pattern in &owned {
            found.extend(find_files(&root, pattern, &options)?);
        }
        Ok(found)
    })
    .await
    .context("file search task panicked")??;
    sources.sort();
    sources.dedup();

    fs::create_dir_all(dst)
        .await
        .with_context(|| format!("failed to create directory {}", dst.display()))?;

    let mut copied = Vec::with_capacity(sources.len());
    for src_path in sources {
        let Some(name) = src_path.file_name() else {
            continue;
        };
        let dst_path = dst.join(name);
        fs::copy(&src_path, &dst_path).await.with_context(|| {
            format!(
                "failed to copy {} to {}",
                src_path.display(),
                dst_path.display()
            )
        })?;
        copied.push(dst_path);
    }

    Ok(copied)
}

/// Moves a file, falling back to copy and delete when rename fails
/// (for example across filesystems).
///
/// # Errors
///
/// Returns an error if both the rename and the fallback fail.
pub async fn move_path(src: &Path, dst: &Path) -> Result<()> {
    if fs::rename(src, dst).await.is_ok() {
        return Ok(());
    }
    fs::copy(src, dst).await.map_err(|source| FsError::IoError {
        path: src.display().to_string(),
        source,
    })?;
    fs::remove_file(src).await.map_err(|source| FsError::IoError {
        path: src.display().to_string(),
        source,
    })?;
    Ok(())
}

/// Blocking [`move_path`] for contexts that cannot await, such as `Drop`.
///
/// # Errors
///
/// Returns an error if both the rename and the fallback fail.
pub fn move_path_blocking(src: &Path, dst: &Path) -> Result<()> {
    if std::fs::rename(src, dst).is_ok() {
        return Ok(());
    }
    std::fs::copy(src, dst).map_err(|source| FsError::IoError {
        path: src.display().to_string(),
        source,
    })?;
    std::fs::remove_file(src).map_err(|source| FsError::IoError {
        path: src.display().to_string(),
        source,
    })?;
    Ok(())
}

/// Removes a directory tree; a missing directory is not an error.
///
/// # Errors
///
/// Returns an error if the directory exists and cannot be removed.
pub async fn remove_dir_all_if_exists(dir: &Path) -> Result<bool> {
    match fs::remove_dir_all(dir).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(source) => Err(FsError::IoError {
            path: dir.display().to_string(),
            source,
        }
        .into()),
    }
}

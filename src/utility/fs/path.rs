// armorpack: Obfuscated Bundle Packer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::{Component, Path, PathBuf};

use anyhow::Context;

use crate::error::Result;

/// Lexically normalizes a path: drops `.` and folds `name/..`.
///
/// The filesystem is never consulted, so symlinks are not resolved.
/// Leading `..` components of a relative path are kept; `..` directly under
/// the root is dropped.
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.iter().collect()
}

/// Makes a path absolute against the current directory, then normalizes it.
///
/// # Errors
///
/// Returns an error if the current directory cannot be determined.
pub fn absolute_normalized(path: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(path)
        .with_context(|| format!("failed to make {} absolute", path.display()))?;
    Ok(normalize_path(&absolute))
}

/// Path of `path` relative to `base`, both absolute and normalized.
///
/// Returns `None` when the two do not share a root.
#[must_use]
pub fn relative_to(path: &Path, base: &Path) -> Option<PathBuf> {
    let path: Vec<_> = path.components().collect();
    let base: Vec<_> = base.components().collect();
    if path.first() != base.first() {
        return None;
    }
    let common = path
        .iter()
        .zip(&base)
        .take_while(|(a, b)| a == b)
        .count();

    let mut rel = PathBuf::new();
    for _ in common..base.len() {
        rel.push("..");
    }
    for component in &path[common..] {
        rel.push(component);
    }
    if rel.as_os_str().is_empty() {
        rel.push(".");
    }
    Some(rel)
}

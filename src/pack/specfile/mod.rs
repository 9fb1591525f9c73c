// armorpack: Obfuscated Bundle Packer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! PyInstaller spec file generation inputs and patching.
//!
//! ```text
//! hello.spec                          hello-patched.spec
//!   a = Analysis(['hello.py'], ...)     a = Analysis(['hello.py'], ...)
//!                                       # Patched by armorpack
//!                                       a.scripts[-1] = 'hello', r'<obfdist>/hello.py', 'PYSOURCE'
//!                                       for i in range(len(a.pure)): ...
//!                                       # Patch end.
//!   pyz = PYZ(a.pure, ...)              pyz = PYZ(a.pure, ...)
//! ```
//!
//! The original spec file is only read. Every line other than the inserted
//! block is written back byte for byte.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{FsError, Result, SpecfileError};
use crate::pack::runtime::RUNTIME_PATTERNS;
use crate::utility::fs::path::{absolute_normalized, normalize_path, relative_to};

/// Start of the line that builds the module archive.
pub const ANCHOR: &str = "pyz = PYZ(a.pure";

/// Suffix replacing `.spec` in the patched file name.
pub const PATCHED_SUFFIX: &str = "-patched.spec";

/// Separator between source and destination in `--add-data`.
#[cfg(windows)]
const DATA_SEPARATOR: char = ';';
#[cfg(not(windows))]
const DATA_SEPARATOR: char = ':';

/// Entry name without its extension.
#[must_use]
pub fn entry_stem(entry: &str) -> &str {
    Path::new(entry)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(entry)
}

/// `<src>/<entry stem>.spec`
#[must_use]
pub fn default_specfile(src: &Path, entry: &str) -> PathBuf {
    src.join(format!("{}.spec", entry_stem(entry)))
}

/// `<dir>/<stem>-patched.spec` next to `specfile`.
#[must_use]
pub fn patched_path(specfile: &Path) -> PathBuf {
    let stem = specfile
        .file_stem()
        .map_or_else(|| "spec".into(), |s| s.to_string_lossy());
    specfile.with_file_name(format!("{stem}{PATCHED_SUFFIX}"))
}

/// `--add-data` arguments bundling the runtime files at the bundle root.
///
/// Globs are relative to `project`, the directory spec generation runs in.
#[must_use]
pub fn data_directives(obfdist: &Path, project: &Path) -> Vec<String> {
    let dir = relative_to(obfdist, project).unwrap_or_else(|| obfdist.to_path_buf());
    RUNTIME_PATTERNS
        .iter()
        .flat_map(|pattern| {
            [
                "--add-data".to_string(),
                format!("{}{DATA_SEPARATOR}.", dir.join(pattern).display()),
            ]
        })
        .collect()
}

/// Quotes a path as a Python raw string literal.
///
/// # Errors
///
/// Returns `SpecfileError::UnquotablePath` when the path holds both quote
/// characters or ends with a backslash; no raw literal can spell those.
pub fn py_raw_literal(path: &Path) -> Result<String> {
    let text = path.display().to_string();
    let unquotable = || SpecfileError::UnquotablePath(text.clone());

    if text.ends_with('\\') {
        return Err(unquotable().into());
    }
    if !text.contains('\'') {
        Ok(format!("r'{text}'"))
    } else if !text.contains('"') {
        Ok(format!("r\"{text}\""))
    } else {
        Err(unquotable().into())
    }
}

fn py_str_literal(text: &str) -> String {
    let escaped = text.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{escaped}'")
}

/// The statement block inserted before the anchor line.
///
/// Pure modules under the first `pathex` root have that leading root, and
/// nothing else, replaced by `obfdist`. The root only matches at a path
/// separator boundary.
///
/// # Errors
///
/// Fails if a path cannot be quoted.
pub fn patch_block(obfdist: &Path, entry: &str) -> Result<String> {
    let script = py_raw_literal(&obfdist.join(entry))?;
    let root = py_raw_literal(obfdist)?;
    let module = py_str_literal(entry_stem(entry));

    Ok(format!(
        "\n# Patched by armorpack\n\
         a.scripts[-1] = {module}, {script}, 'PYSOURCE'\n\
         _armor_root = a.pathex[0].rstrip('/\\\\')\n\
         for i in range(len(a.pure)):\n\
         \x20   _armor_path = a.pure[i][1]\n\
         \x20   if _armor_path == _armor_root or (_armor_path.startswith(_armor_root)\n\
         \x20           and _armor_path[len(_armor_root)] in '/\\\\'):\n\
         \x20       a.pure[i] = a.pure[i][0], {root} + _armor_path[len(_armor_root):], a.pure[i][2]\n\
         # Patch end.\n\n"
    ))
}

/// Inserts `block` before the single anchor line of `text`.
///
/// # Errors
///
/// `SpecfileError::NoAnchor` or `SpecfileError::MultipleAnchors`, naming
/// `path`.
pub fn insert_block(text: &str, block: &str, path: &Path) -> Result<String> {
    let lines: Vec<&str> = text.split_inclusive('\n').collect();
    let anchors: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter_map(|(i, line)| line.starts_with(ANCHOR).then_some(i))
        .collect();

    let at = match anchors.as_slice() {
        [at] => *at,
        [] => {
            return Err(SpecfileError::NoAnchor {
                path: path.display().to_string(),
                anchor: ANCHOR,
            }
            .into());
        }
        many => {
            return Err(SpecfileError::MultipleAnchors {
                path: path.display().to_string(),
                anchor: ANCHOR,
                count: many.len(),
            }
            .into());
        }
    };

    let mut out = String::with_capacity(text.len() + block.len());
    for line in &lines[..at] {
        out.push_str(line);
    }
    out.push_str(block);
    for line in &lines[at..] {
        out.push_str(line);
    }
    Ok(out)
}

/// Writes `<stem>-patched.spec` next to `specfile` and returns its path.
///
/// # Errors
///
/// Fails if the spec file cannot be read, has no unique anchor, or the
/// patched file cannot be written. No file is written on failure.
pub async fn patch_specfile(specfile: &Path, obfdist: &Path, entry: &str) -> Result<PathBuf> {
    let text = tokio::fs::read_to_string(specfile)
        .await
        .map_err(|source| FsError::IoError {
            path: specfile.display().to_string(),
            source,
        })?;

    let obfdist = absolute_normalized(obfdist)?;
    let block = patch_block(&obfdist, entry)?;
    let patched = insert_block(&text, &block, specfile)?;

    let target = normalize_path(&patched_path(specfile));
    tokio::fs::write(&target, patched)
        .await
        .map_err(|source| FsError::IoError {
            path: target.display().to_string(),
            source,
        })?;

    debug!(from = %specfile.display(), to = %target.display(), "spec file patched");
    info!(specfile = %target.display(), "patched spec file");
    Ok(target)
}

// armorpack: Obfuscated Bundle Packer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::error::Result;
use bon::Builder;
use flume::bounded;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::warn;

/// Options for parallel directory traversal.
#[derive(Debug, Clone, Builder)]
pub struct WalkOptions {
    /// Maximum depth to traverse (None = unlimited)
    #[builder(setters(name = with_max_depth))]
    max_depth: Option<usize>,
    /// Follow symbolic links
    #[builder(setters(name = with_follow_links), default = false)]
    follow_links: bool,
    /// Include hidden files/directories
    #[builder(setters(name = with_include_hidden), default = false)]
    include_hidden: bool,
    /// Respect .gitignore files
    #[builder(setters(name = with_respect_gitignore), default = true)]
    respect_gitignore: bool,
    /// Number of threads (None = auto-detect based on CPU count)
    #[builder(setters(name = with_threads))]
    threads: Option<usize>,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl WalkOptions {
    #[must_use]
    pub const fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    #[must_use]
    pub const fn follow_links(&self) -> bool {
        self.follow_links
    }

    #[must_use]
    pub const fn include_hidden(&self) -> bool {
        self.include_hidden
    }

    #[must_use]
    pub const fn respect_gitignore(&self) -> bool {
        self.respect_gitignore
    }

    #[must_use]
    pub const fn threads(&self) -> Option<usize> {
        self.threads
    }

    /// Every file in the tree: hidden entries included, ignore files disregarded.
    ///
    /// Build outputs must be seen in full; an ignore file shipped inside the
    /// obfuscated tree must not hide modules from the archive rewrite.
    #[must_use]
    pub fn exhaustive() -> Self {
        Self::builder()
            .with_include_hidden(true)
            .with_respect_gitignore(false)
            .build()
    }

    /// Files directly inside the root, nothing below it.
    #[must_use]
    pub fn top_level() -> Self {
        Self::builder()
            .with_max_depth(1)
            .with_include_hidden(true)
            .with_respect_gitignore(false)
            .build()
    }
}

/// Result of a parallel walk operation.
#[derive(Debug)]
pub struct WalkResult {
    files: Vec<PathBuf>,
    directories: Vec<PathBuf>,
    error_count: usize,
}

impl WalkResult {
    /// Creates a walk result; files and directories are sorted.
    pub(crate) fn new(
        mut files: Vec<PathBuf>,
        mut directories: Vec<PathBuf>,
        error_count: usize,
    ) -> Self {
        files.sort();
        directories.sort();
        Self {
            files,
            directories,
            error_count,
        }
    }

    #[must_use]
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    #[must_use]
    pub fn directories(&self) -> &[PathBuf] {
        &self.directories
    }

    /// Consumes the result, keeping only the files.
    #[must_use]
    pub fn into_files(self) -> Vec<PathBuf> {
        self.files
    }

    #[must_use]
    pub const fn error_count(&self) -> usize {
        self.error_count
    }
}

pub(super) fn build_walker(root: &Path, options: &WalkOptions) -> WalkBuilder {
    let mut builder = WalkBuilder::new(root);

    if let Some(depth) = options.max_depth() {
        builder.max_depth(Some(depth));
    }

    builder.follow_links(options.follow_links());
    builder.hidden(!options.include_hidden());

    builder.git_ignore(options.respect_gitignore());
    builder.git_global(options.respect_gitignore());
    builder.git_exclude(options.respect_gitignore());
    builder.ignore(options.respect_gitignore());
    builder.parents(options.respect_gitignore());

    if let Some(threads) = options.threads() {
        builder.threads(threads);
    }

    builder
}

/// Performs parallel directory traversal using `ignore::WalkParallel`.
///
/// Results are collected over flume channels and returned sorted, so callers
/// see the same order on every run.
///
/// # Errors
///
/// Returns an error if the root directory does not exist.
///
/// # Example
/// ```no_run
/// use armorpack::utility::fs::walk::{parallel_walk, WalkOptions};
///
/// let result = parallel_walk("/path/to/obf/dist", &WalkOptions::exhaustive())?;
/// println!("Found {} files", result.files().len());
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn parallel_walk<P: AsRef<Path>>(root: P, options: &WalkOptions) -> Result<WalkResult> {
    let root = root.as_ref();

    if !root.exists() {
        anyhow::bail!("root directory does not exist: {}", root.display());
    }

    let (file_tx, file_rx) = bounded::<PathBuf>(1000);
    let (dir_tx, dir_rx) = bounded::<PathBuf>(1000);
    let error_count = Arc::new(AtomicUsize::new(0));

    let builder = build_walker(root, options);
    let parallel = builder.build_parallel();

    // Drain on this thread while the walk runs; bounded channels would
    // otherwise block the walkers once full.
    let (files, directories) = std::thread::scope(|scope| {
        let files = scope.spawn(move || file_rx.iter().collect::<Vec<_>>());
        let directories = scope.spawn(move || dir_rx.iter().collect::<Vec<_>>());

        parallel.run(|| {
            let file_tx = file_tx.clone();
            let dir_tx = dir_tx.clone();
            let error_count = Arc::clone(&error_count);

            Box::new(move |entry_result| {
                match entry_result {
                    // depth 0 is the root itself
                    Ok(entry) if entry.depth() > 0 => {
                        let path = entry.path();
                        if entry.file_type().is_some_and(|ft| ft.is_dir()) {
                            let _ = dir_tx.send(path.to_path_buf());
                        } else if entry.file_type().is_some_and(|ft| ft.is_file()) {
                            let _ = file_tx.send(path.to_path_buf());
                        }
                    }
                    Ok(_) => {}
                    Err(e) => {
                        warn!(error = %e, "walk error");
                        error_count.fetch_add(1, Ordering::Relaxed);
                    }
                }
                ignore::WalkState::Continue
            })
        });

        drop(file_tx);
        drop(dir_tx);
        (
            files.join().unwrap_or_default(),
            directories.join().unwrap_or_default(),
        )
    });

    let error_count = error_count.load(Ordering::Relaxed);
    Ok(WalkResult::new(files, directories, error_count))
}

/// Finds files whose path relative to `root` matches a glob pattern.
///
/// Uses `wax` for matching; `*` never crosses a directory separator, so
/// `*.key` only matches files directly under `root`.
///
/// # Errors
///
/// Returns an error if:
/// - The root directory does not exist.
/// - The glob pattern is invalid.
///
/// # Example
/// ```no_run
/// use armorpack::utility::fs::walk::{find_files, WalkOptions};
///
/// let keys = find_files("/path/to/obf/dist", "*.key", &WalkOptions::top_level())?;
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn find_files<P: AsRef<Path>>(
    root: P,
    pattern: &str,
    options: &WalkOptions,
) -> Result<Vec<PathBuf>> {
    use wax::{Glob, Pattern};

    let root = root.as_ref();

    let glob =
        Glob::new(pattern).map_err(|e| anyhow::anyhow!("invalid glob pattern '{pattern}': {e}"))?;

    let result = parallel_walk(root, options)?;
    Ok(result
        .into_files()
        .into_iter()
        .filter(|path| {
            path.strip_prefix(root)
                .is_ok_and(|rel_path| glob.is_match(rel_path))
        })
        .collect())
}

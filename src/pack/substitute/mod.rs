// armorpack: Obfuscated Bundle Packer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Scoped replacement of the entry script by its obfuscated copy.
//!
//! ```text
//! acquire:  src/hello.py          --> src/hello.py.armor.bak
//!           obfdist/hello.py      --> src/hello.py
//!           src/pytransform.py    --> src/pytransform.py.armor.bak  (if present)
//!           runtime module (copy) --> src/pytransform.py
//! scope:    run the backend
//! release:  src/hello.py.armor.bak --> src/hello.py
//!           remove src/pytransform.py
//!           src/pytransform.py.armor.bak --> src/pytransform.py  (if present)
//! ```
//!
//! Release always happens: after the scoped future finishes, whether it
//! failed or not, and from `Drop` if the guard is abandoned (a panic or a
//! cancelled future). The scoped error is only returned once the source tree
//! is back in its original state.

use std::ffi::OsString;
use std::future::Future;
use std::path::{Path, PathBuf};

use tracing::{debug, error, warn};

use crate::error::{FsError, Result, precondition};
use crate::utility::fs::copy::{move_path, move_path_blocking};

/// Suffix appended to the entry name for the backup.
pub const BACKUP_SUFFIX: &str = ".armor.bak";

/// Holds the source tree with the obfuscated entry in place.
#[derive(Debug)]
pub struct EntrySwap {
    entry: PathBuf,
    backup: PathBuf,
    runtime_copy: Option<PathBuf>,
    /// The user's own file at the runtime copy's path, moved aside.
    runtime_backup: Option<(PathBuf, PathBuf)>,
    released: bool,
}

fn with_backup_suffix(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(BACKUP_SUFFIX);
    path.with_file_name(name)
}

impl EntrySwap {
    /// Path of the backup for `src/entry`.
    #[must_use]
    pub fn backup_path(src: &Path, entry: &str) -> PathBuf {
        with_backup_suffix(&src.join(entry))
    }

    /// Swaps the obfuscated entry in and copies the runtime module next to it.
    ///
    /// # Errors
    ///
    /// Fails without touching anything when the entry, the obfuscated entry
    /// or the runtime module is missing, or when a stale backup exists. A
    /// file already at the runtime copy's path is moved aside and put back
    /// on release. A failure halfway through rolls back what was already done.
    pub async fn acquire(
        src: &Path,
        entry: &str,
        obfdist: &Path,
        runtime_module: &Path,
    ) -> Result<Self> {
        let original = src.join(entry);
        let obfuscated = obfdist.join(entry);
        let backup = Self::backup_path(src, entry);
        let file_name = runtime_module.file_name().ok_or_else(|| {
            precondition(format!(
                "invalid runtime module path {}",
                runtime_module.display()
            ))
        })?;
        let runtime_copy = src.join(file_name);
        let runtime_backup = with_backup_suffix(&runtime_copy);

        for (what, path) in [
            ("entry script", original.as_path()),
            ("obfuscated entry script", obfuscated.as_path()),
            ("runtime module", runtime_module),
        ] {
            if !tokio::fs::try_exists(path).await.unwrap_or(false) {
                return Err(precondition(format!("{what} not found: {}", path.display())).into());
            }
        }
        for (stale, owner) in [(&backup, &original), (&runtime_backup, &runtime_copy)] {
            if tokio::fs::try_exists(stale).await.unwrap_or(false) {
                return Err(precondition(format!(
                    "backup {} already exists; restore it to {} and retry",
                    stale.display(),
                    owner.display()
                ))
                .into());
            }
        }

        move_path(&original, &backup).await?;
        debug!(from = %original.display(), to = %backup.display(), "moved entry aside");

        // From here on the guard restores the entry on any exit path
        let mut guard = Self {
            entry: original,
            backup,
            runtime_copy: None,
            runtime_backup: None,
            released: false,
        };

        move_path(&obfuscated, &guard.entry).await?;

        let mut runtime_source = runtime_module.to_path_buf();
        if tokio::fs::try_exists(&runtime_copy).await.unwrap_or(false) {
            move_path(&runtime_copy, &runtime_backup).await?;
            debug!(
                from = %runtime_copy.display(),
                to = %runtime_backup.display(),
                "moved existing runtime module aside"
            );
            if runtime_source == runtime_copy {
                runtime_source.clone_from(&runtime_backup);
            }
            guard.runtime_backup = Some((runtime_backup, runtime_copy.clone()));
        }

        guard.runtime_copy = Some(runtime_copy.clone());
        tokio::fs::copy(&runtime_source, &runtime_copy)
            .await
            .map_err(|source| FsError::IoError {
                path: runtime_source.display().to_string(),
                source,
            })?;

        Ok(guard)
    }

    /// Runs `work` with the entry swapped, then restores the source tree.
    ///
    /// # Errors
    ///
    /// Returns the error of `work` if it failed, else a restore error.
    pub async fn scope<F, T>(self, work: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let outcome = work.await;
        let restored = self.release().await;

        match (outcome, restored) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(e)) => Err(e),
            (Err(e), restored) => {
                if let Err(restore_error) = restored {
                    error!(error = %format!("{restore_error:#}"), "failed to restore entry script");
                }
                Err(e)
            }
        }
    }

    /// Restores the original entry and removes the runtime copy.
    ///
    /// # Errors
    ///
    /// Returns the first failure; the remaining steps still run.
    pub async fn release(mut self) -> Result<()> {
        self.released = true;

        let mut first_error = None;
        if let Err(e) = move_path(&self.backup, &self.entry).await {
            first_error = Some(e);
        }
        if let Some(copy) = self.runtime_copy.take()
            && let Err(source) = tokio::fs::remove_file(&copy).await
            && source.kind() != std::io::ErrorKind::NotFound
        {
            first_error.get_or_insert_with(|| {
                FsError::IoError {
                    path: copy.display().to_string(),
                    source,
                }
                .into()
            });
        }
        if let Some((saved, original)) = self.runtime_backup.take()
            && let Err(e) = move_path(&saved, &original).await
        {
            first_error.get_or_insert(e);
        }

        match first_error {
            Some(e) => Err(e),
            None => {
                debug!(entry = %self.entry.display(), "restored entry");
                Ok(())
            }
        }
    }

    fn restore_blocking(&mut self) {
        if let Err(e) = move_path_blocking(&self.backup, &self.entry) {
            error!(
                backup = %self.backup.display(),
                error = %format!("{e:#}"),
                "failed to restore entry script"
            );
        }
        if let Some(copy) = self.runtime_copy.take()
            && let Err(e) = std::fs::remove_file(&copy)
            && e.kind() != std::io::ErrorKind::NotFound
        {
            warn!(path = %copy.display(), error = %e, "failed to remove runtime module copy");
        }
        if let Some((saved, original)) = self.runtime_backup.take()
            && let Err(e) = move_path_blocking(&saved, &original)
        {
            error!(
                backup = %saved.display(),
                error = %format!("{e:#}"),
                "failed to restore runtime module"
            );
        }
    }
}

impl Drop for EntrySwap {
    fn drop(&mut self) {
        if !self.released {
            self.released = true;
            warn!(entry = %self.entry.display(), "restoring entry script");
            self.restore_blocking();
        }
    }
}

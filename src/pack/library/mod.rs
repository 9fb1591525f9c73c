// armorpack: Obfuscated Bundle Packer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Rebuilds a backend's library archive from the obfuscated tree.
//!
//! ```text
//! S = every file under obfdist (walked before extraction)
//! M = member list of <output>/<library>.zip, in order
//! extract all of M into obfdist        (overwrites plain .pyc with theirs)
//! py_compile every s in S ending in .py --> s + "c"
//! write a fresh archive holding exactly M, read back from obfdist
//! ```
//!
//! Names outside M never enter the archive, so the member set is unchanged;
//! only the contents of compiled modules are replaced.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{debug, info};
use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

use crate::error::{ArchiveError, FsError, Result};
use crate::pack::tools::python::PythonTool;
use crate::pack::tools::{Tool, ToolContext};
use crate::utility::fs::walk::{WalkOptions, parallel_walk};

/// One archive member as recorded before extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub name: String,
    pub is_dir: bool,
    pub compression: CompressionMethod,
}

fn zip_error(archive: &Path, source: zip::result::ZipError) -> ArchiveError {
    ArchiveError::Zip {
        archive: archive.display().to_string(),
        source,
    }
}

fn io_error(path: &Path, source: io::Error) -> FsError {
    FsError::IoError {
        path: path.display().to_string(),
        source,
    }
}

/// Whether `path` names a Python source file, ignoring case.
#[must_use]
pub fn is_python_source(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("py"))
}

/// Records the member list of `archive` and extracts every member into `dir`.
///
/// # Errors
///
/// Fails on unreadable archives and on member names that would land
/// outside `dir`; nothing is extracted in the latter case.
pub fn extract_members(archive: &Path, dir: &Path) -> Result<Vec<Member>> {
    let file = File::open(archive).map_err(|e| io_error(archive, e))?;
    let mut zip = zip::ZipArchive::new(file).map_err(|e| zip_error(archive, e))?;

    let mut members = Vec::with_capacity(zip.len());
    let mut targets = Vec::with_capacity(zip.len());
    for i in 0..zip.len() {
        let entry = zip.by_index(i).map_err(|e| zip_error(archive, e))?;
        let Some(relative) = entry.enclosed_name() else {
            return Err(ArchiveError::UnsafeMemberName {
                archive: archive.display().to_string(),
                name: entry.name().to_string(),
            }
            .into());
        };
        targets.push(dir.join(relative));
        members.push(Member {
            name: entry.name().to_string(),
            is_dir: entry.is_dir(),
            compression: entry.compression(),
        });
    }

    for (i, (member, target)) in members.iter().zip(&targets).enumerate() {
        if member.is_dir {
            std::fs::create_dir_all(target).map_err(|e| io_error(target, e))?;
            continue;
        }
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
        }
        let mut entry = zip.by_index(i).map_err(|e| zip_error(archive, e))?;
        let mut out = File::create(target).map_err(|e| io_error(target, e))?;
        io::copy(&mut entry, &mut out).map_err(|e| io_error(target, e))?;
    }

    Ok(members)
}

/// Writes a new archive at `archive` holding `members`, read from `dir`.
///
/// The archive is written next to the target and renamed over it, so a
/// failure leaves the previous archive in place.
///
/// # Errors
///
/// Returns `ArchiveError::MissingMember` if a member file is gone.
pub fn write_members(archive: &Path, dir: &Path, members: &[Member]) -> Result<()> {
    let parent = archive
        .parent()
        .with_context(|| format!("archive {} has no parent directory", archive.display()))?;
    let temp = tempfile::NamedTempFile::new_in(parent).map_err(|e| io_error(parent, e))?;
    let mut zip = zip::ZipWriter::new(temp.reopen().map_err(|e| io_error(temp.path(), e))?);

    for member in members {
        let method = match member.compression {
            CompressionMethod::Stored => CompressionMethod::Stored,
            _ => CompressionMethod::Deflated,
        };
        let options = SimpleFileOptions::default().compression_method(method);

        if member.is_dir {
            zip.add_directory(member.name.as_str(), options)
                .map_err(|e| zip_error(archive, e))?;
            continue;
        }

        let source = dir.join(&member.name);
        let mut input = File::open(&source).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                anyhow::Error::from(ArchiveError::MissingMember {
                    archive: archive.display().to_string(),
                    name: member.name.clone(),
                    dir: dir.display().to_string(),
                })
            } else {
                io_error(&source, e).into()
            }
        })?;
        zip.start_file(member.name.as_str(), options)
            .map_err(|e| zip_error(archive, e))?;
        io::copy(&mut input, &mut zip).map_err(|e| io_error(&source, e))?;
    }

    zip.finish().map_err(|e| zip_error(archive, e))?;
    temp.persist(archive)
        .map_err(|e| io_error(archive, e.error))?;
    Ok(())
}

/// Replaces the modules in `archive` with their obfuscated counterparts.
///
/// Returns the member names of the rewritten archive.
///
/// # Errors
///
/// Fails if the tree or archive cannot be read, a source fails to compile,
/// or the new archive cannot be written.
pub async fn rewrite_library(ctx: &ToolContext, obfdist: &Path, archive: &Path) -> Result<Vec<String>> {
    info!(archive = %archive.display(), tree = %obfdist.display(), "updating library");

    if ctx.is_dry_run() {
        info!(
            archive = %archive.display(),
            "[dry-run] Would rebuild library archive from obfuscated tree"
        );
        return Ok(Vec::new());
    }

    let tree = obfdist.to_path_buf();
    let zip_path = archive.to_path_buf();
    let (sources, members) = tokio::task::spawn_blocking(move || -> Result<(Vec<PathBuf>, Vec<Member>)> {
        let walked = parallel_walk(&tree, &WalkOptions::exhaustive())?;
        let sources: Vec<PathBuf> = walked
            .into_files()
            .into_iter()
            .filter(|p| is_python_source(p))
            .collect();
        let members = extract_members(&zip_path, &tree)?;
        Ok((sources, members))
    })
    .await
    .context("library extraction task panicked")??;

    debug!(sources = sources.len(), members = members.len(), "library inventory");

    PythonTool::compile(sources).run(ctx).await?;

    let tree = obfdist.to_path_buf();
    let zip_path = archive.to_path_buf();
    let names = tokio::task::spawn_blocking(move || -> Result<Vec<String>> {
        write_members(&zip_path, &tree, &members)?;
        Ok(members.into_iter().map(|m| m.name).collect())
    })
    .await
    .context("library write task panicked")??;

    Ok(names)
}

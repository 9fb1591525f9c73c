// armorpack: Obfuscated Bundle Packer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! The two packing pipelines and their dispatch.
//!
//! ```text
//!                     PackRequest
//!                          |
//!             probe interpreter (cx_Freeze)
//!                          |
//!                      PackageJob
//!                          |
//!          +---------------+----------------+
//!          v                                v
//!  library (py2exe, py2app, cx_Freeze)   descriptor (PyInstaller)
//!   check_setup_script                    clean?
//!   clean?                                obfuscate (direct)
//!   obfuscate (project)                   make_specfile (if missing)
//!   run_setup_script (entry swapped)      patch_specfile
//!   update_library                        run_backend
//!   copy_runtime_files
//! ```
//!
//! Stages run strictly in order; the first failure ends the job.

mod descriptor;
mod library;

use std::path::{Path, PathBuf};

use tracing::{Instrument, info};

use crate::error::Result;
use crate::logging::stage_span;
use crate::pack::backend::PipelineKind;
use crate::pack::job::{PackRequest, PackageJob};
use crate::pack::tools::ToolContext;
use crate::pack::tools::python::PythonTool;
use crate::utility::fs::copy::remove_dir_all_if_exists;

/// Probes the interpreter when the backend needs it and resolves the job.
///
/// # Errors
///
/// Fails if the probe fails or the request cannot be resolved.
pub async fn prepare_job(ctx: &ToolContext, request: PackRequest) -> Result<PackageJob> {
    let interpreter = if request.backend.needs_interpreter() {
        Some(
            PythonTool::probe(ctx)
                .instrument(stage_span("probe_interpreter"))
                .await?,
        )
    } else {
        None
    };
    let profile = request.backend.profile(interpreter.as_ref())?;
    PackageJob::resolve(request, profile)
}

/// Runs the pipeline the job's backend calls for.
///
/// # Errors
///
/// Returns the first stage failure.
pub async fn run_pack(ctx: &ToolContext, job: &PackageJob) -> Result<()> {
    info!(backend = %job.backend(), "Prepare to pack obfuscated scripts");
    info!(src = %job.src().display(), entry = job.entry(), "sources");
    info!(output = %job.output().display(), "output path");

    match job.backend().pipeline_kind() {
        PipelineKind::Library => library::run(ctx, job).await?,
        PipelineKind::Descriptor => descriptor::run(ctx, job).await?,
    }

    info!(output = %job.output().display(), "Pack obfuscated scripts successfully");
    Ok(())
}

/// Resolves and runs a request; returns the output directory.
///
/// # Errors
///
/// Returns the first failure of resolution or any stage.
pub async fn pack(ctx: &ToolContext, request: PackRequest) -> Result<PathBuf> {
    let job = prepare_job(ctx, request).await?;
    run_pack(ctx, &job).await?;
    Ok(job.output().to_path_buf())
}

/// Removes the obfuscation project directory.
async fn clean_project(ctx: &ToolContext, project: &Path) -> Result<()> {
    if ctx.is_dry_run() {
        info!(path = %project.display(), "[dry-run] Would remove build path");
        return Ok(());
    }
    if remove_dir_all_if_exists(project).await? {
        info!(path = %project.display(), "removed build path");
    }
    Ok(())
}

#[cfg(test)]
mod tests;

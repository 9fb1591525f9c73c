// armorpack: Obfuscated Bundle Packer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! PyInstaller: obfuscate, patch the spec file, build from the patched copy.

use std::path::{Path, PathBuf};

use tracing::{Instrument, info};

use super::clean_project;
use crate::error::Result;
use crate::logging::stage_span;
use crate::pack::job::PackageJob;
use crate::pack::specfile::{data_directives, patch_specfile, patched_path};
use crate::pack::tools::armor::ArmorTool;
use crate::pack::tools::freeze::FreezeTool;
use crate::pack::tools::{Tool, ToolContext};
use crate::utility::fs::path::normalize_path;

pub(super) async fn run(ctx: &ToolContext, job: &PackageJob) -> Result<()> {
    let project = job.project();
    let obfdist = job.obfdist();
    let specfile = job.specfile();
    info!(specfile = %specfile.display(), "spec file");
    info!(project = %project.display(), obfdist = %obfdist.display(), "build paths");

    if job.clean() {
        clean_project(ctx, &project)
            .instrument(stage_span("clean"))
            .await?;
    }

    ArmorTool::obfuscate(
        job.backend(),
        &obfdist,
        job.xoptions(),
        &job.src().join(job.entry()),
    )
    .run(ctx)
    .instrument(stage_span("obfuscate"))
    .await?;

    if !tokio::fs::try_exists(&specfile).await.unwrap_or(false) {
        FreezeTool::make_spec(
            job.backend(),
            job.pack_command(),
            &project,
            &specfile,
            data_directives(&obfdist, &project),
            &job.src().join(job.entry()),
        )
        .run(ctx)
        .instrument(stage_span("make_specfile"))
        .await?;
    }

    let patched = patch(ctx, &specfile, &obfdist, job.entry())
        .instrument(stage_span("patch_specfile"))
        .await?;

    FreezeTool::build_spec(job.backend(), job.pack_command(), job.src(), &patched)
        .run(ctx)
        .instrument(stage_span("run_backend"))
        .await
}

async fn patch(ctx: &ToolContext, specfile: &Path, obfdist: &Path, entry: &str) -> Result<PathBuf> {
    if ctx.is_dry_run() {
        let patched = normalize_path(&patched_path(specfile));
        info!(
            from = %specfile.display(),
            to = %patched.display(),
            "[dry-run] Would patch spec file"
        );
        return Ok(patched);
    }
    patch_specfile(specfile, obfdist, entry).await
}

// armorpack: Obfuscated Bundle Packer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Setup-script backends: py2exe, py2app, cx_Freeze.

use tracing::{Instrument, info};

use super::clean_project;
use crate::error::{Result, bail_out, precondition};
use crate::logging::stage_span;
use crate::pack::job::PackageJob;
use crate::pack::library::rewrite_library;
use crate::pack::runtime::{copy_runtime_files, runtime_module};
use crate::pack::substitute::EntrySwap;
use crate::pack::tools::armor::ArmorTool;
use crate::pack::tools::freeze::FreezeTool;
use crate::pack::tools::{Tool, ToolContext};

pub(super) async fn run(ctx: &ToolContext, job: &PackageJob) -> Result<()> {
    let project = job.project();
    let obfdist = job.obfdist();
    info!(project = %project.display(), obfdist = %obfdist.display(), "build paths");

    check_setup_script(job)
        .instrument(stage_span("check_setup_script"))
        .await?;

    if job.clean() {
        clean_project(ctx, &project)
            .instrument(stage_span("clean"))
            .await?;
    }

    async {
        for step in ArmorTool::project_steps(
            job.backend(),
            job.src(),
            job.entry(),
            &project,
            job.xoptions(),
        ) {
            step.run(ctx).await?;
        }
        Ok::<_, anyhow::Error>(())
    }
    .instrument(stage_span("obfuscate"))
    .await?;

    run_setup_script(ctx, job)
        .instrument(stage_span("run_setup_script"))
        .await?;

    let archive = job
        .library_archive()
        .ok_or_else(|| bail_out(format!("{} has no library archive", job.backend())))?;
    rewrite_library(ctx, &obfdist, &archive)
        .instrument(stage_span("update_library"))
        .await?;

    copy_runtime_files(ctx, &obfdist, job.output())
        .instrument(stage_span("copy_runtime_files"))
        .await?;
    Ok(())
}

async fn check_setup_script(job: &PackageJob) -> Result<()> {
    let setup = job.setup_script();
    if tokio::fs::try_exists(&setup).await.unwrap_or(false) {
        return Ok(());
    }

    info!("Please run the following command to generate setup.py");
    info!("    {}", job.backend().setup_hint());
    Err(precondition(format!("no setup script {} found", setup.display())).into())
}

async fn run_setup_script(ctx: &ToolContext, job: &PackageJob) -> Result<()> {
    let setup = job.setup_script();
    let freeze = FreezeTool::setup_script(job.backend(), job.pack_command(), job.build(), &setup);

    if ctx.is_dry_run() {
        info!(
            entry = %job.src().join(job.entry()).display(),
            "[dry-run] Would swap in obfuscated entry"
        );
        return freeze.run(ctx).await;
    }

    let obfdist = job.obfdist();
    let runtime = runtime_module(ctx.config(), &obfdist);
    EntrySwap::acquire(job.src(), job.entry(), &obfdist, &runtime)
        .await?
        .scope(freeze.run(ctx))
        .await
}

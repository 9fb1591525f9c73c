// armorpack: Obfuscated Bundle Packer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Freezing backend invocations.
//!
//! ```text
//! SetupScript  python <script> <packcmd>                      cwd = build
//! MakeSpec     python <packcmd> -y --specpath <dir> <datas> <entry>   cwd = project
//! BuildSpec    python <packcmd> -y <patched spec>             cwd = src
//! ```
//!
//! `packcmd` is the backend profile's base tokens, the output directory and
//! the user's extra options.

use std::path::{Path, PathBuf};

use anyhow::Context;
use futures_util::future::BoxFuture;

use super::{Tool, ToolContext, log_dry_run, resolve_program, run_checked};
use crate::core::process::builder::ProcessBuilder;
use crate::error::Result;
use crate::pack::backend::Backend;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FreezeOperation {
    /// Run a py2exe/py2app/cx_Freeze setup script.
    SetupScript { build: PathBuf, script: PathBuf },
    /// Run PyInstaller on the entry script to produce a spec file.
    MakeSpec {
        project: PathBuf,
        spec_dir: PathBuf,
        datas: Vec<String>,
        script: PathBuf,
    },
    /// Run PyInstaller with a spec file.
    BuildSpec { src: PathBuf, specfile: PathBuf },
}

/// One run of a freezing backend.
#[derive(Debug, Clone)]
pub struct FreezeTool {
    backend: Backend,
    pack_command: Vec<String>,
    operation: FreezeOperation,
}

impl FreezeTool {
    #[must_use]
    pub fn setup_script(backend: Backend, pack_command: &[String], build: &Path, script: &Path) -> Self {
        Self {
            backend,
            pack_command: pack_command.to_vec(),
            operation: FreezeOperation::SetupScript {
                build: build.to_path_buf(),
                script: script.to_path_buf(),
            },
        }
    }

    #[must_use]
    pub fn make_spec(
        backend: Backend,
        pack_command: &[String],
        project: &Path,
        specfile: &Path,
        datas: Vec<String>,
        script: &Path,
    ) -> Self {
        let spec_dir = specfile
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        Self {
            backend,
            pack_command: pack_command.to_vec(),
            operation: FreezeOperation::MakeSpec {
                project: project.to_path_buf(),
                spec_dir,
                datas,
                script: script.to_path_buf(),
            },
        }
    }

    #[must_use]
    pub fn build_spec(backend: Backend, pack_command: &[String], src: &Path, specfile: &Path) -> Self {
        Self {
            backend,
            pack_command: pack_command.to_vec(),
            operation: FreezeOperation::BuildSpec {
                src: src.to_path_buf(),
                specfile: specfile.to_path_buf(),
            },
        }
    }

    #[must_use]
    pub const fn operation(&self) -> &FreezeOperation {
        &self.operation
    }

    /// Interpreter arguments for this run.
    #[must_use]
    pub fn arguments(&self) -> Vec<String> {
        let path = |p: &Path| p.to_string_lossy().into_owned();
        match &self.operation {
            FreezeOperation::SetupScript { script, .. } => {
                let mut args = vec![path(script)];
                args.extend(self.pack_command.iter().cloned());
                args
            }
            FreezeOperation::MakeSpec {
                spec_dir,
                datas,
                script,
                ..
            } => {
                let mut args = self.pack_command.clone();
                args.extend(["-y".to_string(), "--specpath".to_string(), path(spec_dir)]);
                args.extend(datas.iter().cloned());
                args.push(path(script));
                args
            }
            FreezeOperation::BuildSpec { specfile, .. } => {
                let mut args = self.pack_command.clone();
                args.extend(["-y".to_string(), path(specfile)]);
                args
            }
        }
    }

    const fn working_dir(&self) -> &PathBuf {
        match &self.operation {
            FreezeOperation::SetupScript { build, .. } => build,
            FreezeOperation::MakeSpec { project, .. } => project,
            FreezeOperation::BuildSpec { src, .. } => src,
        }
    }

    fn process(&self, ctx: &ToolContext) -> Result<ProcessBuilder> {
        let python = &ctx.config().tools.python;
        let python = if ctx.is_dry_run() {
            python.clone()
        } else {
            resolve_program(python)?
        };
        Ok(ProcessBuilder::new(python)
            .args(self.arguments())
            .cwd(self.working_dir()))
    }
}

impl Tool for FreezeTool {
    fn name(&self) -> String {
        let step = match self.operation {
            FreezeOperation::SetupScript { .. } => "setup script",
            FreezeOperation::MakeSpec { .. } => "spec file generation",
            FreezeOperation::BuildSpec { .. } => "build",
        };
        format!("{} {step}", self.backend)
    }

    fn run<'a>(&'a self, ctx: &'a ToolContext) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            let name = self.name();
            let builder = self.process(ctx)?;

            if ctx.is_dry_run() {
                log_dry_run(&name, &builder);
                return Ok(());
            }

            if let FreezeOperation::MakeSpec { project, .. } = &self.operation {
                tokio::fs::create_dir_all(project)
                    .await
                    .with_context(|| format!("failed to create {}", project.display()))?;
            }

            run_checked(ctx, &name, builder).await?;
            Ok(())
        })
    }
}

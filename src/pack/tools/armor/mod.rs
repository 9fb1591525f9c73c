// armorpack: Obfuscated Bundle Packer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Obfuscation engine invocations.
//!
//! ```text
//! Project mode (library backends):
//!   init -t app --src <src> --entry <entry> <project>
//!   config --runtime-path "" --manifest "<filters>" <project>
//!   config <xoptions> <project>          (only with -x)
//!   build <project>
//!
//! Direct mode (PyInstaller):
//!   obfuscate -r -O <obfdist> <xoptions> <src>/<entry>
//! ```
//!
//! The engine command comes from `tools.armor`: a program followed by any
//! leading arguments, e.g. `["python", "/opt/pyarmor/pyarmor.py"]`.

use std::path::{Path, PathBuf};

use anyhow::Context;
use futures_util::future::BoxFuture;

use super::{Tool, ToolContext, log_dry_run, resolve_program, run_checked};
use crate::core::process::builder::ProcessBuilder;
use crate::error::Result;
use crate::pack::backend::Backend;

/// Name of the runtime module the engine writes next to obfuscated scripts.
pub const RUNTIME_MODULE: &str = "pytransform.py";

/// Manifest filters used in project mode.
#[must_use]
pub fn manifest_filters(entry: &str) -> String {
    [
        "global-include *.py".to_string(),
        "prune build, prune dist".to_string(),
        format!("exclude {entry} {RUNTIME_MODULE}"),
    ]
    .join(",")
}

/// Engine sub-command to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArmorOperation {
    /// Scaffold an application project over the source tree.
    Init {
        src: PathBuf,
        entry: String,
        project: PathBuf,
    },
    /// Set manifest filters and an empty runtime path.
    ConfigureManifest { entry: String, project: PathBuf },
    /// Apply caller-provided project options.
    Configure {
        options: Vec<String>,
        project: PathBuf,
    },
    /// Obfuscate the project into its `dist` directory.
    Build { project: PathBuf },
    /// Obfuscate one entry script and everything below its directory.
    Obfuscate {
        output: PathBuf,
        options: Vec<String>,
        script: PathBuf,
    },
}

impl ArmorOperation {
    const fn subcommand(&self) -> &'static str {
        match self {
            Self::Init { .. } => "init",
            Self::ConfigureManifest { .. } | Self::Configure { .. } => "config",
            Self::Build { .. } => "build",
            Self::Obfuscate { .. } => "obfuscate",
        }
    }
}

/// One invocation of the obfuscation engine on behalf of a backend.
#[derive(Debug, Clone)]
pub struct ArmorTool {
    backend: Backend,
    operation: ArmorOperation,
}

impl ArmorTool {
    #[must_use]
    pub const fn new(backend: Backend, operation: ArmorOperation) -> Self {
        Self { backend, operation }
    }

    /// The four project-mode steps; the extra `config` only when options are given.
    #[must_use]
    pub fn project_steps(
        backend: Backend,
        src: &Path,
        entry: &str,
        project: &Path,
        options: &[String],
    ) -> Vec<Self> {
        let mut steps = vec![
            Self::new(
                backend,
                ArmorOperation::Init {
                    src: src.to_path_buf(),
                    entry: entry.to_string(),
                    project: project.to_path_buf(),
                },
            ),
            Self::new(
                backend,
                ArmorOperation::ConfigureManifest {
                    entry: entry.to_string(),
                    project: project.to_path_buf(),
                },
            ),
        ];
        if !options.is_empty() {
            steps.push(Self::new(
                backend,
                ArmorOperation::Configure {
                    options: options.to_vec(),
                    project: project.to_path_buf(),
                },
            ));
        }
        steps.push(Self::new(
            backend,
            ArmorOperation::Build {
                project: project.to_path_buf(),
            },
        ));
        steps
    }

    /// Direct mode: a single `obfuscate` call.
    #[must_use]
    pub fn obfuscate(backend: Backend, output: &Path, options: &[String], script: &Path) -> Self {
        Self::new(
            backend,
            ArmorOperation::Obfuscate {
                output: output.to_path_buf(),
                options: options.to_vec(),
                script: script.to_path_buf(),
            },
        )
    }

    #[must_use]
    pub const fn operation(&self) -> &ArmorOperation {
        &self.operation
    }

    /// Engine arguments after the configured command prefix.
    #[must_use]
    pub fn arguments(&self) -> Vec<String> {
        let path = |p: &Path| p.to_string_lossy().into_owned();
        let mut args = vec![self.operation.subcommand().to_string()];
        match &self.operation {
            ArmorOperation::Init {
                src,
                entry,
                project,
            } => {
                args.extend([
                    "-t".to_string(),
                    "app".to_string(),
                    "--src".to_string(),
                    path(src),
                    "--entry".to_string(),
                    entry.clone(),
                    path(project),
                ]);
            }
            ArmorOperation::ConfigureManifest { entry, project } => {
                args.extend([
                    "--runtime-path".to_string(),
                    String::new(),
                    "--manifest".to_string(),
                    manifest_filters(entry),
                    path(project),
                ]);
            }
            ArmorOperation::Configure { options, project } => {
                args.extend(options.iter().cloned());
                args.push(path(project));
            }
            ArmorOperation::Build { project } => args.push(path(project)),
            ArmorOperation::Obfuscate {
                output,
                options,
                script,
            } => {
                args.extend(["-r".to_string(), "-O".to_string(), path(output)]);
                args.extend(options.iter().cloned());
                args.push(path(script));
            }
        }
        args
    }

    fn process(&self, ctx: &ToolContext) -> Result<ProcessBuilder> {
        let command = &ctx.config().tools.armor;
        let (program, prefix) = command
            .split_first()
            .context("tools.armor is empty")?;
        let program = if ctx.is_dry_run() {
            PathBuf::from(program)
        } else {
            resolve_program(Path::new(program))?
        };
        Ok(ProcessBuilder::new(program)
            .args(prefix)
            .args(self.arguments()))
    }
}

impl Tool for ArmorTool {
    fn name(&self) -> String {
        format!(
            "obfuscation engine {} for {}",
            self.operation.subcommand(),
            self.backend
        )
    }

    fn run<'a>(&'a self, ctx: &'a ToolContext) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            let name = self.name();
            let builder = self.process(ctx)?;

            if ctx.is_dry_run() {
                log_dry_run(&name, &builder);
                return Ok(());
            }

            run_checked(ctx, &name, builder).await?;
            Ok(())
        })
    }
}

// armorpack: Obfuscated Bundle Packer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! External programs driven by the pipelines.
//!
//! ```text
//! pipeline --> ToolContext --> ProcessBuilder --> Tools
//!   ArmorTool   obfuscation engine (init/config/build, obfuscate)
//!   FreezeTool  setup script, PyInstaller spec generation and build
//!   PythonTool  interpreter probe, py_compile
//! ToolContext: cancel token --> run_with_cancellation
//! ```
//!
//! Every process gets the configured timeout and captures its combined
//! output, so a failure can show what the program printed.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures_util::future::BoxFuture;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::Config;
use crate::core::process::builder::{ProcessBuilder, ProcessOutput};
use crate::error::{ProcessError, Result};

pub mod armor;
pub mod freeze;
pub mod python;

/// Context provided to tools during execution.
#[derive(Clone)]
pub struct ToolContext {
    /// Tripped by Ctrl+C; running processes are killed.
    cancel_token: CancellationToken,

    /// Log what would run instead of running it.
    dry_run: bool,

    config: Arc<Config>,
}

impl ToolContext {
    #[must_use]
    pub const fn new(config: Arc<Config>, cancel_token: CancellationToken, dry_run: bool) -> Self {
        Self {
            cancel_token,
            dry_run,
            config,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &Arc<Config> {
        &self.config
    }

    #[must_use]
    pub const fn cancel_token(&self) -> &CancellationToken {
        &self.cancel_token
    }

    #[must_use]
    pub const fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }
}

/// Trait for tools that execute external processes.
///
/// - Tools run processes through [`run_checked`], which applies the timeout
///   and cancellation token
/// - Tools respect `ctx.is_dry_run()` and only log their command line
pub trait Tool: Send + Sync {
    /// Short name used in logs and failure messages.
    fn name(&self) -> String;

    /// Executes the tool's operation.
    fn run<'a>(&'a self, ctx: &'a ToolContext) -> BoxFuture<'a, Result<()>>;
}

/// Resolves a configured program.
///
/// Bare names go through PATH (cached); anything with a directory part is
/// used as given.
///
/// # Errors
///
/// Returns `ProcessError::ExecutableNotFound` for a bare name not in PATH.
pub fn resolve_program(program: &Path) -> Result<PathBuf> {
    if program.components().count() > 1 || program.is_absolute() {
        return Ok(program.to_path_buf());
    }
    let name = program.to_string_lossy();
    ProcessBuilder::find(&name).ok_or_else(|| {
        ProcessError::ExecutableNotFound {
            name: name.into_owned(),
        }
        .into()
    })
}

/// Logs the command a dry run would have executed.
pub(crate) fn log_dry_run(what: &str, builder: &ProcessBuilder) {
    info!(
        cmd = %builder.command_line(),
        cwd = ?builder.working_dir(),
        "[dry-run] Would run {what}"
    );
}

/// Runs a process to completion and fails unless it exits 0.
///
/// `what` names the step in the failure message; the captured combined
/// output is carried by the resulting `ProcessError::NonZeroExit`.
///
/// # Errors
///
/// Returns a `ProcessError` on spawn failure, timeout, interruption, or
/// non-zero exit.
pub async fn run_checked(
    ctx: &ToolContext,
    what: &str,
    builder: ProcessBuilder,
) -> Result<ProcessOutput> {
    let mut builder = builder.name(what).capture_output();
    if let Some(timeout) = ctx.config().process.timeout() {
        builder = builder.timeout(timeout);
    }
    let command = builder.command_line();

    let output = builder
        .run_with_cancellation(ctx.cancel_token().clone())
        .await?;

    if output.is_interrupted() {
        return Err(ProcessError::Interrupted { command }.into());
    }
    Ok(output)
}

#[cfg(test)]
pub(crate) mod test_utils;

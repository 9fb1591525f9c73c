// armorpack: Obfuscated Bundle Packer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Process execution and lifecycle management.
//!
//! ```text
//! run() / run_with_cancellation(token)
//!              |
//!              v
//!     build_command()
//!     args, cwd, stdio
//!              |
//!              v
//!          spawn() --> run_child()
//!              |
//!              v
//!     timed out?   --> ProcessError::Timeout
//!     exit code    --> ProcessError::NonZeroExit (skip if ALLOW_FAILURE)
//!              |
//!              v
//!       ProcessOutput
//!  { exit_code, stdout, stderr, combined }
//! ```

use crate::error::{ProcessError, Result};
use std::fmt::Write as _;
use std::process::Stdio;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, trace};

use super::builder::{ProcessBuilder, ProcessFlags, ProcessOutput, StreamFlags};

impl ProcessBuilder {
    /// Returns the display name for this process.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.name_override().map_or_else(
            || {
                self.program().file_stem().map_or_else(
                    || "process".to_string(),
                    |s| s.to_string_lossy().into_owned(),
                )
            },
            String::from,
        )
    }

    /// Returns the full command line as a string (for logging).
    #[must_use]
    pub fn command_line(&self) -> String {
        let mut cmd = format!("{}", self.program().display());
        for arg in self.args_slice() {
            if arg.is_empty() || arg.contains(' ') {
                let _ = write!(cmd, " \"{arg}\"");
            } else {
                let _ = write!(cmd, " {arg}");
            }
        }
        cmd
    }

    /// Spawns and runs the process, waiting for completion.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Spawning the child process fails.
    /// - The process exceeds its timeout.
    /// - The process exits with a non-zero status (and `ALLOW_FAILURE` flag is not set).
    pub async fn run(self) -> Result<ProcessOutput> {
        self.execute(None).await
    }

    /// Spawns and runs the process with cancellation support.
    ///
    /// When the token is cancelled the child is killed and the output comes
    /// back with `interrupted = true`; the exit code is not checked then.
    ///
    /// # Errors
    ///
    /// Same as [`ProcessBuilder::run`], except for interruption.
    pub async fn run_with_cancellation(self, token: CancellationToken) -> Result<ProcessOutput> {
        if token.is_cancelled() {
            return Ok(ProcessOutput::new(
                -1,
                String::new(),
                String::new(),
                String::new(),
                true,
            ));
        }
        self.execute(Some(&token)).await
    }

    async fn execute(self, token: Option<&CancellationToken>) -> Result<ProcessOutput> {
        let name = self.display_name();
        let cmd_line = self.command_line();

        if let Some(cwd) = self.working_dir() {
            debug!(cwd = %cwd.display(), "cd");
        }
        debug!(cmd = %cmd_line, "exec");

        let mut command = self.build_command();
        let mut child = command.spawn().map_err(|source| ProcessError::SpawnFailed {
            command: cmd_line.clone(),
            source,
        })?;

        trace!(process = %name, pid = ?child.id(), "spawned");

        let outcome = self.run_child(&name, &mut child, token).await?;
        let output = outcome.output;

        if outcome.timed_out {
            return Err(ProcessError::Timeout {
                command: cmd_line,
                timeout_secs: self.timeout_duration().map_or(0, |d| d.as_secs()),
            }
            .into());
        }

        if !output.is_interrupted()
            && !self.process_flags().contains(ProcessFlags::ALLOW_FAILURE)
            && !output.success()
        {
            if !output.combined().is_empty() {
                error!(process = %name, output = %output.combined(), "process output");
            }
            return Err(ProcessError::NonZeroExit {
                what: name,
                command: cmd_line,
                code: output.exit_code(),
                output: output.combined().to_string(),
            }
            .into());
        }

        trace!(
            process = %name,
            exit_code = output.exit_code(),
            interrupted = output.is_interrupted(),
            "completed"
        );
        Ok(output)
    }

    fn build_command(&self) -> Command {
        let mut command = Command::new(self.program());
        command.args(self.args_slice());

        if let Some(cwd) = self.working_dir() {
            command.current_dir(cwd);
        }

        command.stdin(Stdio::null());
        command.stdout(Self::stdio_from_flags(self.stdout_flags()));
        command.stderr(Self::stdio_from_flags(self.stderr_flags()));

        // An abandoned run must not leave the child behind
        command.kill_on_drop(true);

        command
    }

    fn stdio_from_flags(flags: StreamFlags) -> Stdio {
        if flags.contains(StreamFlags::BIT_BUCKET) {
            Stdio::null()
        } else {
            Stdio::piped()
        }
    }
}

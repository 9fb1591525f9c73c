// armorpack: Obfuscated Bundle Packer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! The configured Python interpreter used for side jobs.
//!
//! ```text
//! probe    python -c <PROBE_SCRIPT>           --> InterpreterInfo
//! compile  python -c <COMPILE_SCRIPT> f1 f2 ..  (f.py --> f.pyc, in batches)
//! ```

use std::path::PathBuf;

use futures_util::future::BoxFuture;
use tracing::debug;

use super::{Tool, ToolContext, log_dry_run, resolve_program, run_checked};
use crate::core::process::builder::ProcessBuilder;
use crate::error::Result;
use crate::pack::backend::{InterpreterInfo, PROBE_SCRIPT};

/// Compiles each argument `s` to `s + "c"`, failing on the first error.
pub const COMPILE_SCRIPT: &str = "import sys, py_compile\n\
for s in sys.argv[1:]:\n    py_compile.compile(s, s + 'c', doraise=True)\n";

/// Files per interpreter run, keeping command lines well under OS limits.
pub const COMPILE_BATCH: usize = 200;

/// Byte-compiles Python sources in place.
#[derive(Debug, Clone)]
pub struct PythonTool {
    sources: Vec<PathBuf>,
}

impl PythonTool {
    /// A compile run over `sources`; each `x.py` becomes `x.pyc` beside it.
    #[must_use]
    pub const fn compile(sources: Vec<PathBuf>) -> Self {
        Self { sources }
    }

    #[must_use]
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    fn interpreter(ctx: &ToolContext) -> Result<ProcessBuilder> {
        let python = &ctx.config().tools.python;
        let python = if ctx.is_dry_run() {
            python.clone()
        } else {
            resolve_program(python)?
        };
        Ok(ProcessBuilder::new(python))
    }

    /// Asks the interpreter for its platform tag and version.
    ///
    /// Read-only, so it also runs during a dry run.
    ///
    /// # Errors
    ///
    /// Returns an error if the interpreter cannot run or its output is not
    /// understood.
    pub async fn probe(ctx: &ToolContext) -> Result<InterpreterInfo> {
        let python = &ctx.config().tools.python;
        let builder = ProcessBuilder::new(resolve_program(python)?).args(["-c", PROBE_SCRIPT]);
        let output = run_checked(ctx, "interpreter probe", builder).await?;
        let info = InterpreterInfo::parse(output.stdout())?;
        debug!(platform = %info.platform, major = info.major, minor = info.minor, "interpreter");
        Ok(info)
    }
}

impl Tool for PythonTool {
    fn name(&self) -> String {
        "py_compile".to_string()
    }

    fn run<'a>(&'a self, ctx: &'a ToolContext) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            for batch in self.sources.chunks(COMPILE_BATCH) {
                let builder = Self::interpreter(ctx)?
                    .args(["-c", COMPILE_SCRIPT])
                    .args(batch);

                if ctx.is_dry_run() {
                    log_dry_run("py_compile", &builder);
                    continue;
                }

                run_checked(ctx, "py_compile", builder).await?;
            }
            debug!(count = self.sources.len(), "compiled sources");
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests;

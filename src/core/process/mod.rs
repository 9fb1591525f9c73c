// armorpack: Obfuscated Bundle Packer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Async process spawning and management.
//!
//! ```text
//! ProcessBuilder::new("python")
//!   .args() .cwd() .timeout() .capture_output()
//!   .run() / .run_with_cancellation()
//!       --> tokio::process::Command
//!           stream stdout/stderr into one ordered buffer
//!       --> ProcessOutput { exit_code, stdout, stderr, combined }
//! ```

pub mod builder;
mod io;
mod runner;
#[cfg(test)]
mod tests;

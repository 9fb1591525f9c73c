// armorpack: Obfuscated Bundle Packer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration types for armorpack.
//!
//! # Config Structure
//!
//! ```text
//! Config: GlobalConfig, ToolsConfig, ProcessConfig, PackConfig
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::logging::LogLevel;
use crate::pack::backend::Backend;

/// Global configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    /// Log what would run without running it or touching the filesystem.
    pub dry: bool,
    /// Log level for stdout output (0-6).
    pub output_log_level: LogLevel,
    /// Log level for file output (0-6).
    pub file_log_level: LogLevel,
    /// Path to log file; no file logging when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            dry: false,
            output_log_level: LogLevel::INFO,
            file_log_level: LogLevel::DEBUG,
            log_file: None,
        }
    }
}

/// External programs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolsConfig {
    /// Interpreter that runs setup scripts, PyInstaller and `py_compile`.
    pub python: PathBuf,
    /// Obfuscation engine command: program followed by leading arguments.
    pub armor: Vec<String>,
    /// Shared runtime module copied next to the entry script.
    ///
    /// Defaults to `pytransform.py` inside the obfuscated output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime_module: Option<PathBuf>,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            python: PathBuf::from("python"),
            armor: vec!["pyarmor".to_string()],
            runtime_module: None,
        }
    }
}

/// External process limits.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessConfig {
    /// Kill any external process running longer than this; 0 waits forever.
    pub timeout_secs: u64,
}

impl ProcessConfig {
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        if self.timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.timeout_secs))
        }
    }
}

/// Defaults for the `pack` command.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PackConfig {
    /// Backend used when `-t` is not given.
    pub backend: Backend,
    /// Remove the obfuscation project directory before packing.
    pub clean: bool,
}

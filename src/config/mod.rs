// armorpack: Obfuscated Bundle Packer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for armorpack.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. armorpack.toml (cwd, optional)
//! 3. --ini files
//! 4. ARMORPACK_* env vars
//! 5. --set overrides
//! ```
//!
//! # Environment Variable Mapping
//!
//! Sections and keys are separated by a double underscore, list values by spaces:
//!
//! ```text
//! ARMORPACK_GLOBAL__DRY=true              → global.dry = true
//! ARMORPACK_PACK__BACKEND=py2exe          → pack.backend = "py2exe"
//! ARMORPACK_PROCESS__TIMEOUT_SECS=600     → process.timeout_secs = 600
//! ARMORPACK_TOOLS__ARMOR="python pyarmor.py" → tools.armor = ["python", "pyarmor.py"]
//! ```

pub mod loader;
pub mod types;


use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::Result;

pub use loader::ConfigLoader;
use types::{GlobalConfig, PackConfig, ProcessConfig, ToolsConfig};

/// Name of the per-directory config file.
pub const LOCAL_CONFIG_FILE: &str = "armorpack.toml";

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Global options.
    pub global: GlobalConfig,
    /// External programs.
    pub tools: ToolsConfig,
    /// Process limits.
    pub process: ProcessConfig,
    /// Pack command defaults.
    pub pack: PackConfig,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use armorpack::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file_optional("armorpack.toml")
    ///     .with_env_prefix("ARMORPACK")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// does not match the `Config` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Checks values the type system cannot.
    ///
    /// # Errors
    ///
    /// Returns an error if `tools.armor` is empty.
    pub fn validate(&self) -> Result<()> {
        if self.tools.armor.is_empty() {
            return Err(crate::error::ConfigError::InvalidValue {
                section: "tools".to_string(),
                key: "armor".to_string(),
                message: "command must have at least one token".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Format configuration options for display, sorted by key.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();
        self.format_global_options(&mut options);
        self.format_tools_options(&mut options);
        options.insert(
            "process.timeout_secs".into(),
            self.process.timeout_secs.to_string(),
        );
        options.insert("pack.backend".into(), self.pack.backend.to_string());
        options.insert("pack.clean".into(), self.pack.clean.to_string());

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }

    fn format_global_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("global.dry".into(), self.global.dry.to_string());
        options.insert(
            "global.output_log_level".into(),
            self.global.output_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.file_log_level".into(),
            self.global.file_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.log_file".into(),
            self.global
                .log_file
                .as_ref()
                .map_or_else(String::new, |p| p.display().to_string()),
        );
    }

    fn format_tools_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "tools.python".into(),
            self.tools.python.display().to_string(),
        );
        options.insert("tools.armor".into(), self.tools.armor.join(" "));
        options.insert(
            "tools.runtime_module".into(),
            self.tools
                .runtime_module
                .as_ref()
                .map_or_else(String::new, |p| p.display().to_string()),
        );
    }
}

// armorpack: Obfuscated Bundle Packer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Pack command arguments.
//!
//! ```text
//! -t TYPE      backend, defaults to pack.backend (PyInstaller)
//! --setup      setup script (library backends) or spec file (PyInstaller)
//! -O DIR       output directory, relative to the setup script's directory
//! -e / -x      backend / obfuscation options, split like a shell would
//! --clean      remove the obfuscation project first (or pack.clean)
//! ```

use std::path::PathBuf;

use clap::Args;

use crate::config::Config;
use crate::error::Result;
use crate::pack::backend::Backend;
use crate::pack::job::{PackRequest, split_options};

/// Arguments for the `pack` command.
#[derive(Debug, Clone, Args)]
pub struct PackArgs {
    /// Backend: PyInstaller, py2exe, py2app or cx_Freeze.
    #[arg(short = 't', long = "type", value_name = "TYPE", ignore_case = true)]
    pub backend: Option<Backend>,

    /// Setup script for py2exe, py2app and cx_Freeze, or an existing spec
    /// file for PyInstaller.
    #[arg(long = "setup", value_name = "FILE")]
    pub setup: Option<PathBuf>,

    /// Directory to put the final bundle in.
    #[arg(short = 'O', long = "output", value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Extra options for the backend, as one string.
    #[arg(short = 'e', long = "options", value_name = "OPTIONS", allow_hyphen_values = true)]
    pub options: Option<String>,

    /// Extra options for the obfuscation engine, as one string.
    #[arg(short = 'x', long = "xoptions", value_name = "XOPTIONS", allow_hyphen_values = true)]
    pub xoptions: Option<String>,

    /// Removes the obfuscation build path before packing.
    #[arg(long)]
    pub clean: bool,

    /// Entry script.
    #[arg(value_name = "SCRIPT")]
    pub script: PathBuf,
}

impl PackArgs {
    /// Builds a request, filling unset values from `config.pack`.
    ///
    /// # Errors
    ///
    /// Fails if `-e` or `-x` has unbalanced quotes.
    pub fn to_request(&self, config: &Config) -> Result<PackRequest> {
        Ok(PackRequest::builder()
            .with_backend(self.backend.unwrap_or(config.pack.backend))
            .with_entry(self.script.clone())
            .maybe_with_setup(self.setup.clone())
            .maybe_with_output(self.output.clone())
            .with_options(split_options(self.options.as_deref(), "options")?)
            .with_xoptions(split_options(self.xoptions.as_deref(), "xoptions")?)
            .with_clean(self.clean || config.pack.clean)
            .build())
    }
}

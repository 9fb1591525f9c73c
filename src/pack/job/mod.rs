// armorpack: Obfuscated Bundle Packer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Resolution of command-line input into a [`PackageJob`].
//!
//! ```text
//! SCRIPT  = sub/hello.py         src    = /abs/sub        entry = hello.py
//! --setup = other/setup.py       build  = /abs/other      script = setup.py
//! -O      = out (relative)       output = /abs/other/out
//! -O      = (none)               output = build/<backend default>
//! ```
//!
//! Derived locations:
//!
//! | pipeline   | project           | obfdist          |
//! |------------|-------------------|------------------|
//! | library    | `build/obf`       | `project/dist`   |
//! | descriptor | `output/obf`      | `project/dist`   |

use std::path::{Path, PathBuf};

use anyhow::Context;
use bon::Builder;

use crate::error::{ConfigError, Result, precondition};
use crate::pack::backend::{Backend, BackendProfile, PipelineKind};
use crate::pack::specfile::default_specfile;
use crate::utility::fs::path::{absolute_normalized, normalize_path};

/// Default setup script name in the build directory.
pub const DEFAULT_SETUP_SCRIPT: &str = "setup.py";

/// Splits an option string with shell-word rules.
///
/// # Errors
///
/// Fails on unbalanced quotes.
pub fn split_options(options: Option<&str>, key: &str) -> Result<Vec<String>> {
    let Some(options) = options else {
        return Ok(Vec::new());
    };
    shlex::split(options).ok_or_else(|| {
        ConfigError::InvalidValue {
            section: "pack".to_string(),
            key: key.to_string(),
            message: format!("cannot split '{options}' into shell words"),
        }
        .into()
    })
}

/// What the user asked for.
#[derive(Debug, Clone, Builder)]
pub struct PackRequest {
    #[builder(setters(name = with_backend))]
    pub backend: Backend,
    #[builder(setters(name = with_entry), into)]
    pub entry: PathBuf,
    #[builder(setters(name = with_setup), into)]
    pub setup: Option<PathBuf>,
    #[builder(setters(name = with_output), into)]
    pub output: Option<PathBuf>,
    #[builder(setters(name = with_options), default)]
    pub options: Vec<String>,
    #[builder(setters(name = with_xoptions), default)]
    pub xoptions: Vec<String>,
    #[builder(setters(name = with_clean), default)]
    pub clean: bool,
}

/// A fully resolved packing job. Paths are absolute and normalized.
#[derive(Debug, Clone)]
pub struct PackageJob {
    profile: BackendProfile,
    src: PathBuf,
    entry: String,
    build: PathBuf,
    script: Option<PathBuf>,
    output: PathBuf,
    xoptions: Vec<String>,
    clean: bool,
    pack_command: Vec<String>,
}

impl PackageJob {
    /// Resolves `request` against the current directory.
    ///
    /// # Errors
    ///
    /// Fails when the entry has no file name or the current directory is
    /// unavailable.
    pub fn resolve(request: PackRequest, profile: BackendProfile) -> Result<Self> {
        let entry = request
            .entry
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| precondition(format!("entry script {} has no file name", request.entry.display())))?;
        let src = absolute_normalized(parent_or_cwd(&request.entry))?;

        let (build, script) = match &request.setup {
            Some(setup) => {
                let name = setup
                    .file_name()
                    .with_context(|| format!("setup script {} has no file name", setup.display()))?;
                (absolute_normalized(parent_or_cwd(setup))?, Some(PathBuf::from(name)))
            }
            None => (src.clone(), None),
        };

        let output = match &request.output {
            Some(out) if out.is_absolute() => normalize_path(out),
            Some(out) => normalize_path(&build.join(out)),
            None => normalize_path(&build.join(&profile.default_output)),
        };

        let pack_command = profile.pack_command(&output, &request.options);

        Ok(Self {
            profile,
            src,
            entry,
            build,
            script,
            output,
            xoptions: request.xoptions,
            clean: request.clean,
            pack_command,
        })
    }

    #[must_use]
    pub const fn backend(&self) -> Backend {
        self.profile.backend
    }

    #[must_use]
    pub const fn profile(&self) -> &BackendProfile {
        &self.profile
    }

    #[must_use]
    pub fn src(&self) -> &Path {
        &self.src
    }

    #[must_use]
    pub fn entry(&self) -> &str {
        &self.entry
    }

    #[must_use]
    pub fn build(&self) -> &Path {
        &self.build
    }

    #[must_use]
    pub fn output(&self) -> &Path {
        &self.output
    }

    #[must_use]
    pub fn xoptions(&self) -> &[String] {
        &self.xoptions
    }

    #[must_use]
    pub const fn clean(&self) -> bool {
        self.clean
    }

    /// Backend tokens: base, output directory, extra options.
    #[must_use]
    pub fn pack_command(&self) -> &[String] {
        &self.pack_command
    }

    /// Obfuscation project directory.
    #[must_use]
    pub fn project(&self) -> PathBuf {
        match self.profile.backend.pipeline_kind() {
            PipelineKind::Library => self.build.join("obf"),
            PipelineKind::Descriptor => self.output.join("obf"),
        }
    }

    /// Where the engine writes the obfuscated tree.
    #[must_use]
    pub fn obfdist(&self) -> PathBuf {
        self.project().join("dist")
    }

    /// The setup script, `build/setup.py` unless `--setup` named another.
    #[must_use]
    pub fn setup_script(&self) -> PathBuf {
        self.build.join(
            self.script
                .as_deref()
                .unwrap_or_else(|| Path::new(DEFAULT_SETUP_SCRIPT)),
        )
    }

    /// The spec file, `--setup` if given, else `src/<stem>.spec`.
    #[must_use]
    pub fn specfile(&self) -> PathBuf {
        self.script.as_ref().map_or_else(
            || default_specfile(&self.src, &self.entry),
            |script| self.build.join(script),
        )
    }

    /// The backend's library archive in the output directory.
    #[must_use]
    pub fn library_archive(&self) -> Option<PathBuf> {
        self.profile
            .library
            .as_ref()
            .map(|name| self.output.join(name))
    }
}

fn parent_or_cwd(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

#[cfg(test)]
mod tests;

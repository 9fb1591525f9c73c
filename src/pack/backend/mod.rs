// armorpack: Obfuscated Bundle Packer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Supported freezing backends and their path conventions.
//!
//! ```text
//! Backend        output subpath                 archive            base tokens
//! PyInstaller    dist                           -                  -m PyInstaller --distpath
//! py2exe         dist                           library.zip        py2exe --dist-dir
//! py2app         dist                           library.zip        py2app --dist-dir
//! cx_Freeze      build/exe.<plat>-<maj>.<min>   python<maj><min>.zip  build --build-exe
//! ```
//!
//! cx_Freeze names depend on the interpreter, so its profile needs an
//! [`InterpreterInfo`] obtained by probing the configured Python.


use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;
use clap::ValueEnum;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ConfigError, Result, precondition};

/// Python snippet printing `<platform> <major>.<minor>`.
pub const PROBE_SCRIPT: &str =
    "import sys, sysconfig; print(sysconfig.get_platform(), '%d.%d' % sys.version_info[:2])";

/// One of the four freezing backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum)]
pub enum Backend {
    #[default]
    #[value(name = "PyInstaller")]
    PyInstaller,
    #[value(name = "py2exe")]
    Py2exe,
    #[value(name = "py2app")]
    Py2app,
    #[value(name = "cx_Freeze")]
    CxFreeze,
}

/// Which orchestration a backend goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineKind {
    /// Setup script + library archive rewrite.
    Library,
    /// Generated and patched build descriptor.
    Descriptor,
}

impl Backend {
    pub const ALL: [Self; 4] = [Self::PyInstaller, Self::Py2exe, Self::Py2app, Self::CxFreeze];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PyInstaller => "PyInstaller",
            Self::Py2exe => "py2exe",
            Self::Py2app => "py2app",
            Self::CxFreeze => "cx_Freeze",
        }
    }

    #[must_use]
    pub const fn pipeline_kind(self) -> PipelineKind {
        match self {
            Self::PyInstaller => PipelineKind::Descriptor,
            Self::Py2exe | Self::Py2app | Self::CxFreeze => PipelineKind::Library,
        }
    }

    /// Whether the profile depends on the interpreter platform and version.
    #[must_use]
    pub const fn needs_interpreter(self) -> bool {
        matches!(self, Self::CxFreeze)
    }

    /// Command the user can run to create a missing setup script.
    #[must_use]
    pub const fn setup_hint(self) -> &'static str {
        match self {
            Self::Py2exe => "python -m py2exe.build_exe -W setup.py hello.py",
            Self::CxFreeze => "cxfreeze-quickstart",
            Self::PyInstaller | Self::Py2app => "vi setup.py",
        }
    }

    /// Builds the path conventions for this backend.
    ///
    /// # Errors
    ///
    /// Fails for cx_Freeze when `interpreter` is `None`.
    pub fn profile(self, interpreter: Option<&InterpreterInfo>) -> Result<BackendProfile> {
        let tokens = |items: &[&str]| items.iter().map(|s| (*s).to_string()).collect::<Vec<_>>();

        let profile = match self {
            Self::PyInstaller => BackendProfile {
                backend: self,
                default_output: PathBuf::from("dist"),
                library: None,
                base_tokens: tokens(&["-m", "PyInstaller", "--distpath"]),
            },
            Self::Py2exe | Self::Py2app => BackendProfile {
                backend: self,
                default_output: PathBuf::from("dist"),
                library: Some("library.zip".to_string()),
                base_tokens: tokens(&[self.as_str(), "--dist-dir"]),
            },
            Self::CxFreeze => {
                let info = interpreter.ok_or_else(|| {
                    precondition("cx_Freeze needs the interpreter platform and version")
                })?;
                BackendProfile {
                    backend: self,
                    default_output: PathBuf::from("build").join(format!(
                        "exe.{}-{}.{}",
                        info.platform, info.major, info.minor
                    )),
                    library: Some(format!("python{}{}.zip", info.major, info.minor)),
                    base_tokens: tokens(&["build", "--build-exe"]),
                }
            }
        };
        Ok(profile)
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|b| b.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::InvalidValue {
                section: "pack".to_string(),
                key: "backend".to_string(),
                message: format!(
                    "expected one of PyInstaller, py2exe, py2app, cx_Freeze; got '{s}'"
                ),
            })
    }
}

impl Serialize for Backend {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Backend {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Path conventions of one backend. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendProfile {
    pub backend: Backend,
    /// Output directory relative to the build directory.
    pub default_output: PathBuf,
    /// Library archive file name inside the output directory.
    pub library: Option<String>,
    /// Tokens placed before the output directory on the backend command line.
    pub base_tokens: Vec<String>,
}

impl BackendProfile {
    /// Backend command: base tokens, output directory, then extra options.
    #[must_use]
    pub fn pack_command(&self, output: &std::path::Path, extra: &[String]) -> Vec<String> {
        let mut cmd = self.base_tokens.clone();
        cmd.push(output.to_string_lossy().into_owned());
        cmd.extend(extra.iter().cloned());
        cmd
    }
}

/// Interpreter platform tag and version as reported by the probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpreterInfo {
    pub platform: String,
    pub major: u32,
    pub minor: u32,
}

impl InterpreterInfo {
    /// Parses the first line of [`PROBE_SCRIPT`] output, e.g. `linux-x86_64 3.11`.
    ///
    /// # Errors
    ///
    /// Returns an error if no line matches.
    pub fn parse(output: &str) -> Result<Self> {
        let regex = Regex::new(r"(?m)^\s*(\S+)\s+(\d+)\.(\d+)")
            .context("failed to compile interpreter probe regex")?;
        let captures = regex
            .captures(output)
            .with_context(|| format!("unexpected interpreter probe output: '{}'", output.trim()))?;

        let field = |i: usize| captures.get(i).map_or("", |m| m.as_str());
        Ok(Self {
            platform: field(1).to_string(),
            major: field(2)
                .parse()
                .context("interpreter major version out of range")?,
            minor: field(3)
                .parse()
                .context("interpreter minor version out of range")?,
        })
    }
}

// armorpack: Obfuscated Bundle Packer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!               PackError (~24 bytes)
//!                      |
//!   +------+------+----+----+-------+------+------+
//!   |      |      |         |       |      |      |
//!   v      v      v         v       v      v      v
//! Bail  Precond  Cfg      Proc    Spec  Archive  Fs  Io/Other
//!       Box<str> Box      Box     Box    Box    Box  Box<str>
//!
//! Sub-errors (unboxed internally):
//!   Config    ParseError, MissingKey, InvalidValue
//!   Process   SpawnFailed, NonZeroExit(+output), Timeout, Interrupted
//!   Specfile  NoAnchor, MultipleAnchors, UnquotablePath
//!   Archive   UnsafeMemberName, MissingMember, Zip
//!   Fs        NotFound, IoError
//! ```

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`PackError`].
pub type PackResult<T> = std::result::Result<T, PackError>;

/// Top-level application error type.
///
/// All sub-errors are boxed to keep this enum at ~24 bytes on the stack.
#[derive(Debug, Error)]
pub enum PackError {
    /// Fatal error that should terminate the application.
    #[error("fatal error: {0}")]
    Bailed(Box<str>),

    /// A required input artifact is missing.
    #[error("precondition failed: {0}")]
    Precondition(Box<str>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// Process execution error.
    #[error("process error: {0}")]
    Process(#[from] Box<ProcessError>),

    /// Build descriptor error.
    #[error("specfile error: {0}")]
    Specfile(#[from] Box<SpecfileError>),

    /// Library archive error.
    #[error("archive error: {0}")]
    Archive(#[from] Box<ArchiveError>),

    /// Filesystem error.
    #[error("filesystem error: {0}")]
    Fs(#[from] Box<FsError>),

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),

    /// Generic error with message.
    #[error("{0}")]
    Other(Box<str>),
}

/// Create a fatal [`PackError::Bailed`] that terminates the application.
pub fn bail_out(message: impl Into<String>) -> PackError {
    PackError::Bailed(message.into().into_boxed_str())
}

/// Create a [`PackError::Precondition`] naming the missing artifact.
pub fn precondition(message: impl Into<String>) -> PackError {
    PackError::Precondition(message.into().into_boxed_str())
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for PackError {
                fn from(err: $error) -> Self {
                    PackError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    ConfigError => Config,
    ProcessError => Process,
    SpecfileError => Specfile,
    ArchiveError => Archive,
    FsError => Fs,
    std::io::Error => Io,
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: String, message: String },

    /// Missing required configuration key.
    #[error("missing required config key '{key}' in section '[{section}]'")]
    MissingKey { section: String, key: String },

    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },
}

// --- Process Errors ---

/// Process execution errors.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Executable not found in PATH.
    #[error("executable not found: '{name}' (not in PATH)")]
    ExecutableNotFound { name: String },

    /// Failed to spawn process.
    #[error("failed to spawn process '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Process exited with a non-zero status. Carries the combined output.
    #[error("{what}: '{command}' exited with code {code}\n\n{output}")]
    NonZeroExit {
        what: String,
        command: String,
        code: i32,
        output: String,
    },

    /// Process timed out.
    #[error("process '{command}' timed out after {timeout_secs} seconds")]
    Timeout { command: String, timeout_secs: u64 },

    /// Process was interrupted by the user.
    #[error("process '{command}' was interrupted")]
    Interrupted { command: String },
}

// --- Specfile Errors ---

/// Build descriptor (spec file) errors.
#[derive(Debug, Error)]
pub enum SpecfileError {
    /// The anchor line was not found.
    #[error("unsupported specfile '{path}': no line starting with '{anchor}' found")]
    NoAnchor { path: String, anchor: &'static str },

    /// More than one anchor line was found.
    #[error("unsupported specfile '{path}': {count} lines start with '{anchor}'")]
    MultipleAnchors {
        path: String,
        anchor: &'static str,
        count: usize,
    },

    /// A path contains both quote characters and cannot be written as a raw literal.
    #[error("path cannot be quoted as a raw string literal: {0}")]
    UnquotablePath(String),
}

// --- Archive Errors ---

/// Library archive errors.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// A member name would escape the extraction directory.
    #[error("unsafe member name '{name}' in {archive}")]
    UnsafeMemberName { archive: String, name: String },

    /// A member recorded in the original archive is gone from the tree.
    #[error("member '{name}' of {archive} missing from {dir}")]
    MissingMember {
        archive: String,
        name: String,
        dir: String,
    },

    /// Error from the zip library.
    #[error("zip error on {archive}: {source}")]
    Zip {
        archive: String,
        #[source]
        source: zip::result::ZipError,
    },
}

// --- Filesystem Errors ---

/// Filesystem operation errors.
#[derive(Debug, Error)]
pub enum FsError {
    /// Path not found.
    #[error("path not found: {0}")]
    NotFound(String),

    /// General I/O error.
    #[error("I/O error on '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests;

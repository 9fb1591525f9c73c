// armorpack: Obfuscated Bundle Packer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for armorpack using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! armorpack [global options] <command>
//! pack [-t TYPE] [--setup FILE] [-O DIR] [-e OPTIONS] [-x XOPTIONS] [--clean] SCRIPT
//! list
//! options
//! inis
//! version
//! ```

pub mod global;
pub mod pack;


use crate::cli::global::GlobalOptions;
use crate::cli::pack::PackArgs;
use clap::{Parser, Subcommand};

/// Obfuscated Bundle Packer
///
/// Packs obfuscated Python scripts into standalone bundles.
#[derive(Debug, Parser)]
#[command(
    name = "armorpack",
    author,
    version,
    about = "Obfuscated Bundle Packer",
    long_about = "armorpack Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Obfuscates a Python program with the obfuscation engine and\n\
                  packs it with PyInstaller, py2exe, py2app or cx_Freeze.\n\n\
                  `armorpack pack hello.py` builds dist/ next to hello.py with\n\
                  PyInstaller. See `armorpack pack --help` for the options.",
    after_help = "CONFIG FILES:\n\n\
                  armorpack reads `armorpack.toml` in the current directory if it\n\
                  exists, then every --ini in order. ARMORPACK_SECTION__KEY\n\
                  environment variables override files, and --set KEY=VALUE\n\
                  overrides everything."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    #[command(visible_alias = "-v")]
    Version,

    /// Lists all options and their values.
    Options,

    /// Lists the config files in use.
    Inis,

    /// Obfuscates and packs an entry script.
    Pack(PackArgs),

    /// Lists the supported backends and their conventions.
    List,
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parses command-line arguments from an iterator.
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::parse_from(iter)
}

/// Tries to parse command-line arguments, returning an error on failure.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version information
/// was requested.
pub fn try_parse() -> Result<Cli, clap::Error> {
    Cli::try_parse()
}

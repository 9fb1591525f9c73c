// armorpack: Obfuscated Bundle Packer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Library root.
//!
//! # Crate Architecture
//!
//! ```text
//!                        main.rs
//!                           |
//!                +----------+----------+
//!                v                     v
//!             cli (clap)          cmd (handlers)
//!                |            pack / options / list
//!                +----------+----------+
//!                           v
//!              ,---------------------------,
//!              |          config           |
//!              |   TOML, layered settings  |
//!              '-------------+-------------'
//!                            |
//!                            v
//!                  pack::pipeline (library | descriptor)
//!                            |
//!        +--------+----------+---------+---------+
//!        v        v          v         v         v
//!      tools  substitute  library  specfile   runtime
//!   engine/backend  entry swap   zip   patching   copying
//!
//!   +-----------------------------------------+
//!   |  core   process builder and runner      |
//!   +-----------------------------------------+
//!   |  foundation   error, logging, utility   |
//!   +-----------------------------------------+
//! ```

pub mod cli;
pub mod cmd;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod pack;
pub mod utility;

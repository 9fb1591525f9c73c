// armorpack: Obfuscated Bundle Packer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command implementations.
//!
//! ```text
//! CLI args --> cmd::run_* handlers
//!   pack, config (options, inis), list
//! ```

pub mod config;
pub mod list;
pub mod pack;

// armorpack: Obfuscated Bundle Packer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Core modules for process management.
//!
//! ```text
//!        core
//!         |
//!         v
//!      process
//!         |
//!   Builder / Output
//!   timeout, cancel
//! ```

pub mod process;

// armorpack: Obfuscated Bundle Packer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! The packing domain.
//!
//! ```text
//! backend     Backend enum, per-backend path conventions
//! job         PackRequest --> PackageJob
//! tools       obfuscation engine, freezing backends, interpreter
//! substitute  entry script swap guard
//! library     library archive rewrite
//! specfile    PyInstaller spec file patching
//! runtime     runtime-support files
//! pipeline    orchestration
//! ```

pub mod backend;
pub mod job;
pub mod library;
pub mod pipeline;
pub mod runtime;
pub mod specfile;
pub mod substitute;
pub mod tools;

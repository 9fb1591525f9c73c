// armorpack: Obfuscated Bundle Packer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! List command implementation for armorpack.

use crate::error::Result;
use crate::pack::backend::{Backend, InterpreterInfo, PipelineKind};

/// One row per backend: name, pipeline, default output, library archive.
///
/// cx_Freeze depends on the interpreter; its row shows placeholders.
///
/// # Errors
///
/// Returns an error if a profile cannot be built.
pub fn format_backends() -> Result<Vec<String>> {
    let placeholder = InterpreterInfo {
        platform: "<platform>".to_string(),
        major: 3,
        minor: 0,
    };

    let mut rows = Vec::with_capacity(Backend::ALL.len());
    for backend in Backend::ALL {
        let profile = backend.profile(Some(&placeholder))?;
        let pipeline = match backend.pipeline_kind() {
            PipelineKind::Library => "setup script + library",
            PipelineKind::Descriptor => "spec file",
        };
        let (output, library) = if backend.needs_interpreter() {
            (
                "build/exe.<platform>-<major>.<minor>".to_string(),
                "python<major><minor>.zip".to_string(),
            )
        } else {
            (
                profile.default_output.display().to_string().replace('\\', "/"),
                profile.library.unwrap_or_else(|| "-".to_string()),
            )
        };
        rows.push(format!(
            "{:<12} {pipeline:<22} {output:<38} {library}",
            backend.as_str()
        ));
    }
    Ok(rows)
}

/// Main handler for list command.
///
/// # Errors
///
/// Returns an error if a profile cannot be built.
pub fn run_list_command() -> Result<()> {
    for row in format_backends()? {
        println!("{row}");
    }
    Ok(())
}

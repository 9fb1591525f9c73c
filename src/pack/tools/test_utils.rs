// armorpack: Obfuscated Bundle Packer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Shared helpers for tool and pipeline tests.

use std::io::Write;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

use super::ToolContext;
use crate::config::Config;

#[derive(Clone)]
struct BufferWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl Write for BufferWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer
            .lock()
            .map_err(|_| std::io::Error::other("buffer poisoned"))?
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[derive(Clone)]
struct BufferMakeWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl<'a> MakeWriter<'a> for BufferMakeWriter {
    type Writer = BufferWriter;

    fn make_writer(&'a self) -> Self::Writer {
        BufferWriter {
            buffer: self.buffer.clone(),
        }
    }
}

/// Runs an async closure while capturing INFO-and-above tracing output.
///
/// Only works on a current-thread runtime, where the default subscriber
/// stays in effect across awaits.
pub(crate) async fn run_with_logs<F, Fut>(f: F) -> Result<String>
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = Result<()>>,
{
    let buffer = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_writer(BufferMakeWriter {
            buffer: buffer.clone(),
        })
        .with_max_level(Level::INFO)
        .with_ansi(false)
        .with_target(false)
        .with_level(false)
        .without_time()
        .finish();

    let _guard = tracing::subscriber::set_default(subscriber);
    f().await?;

    let guard = buffer
        .lock()
        .map_err(|_| anyhow::anyhow!("log buffer poisoned"))?;
    Ok(String::from_utf8_lossy(&guard).to_string())
}

/// Keeps only the `[dry-run]` lines, from the marker on.
pub(crate) fn dry_run_lines(logs: &str) -> String {
    logs.lines()
        .filter_map(|line| line.find("[dry-run]").map(|idx| &line[idx..]))
        .collect::<Vec<_>>()
        .join("\n")
}

/// A context over the given config.
pub(crate) fn context(config: Config, dry_run: bool) -> ToolContext {
    ToolContext::new(Arc::new(config), CancellationToken::new(), dry_run)
}

/// Writes an executable shell script.
#[cfg(unix)]
pub(crate) fn write_script(path: &std::path::Path, body: &str) {
    use std::os::unix::fs::PermissionsExt;

    std::fs::write(path, format!("#!/bin/sh\n{body}")).expect("write script");
    let mut perms = std::fs::metadata(path).expect("metadata").permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(path, perms).expect("chmod");
}

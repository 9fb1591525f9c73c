// armorpack: Obfuscated Bundle Packer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! I/O streaming and output capture for processes.
//!
//! ```text
//! run_child()
//!   stdout/stderr reader tasks
//!   one mpsc channel, lines tagged with their stream
//!   wait (or cancel / timeout)
//!   --> ChildOutcome { ProcessOutput, timed_out }
//!
//! read_stream()
//!   read_until('\n') + from_utf8_lossy, so a stray byte never ends capture
//! ```

use crate::error::Result;
use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Child;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{trace, warn};

use super::builder::{ProcessBuilder, ProcessOutput, StreamFlags};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stream {
    Stdout,
    Stderr,
}

impl Stream {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Stdout => "stdout",
            Self::Stderr => "stderr",
        }
    }
}

/// Result of waiting on a child.
pub(super) struct ChildOutcome {
    pub(super) output: ProcessOutput,
    pub(super) timed_out: bool,
}

fn spawn_reader<R>(
    reader: Option<R>,
    stream: Stream,
    flags: StreamFlags,
    process_name: &str,
    tx: mpsc::UnboundedSender<(Stream, String)>,
) -> Option<JoinHandle<()>>
where
    R: tokio::io::AsyncRead + Unpin + Send + 'static,
{
    if !flags.intersects(StreamFlags::FORWARD_TO_LOG | StreamFlags::KEEP_IN_STRING) {
        return None;
    }
    reader.map(|reader| {
        let name = process_name.to_string();
        tokio::spawn(async move {
            read_stream(reader, stream, flags, &name, tx).await;
        })
    })
}

/// Splits channel contents into stdout, stderr and the merged buffer.
fn collect_output(rx: &mut mpsc::UnboundedReceiver<(Stream, String)>) -> (String, String, String) {
    let mut stdout = String::new();
    let mut stderr = String::new();
    let mut combined = String::new();

    let push = |buf: &mut String, line: &str| {
        if !buf.is_empty() {
            buf.push('\n');
        }
        buf.push_str(line);
    };

    while let Ok((stream, line)) = rx.try_recv() {
        match stream {
            Stream::Stdout => push(&mut stdout, &line),
            Stream::Stderr => push(&mut stderr, &line),
        }
        push(&mut combined, &line);
    }
    (stdout, stderr, combined)
}

async fn await_readers(handles: [Option<JoinHandle<()>>; 2]) {
    for handle in handles.into_iter().flatten() {
        let _ = handle.await;
    }
}

impl ProcessBuilder {
    /// Runs the child process, handling I/O streaming and waiting for completion.
    ///
    /// A cancelled token or an elapsed timeout kills the child.
    pub(super) async fn run_child(
        &self,
        name: &str,
        child: &mut Child,
        token: Option<&CancellationToken>,
    ) -> Result<ChildOutcome> {
        let (tx, mut rx) = mpsc::unbounded_channel::<(Stream, String)>();

        let readers = [
            spawn_reader(
                child.stdout.take(),
                Stream::Stdout,
                self.stdout_flags(),
                name,
                tx.clone(),
            ),
            spawn_reader(
                child.stderr.take(),
                Stream::Stderr,
                self.stderr_flags(),
                name,
                tx,
            ),
        ];

        let cancelled = async {
            match token {
                Some(token) => token.cancelled().await,
                None => std::future::pending().await,
            }
        };
        let deadline = async {
            match self.timeout_duration() {
                Some(duration) => tokio::time::sleep(duration).await,
                None => std::future::pending().await,
            }
        };

        let (status, interrupted, timed_out) = tokio::select! {
            status = child.wait() => (status?, false, false),
            () = cancelled => {
                warn!(process = %name, "cancellation requested, terminating process");
                child.kill().await.ok();
                let status = child.wait().await
                    .with_context(|| format!("failed waiting for process {name} to exit"))?;
                (status, true, false)
            }
            () = deadline => {
                warn!(process = %name, timeout = ?self.timeout_duration(), "process timed out");
                child.kill().await.with_context(|| format!("failed to kill process {name}"))?;
                (child.wait().await?, false, true)
            }
        };

        await_readers(readers).await;

        let (stdout, stderr, combined) = collect_output(&mut rx);
        let keep = |flags: StreamFlags, text: String| {
            if flags.contains(StreamFlags::KEEP_IN_STRING) {
                text
            } else {
                String::new()
            }
        };
        let combined = if self
            .stdout_flags()
            .union(self.stderr_flags())
            .contains(StreamFlags::KEEP_IN_STRING)
        {
            combined
        } else {
            String::new()
        };

        Ok(ChildOutcome {
            output: ProcessOutput::new(
                status.code().unwrap_or(-1),
                keep(self.stdout_flags(), stdout),
                keep(self.stderr_flags(), stderr),
                combined,
                interrupted,
            ),
            timed_out,
        })
    }
}

/// Reads from a stream line by line, forwarding and/or keeping each line.
async fn read_stream<R>(
    reader: R,
    stream: Stream,
    flags: StreamFlags,
    process_name: &str,
    tx: mpsc::UnboundedSender<(Stream, String)>,
) where
    R: tokio::io::AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                let line = line.trim_end_matches(['\r', '\n']);
                if flags.contains(StreamFlags::FORWARD_TO_LOG) {
                    trace!(process = %process_name, stream = stream.as_str(), line = %line, "output");
                }
                if flags.contains(StreamFlags::KEEP_IN_STRING) {
                    let _ = tx.send((stream, line.to_string()));
                }
            }
            Err(e) => {
                warn!(
                    process = %process_name,
                    stream = stream.as_str(),
                    error = %e,
                    "error reading stream"
                );
                break;
            }
        }
    }
}

// src/exec/process.rs

//! Child process execution for shell and script items.

use std::io::{self, Read};
use std::process::Stdio;

use anyhow::anyhow;
use tokio::process::Command;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::errors::{Result, WrapbarError};
use crate::exec::ExecutionOutcome;
use crate::sink::LogSink;
use crate::types::ItemKind;

const CAPTURE_CHUNK: usize = 8 * 1024;

/// Spawn `argv` and block until it exits or `cancel` fires.
///
/// - With a sink, the item's log block is written around the process. The
///   child's stdout and stderr share one pipe, so the sink receives them in
///   the order the child wrote them.
/// - Without a sink, the child's output is discarded so it cannot tear the
///   bar.
/// - A spawn failure is an error; a non-zero exit is only an outcome.
/// - On cancellation the child is killed (via `kill_on_drop`) and no `END`
///   trailer is written.
pub async fn run_process(
    kind: ItemKind,
    text: &str,
    argv: &[String],
    sink: Option<&LogSink>,
    cancel: &CancellationToken,
) -> Result<ExecutionOutcome> {
    debug!(%kind, item = %text, ?argv, "starting item process");

    if let Some(sink) = sink {
        sink.write_header(kind, text)?;
    }

    let (program, args) = argv.split_first().ok_or_else(|| WrapbarError::Spawn {
        item: text.to_string(),
        source: io::Error::new(io::ErrorKind::InvalidInput, "empty command"),
    })?;

    let mut cmd = Command::new(program);
    cmd.args(args).stdin(Stdio::null()).kill_on_drop(true);

    let capture = match sink {
        Some(sink) => {
            let (reader, writer) = io::pipe()?;
            cmd.stdout(writer.try_clone()?).stderr(writer);
            Some(reader)
        }
        None => {
            cmd.stdout(Stdio::null()).stderr(Stdio::null());
            None
        }
    };

    let spawned = cmd.spawn();
    // The command still holds the pipe's write ends; the reader only sees
    // EOF once they are gone.
    drop(cmd);
    let mut child = spawned.map_err(|source| WrapbarError::Spawn {
        item: text.to_string(),
        source,
    })?;

    let capture = match (capture, sink) {
        (Some(reader), Some(sink)) => Some(spawn_capture(reader, sink.clone())),
        _ => None,
    };

    let status = tokio::select! {
        biased;

        _ = cancel.cancelled() => {
            info!(%kind, item = %text, "cancellation requested; abandoning running item");
            return Ok(ExecutionOutcome::Cancelled);
        }

        status = child.wait() => status?,
    };

    if let (Some(capture), Some(sink)) = (capture, sink) {
        capture
            .await
            .map_err(|err| anyhow!("output capture for '{text}' panicked: {err}"))??;
        sink.write_end()?;
    }

    let code = status.code().unwrap_or(-1);
    if status.success() {
        debug!(%kind, item = %text, "item process exited successfully");
        Ok(ExecutionOutcome::Succeeded)
    } else {
        warn!(%kind, item = %text, exit_code = code, "item process failed; continuing");
        Ok(ExecutionOutcome::Failed(code))
    }
}

/// Copy everything the child writes into `sink`, chunk by chunk, until the
/// last write end of the pipe is closed.
fn spawn_capture(mut reader: io::PipeReader, sink: LogSink) -> JoinHandle<Result<()>> {
    tokio::task::spawn_blocking(move || {
        let mut buf = vec![0u8; CAPTURE_CHUNK];
        loop {
            match reader.read(&mut buf) {
                Ok(0) => return Ok(()),
                Ok(n) => sink.write_bytes(&buf[..n])?,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => return Err(err.into()),
            }
        }
    })
}

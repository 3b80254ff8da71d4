// src/sink.rs

//! Destination for the per-item run log.
//!
//! A [`LogSink`] is a cheap, cloneable handle around one writer. The caller
//! may keep a clone while a run uses another; when the run is told to
//! auto-close, closing through any clone makes every clone unusable.
//! Otherwise the caller owns the open sink after the run returns and decides
//! when to [`close`](LogSink::close) it.
//!
//! Each executed item produces one block:
//!
//! ```text
//! October 19, 2026 14 hours 03 minutes 59 seconds
//! Command Executed: 'echo hi'
//! hi
//!
//! END
//! ```

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Local;
use tracing::debug;

use crate::errors::{Result, WrapbarError};
use crate::types::ItemKind;

/// File name used when logging is enabled without a destination.
pub const DEFAULT_LOG_FILE: &str = ".log";

type Writer = Box<dyn Write + Send>;

#[derive(Clone)]
pub struct LogSink {
    inner: Arc<Mutex<Option<Writer>>>,
    description: Arc<str>,
}

impl fmt::Debug for LogSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogSink")
            .field("description", &self.description)
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl LogSink {
    /// Wrap an arbitrary writer (an in-memory buffer, a pipe, ...).
    pub fn from_writer(writer: impl Write + Send + 'static) -> Self {
        Self::new(Box::new(writer), "<writer>")
    }

    /// Create (or truncate) a log file at `path`.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path)?;
        debug!(path = %path.display(), "opened log file");
        Ok(Self::new(
            Box::new(BufWriter::new(file)),
            &path.display().to_string(),
        ))
    }

    /// Create `.log` in the current working directory, truncating it.
    pub fn create_default() -> Result<Self> {
        Self::create(default_log_path())
    }

    fn new(writer: Writer, description: &str) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Some(writer))),
            description: Arc::from(description),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_closed(&self) -> bool {
        self.lock().is_none()
    }

    pub fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
        let mut guard = self.lock();
        let writer = guard.as_mut().ok_or(WrapbarError::SinkClosed)?;
        writer.write_all(bytes)?;
        Ok(())
    }

    /// Write the timestamp and "executed" lines that open an item block.
    pub fn write_header(&self, kind: ItemKind, text: &str) -> Result<()> {
        let now = Local::now();
        let header = format!(
            "{}\n{}: '{}'\n",
            now.format("%B %d, %Y %H hours %M minutes %S seconds"),
            kind.log_header(),
            text
        );
        self.write_bytes(header.as_bytes())
    }

    /// Write the trailer that closes an item block and flush.
    pub fn write_end(&self) -> Result<()> {
        self.write_bytes(b"\nEND\n")?;
        self.flush()
    }

    pub fn flush(&self) -> Result<()> {
        let mut guard = self.lock();
        let writer = guard.as_mut().ok_or(WrapbarError::SinkClosed)?;
        writer.flush()?;
        Ok(())
    }

    /// Flush and drop the underlying writer. Closing twice is a no-op.
    pub fn close(&self) -> Result<()> {
        let writer = self.lock().take();
        if let Some(mut writer) = writer {
            writer.flush()?;
            debug!(sink = %self.description, "log sink closed");
        }
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Option<Writer>> {
        // A panic mid-write leaves the writer itself intact.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// `<cwd>/.log`, falling back to a relative path when the cwd is unknown.
pub fn default_log_path() -> PathBuf {
    std::env::current_dir()
        .map(|cwd| cwd.join(DEFAULT_LOG_FILE))
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_LOG_FILE))
}

/// Logging options for one run.
#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    /// Whether to write a run log at all.
    pub enabled: bool,
    /// An already open destination, shared with the caller.
    pub sink: Option<LogSink>,
    /// File to create when no `sink` is given; `None` means
    /// [`default_log_path`]. Nothing is created until [`acquire`](Self::acquire).
    pub path: Option<PathBuf>,
    /// Close the sink once the run returns.
    pub auto_close: bool,
}

impl LogOptions {
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn to_sink(sink: LogSink, auto_close: bool) -> Self {
        Self {
            enabled: true,
            sink: Some(sink),
            path: None,
            auto_close,
        }
    }

    /// Log to a file created (or truncated) when the run acquires it.
    pub fn to_file(path: impl Into<PathBuf>, auto_close: bool) -> Self {
        Self {
            enabled: true,
            sink: None,
            path: Some(path.into()),
            auto_close,
        }
    }

    /// Resolve the sink for a run, opening the log file if needed.
    pub fn acquire(&self) -> Result<Option<LogSink>> {
        if !self.enabled {
            return Ok(None);
        }
        match (&self.sink, &self.path) {
            (Some(sink), _) => Ok(Some(sink.clone())),
            (None, Some(path)) => LogSink::create(path).map(Some),
            (None, None) => LogSink::create_default().map(Some),
        }
    }
}

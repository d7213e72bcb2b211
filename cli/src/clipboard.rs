//! Clipboard Module
//!
//! The summary report leaves the tool through a `ClipboardSink`:
//!
//! - `TerminalClipboard`: sets the host clipboard with an OSC 52 escape
//!   sequence written to the controlling terminal
//! - `FileClipboard`: writes the report to a file, for terminals without
//!   OSC 52 support
//!
//! `export` runs the write off the UI task with a timeout and reports the
//! outcome back; it never retries.

use crate::error::ExportError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{info, warn};

pub const EXPORT_TIMEOUT: Duration = Duration::from_secs(2);

pub trait ClipboardSink: Send + Sync {
    fn describe(&self) -> String;

    fn write_text(&self, text: &str) -> Result<(), ExportError>;
}

/// `ESC ] 52 ; c ; <base64> BEL`
pub fn osc52_sequence(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", STANDARD.encode(text))
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalClipboard;

impl ClipboardSink for TerminalClipboard {
    fn describe(&self) -> String {
        "terminal clipboard".to_string()
    }

    fn write_text(&self, text: &str) -> Result<(), ExportError> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(osc52_sequence(text).as_bytes())?;
        stdout.flush()?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct FileClipboard {
    path: PathBuf,
}

impl FileClipboard {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ClipboardSink for FileClipboard {
    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }

    fn write_text(&self, text: &str) -> Result<(), ExportError> {
        std::fs::write(&self.path, text)?;
        Ok(())
    }
}

/// Hands `text` to `sink` on the blocking pool and waits up to
/// `EXPORT_TIMEOUT` for it.
///
/// A timeout does not cancel the write: a sink that is merely slow can still
/// finish after `ExportError::Timeout` has been returned, so the text may
/// reach the clipboard even though the copy was reported as failed.
pub async fn export(sink: Arc<dyn ClipboardSink>, text: String) -> Result<(), ExportError> {
    let sink_name = sink.describe();
    let bytes = text.len();
    let write = tokio::task::spawn_blocking(move || sink.write_text(&text));

    let result = match timeout(EXPORT_TIMEOUT, write).await {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(join)) => Err(ExportError::Worker(join.to_string())),
        Err(_) => Err(ExportError::Timeout(EXPORT_TIMEOUT)),
    };

    match &result {
        Ok(()) => info!(sink = %sink_name, bytes, "summary copied"),
        Err(e) => warn!(sink = %sink_name, error = %e, "summary copy failed"),
    }
    result
}

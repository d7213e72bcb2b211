//! Error types for the fallible edges of the tool

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("clipboard write failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("clipboard write timed out after {0:?}")]
    Timeout(Duration),

    #[error("clipboard worker stopped: {0}")]
    Worker(String),
}

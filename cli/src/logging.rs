//! Tracing setup.
//!
//! The TUI owns the terminal, so while it runs logs only go to a file when
//! one is configured. Print mode logs to stderr.

use anyhow::Result;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "COLLATERAL_LOG";
const DEFAULT_DIRECTIVE: &str = "collateral_cli=info";

pub enum LogTarget<'a> {
    File(&'a Path),
    Stderr,
    Off,
}

pub fn init(target: LogTarget<'_>) -> Result<()> {
    let writer = match target {
        LogTarget::File(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        LogTarget::Stderr => BoxMakeWriter::new(std::io::stderr),
        LogTarget::Off => return Ok(()),
    };

    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))?;
    Ok(())
}

//! Logging setup: stderr plus the optional event log file
//!
//! The event log is appended to only while the `LogGate` is open, which
//! follows the `logEnabled` setting. Failing to open the file drops the event.

use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::writer::{MakeWriter, OptionalWriter};
use tracing_subscriber::prelude::*;

use crate::constants::log::{FILENAME, LEVEL_ENV};

/// Shared on/off switch for the event log file
#[derive(Debug, Clone, Default)]
pub struct LogGate(Arc<AtomicBool>);

impl LogGate {
    pub fn new(enabled: bool) -> Self {
        Self(Arc::new(AtomicBool::new(enabled)))
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.0.store(enabled, Ordering::Relaxed);
    }

    pub fn is_enabled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Writer factory for the append-only event log
#[derive(Debug, Clone)]
pub struct EventLog {
    path: PathBuf,
    gate: LogGate,
}

impl EventLog {
    pub fn new(dir: &Path, gate: LogGate) -> Self {
        Self {
            path: dir.join(FILENAME),
            gate,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<'a> MakeWriter<'a> for EventLog {
    type Writer = OptionalWriter<File>;

    fn make_writer(&'a self) -> Self::Writer {
        if !self.gate.is_enabled() {
            return OptionalWriter::none();
        }
        match OpenOptions::new().create(true).append(true).open(&self.path) {
            Ok(file) => OptionalWriter::some(file),
            Err(_) => OptionalWriter::none(),
        }
    }
}

/// Level for the stderr layer from LOG_LEVEL (default info)
fn stderr_level() -> LevelFilter {
    match std::env::var(LEVEL_ENV)
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => LevelFilter::INFO,
    }
}

/// Install the global subscriber. The returned gate controls the event log file.
pub fn init(log_dir: &Path, enabled: bool) -> Result<LogGate> {
    let gate = LogGate::new(enabled);

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(stderr_level());
    let event_log = EventLog::new(log_dir, gate.clone());
    let log_path = event_log.path().to_path_buf();
    let file_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(event_log)
        .with_filter(LevelFilter::INFO);

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    debug!(path = %log_path.display(), enabled, "Event log configured");
    Ok(gate)
}

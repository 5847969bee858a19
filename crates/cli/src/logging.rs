// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Log subscriber setup
//!
//! Events go to stderr, filtered by `RUST_LOG` (default `info`). With
//! `--log-file` they are also appended to that file through a non-blocking
//! writer; the returned [`LogGuard`] flushes it on drop or on [`LogGuard::flush`].

use anyhow::{anyhow, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Shared handle on the file writer's guard.
///
/// Paths that leave through `std::process::exit` skip destructors, so they
/// call `flush` first.
#[derive(Clone, Default)]
pub struct LogGuard(Arc<Mutex<Option<WorkerGuard>>>);

impl LogGuard {
    fn new(guard: WorkerGuard) -> Self {
        Self(Arc::new(Mutex::new(Some(guard))))
    }

    /// Write out pending file events and close the file writer
    pub fn flush(&self) {
        drop(self.0.lock().unwrap_or_else(|e| e.into_inner()).take());
    }
}

pub fn setup(log_file: Option<&Path>) -> Result<LogGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stderr = fmt::layer().with_writer(std::io::stderr).with_target(false);

    let Some(path) = log_file else {
        tracing_subscriber::registry()
            .with(filter)
            .with(stderr)
            .try_init()?;
        return Ok(LogGuard::default());
    };

    let (dir, name) = split_log_path(path)?;
    std::fs::create_dir_all(&dir)?;
    let appender = tracing_appender::rolling::never(dir, name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr)
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .try_init()?;
    Ok(LogGuard::new(guard))
}

/// Directory and file name of a log path; a bare name lives in `.`
fn split_log_path(path: &Path) -> Result<(PathBuf, OsString)> {
    let name = path
        .file_name()
        .ok_or_else(|| anyhow!("log file path has no file name: {}", path.display()))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((dir, name.to_os_string()))
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod apply;
pub mod destroy;
pub mod plan;
pub mod validate;

use crate::error::{LabError, EXIT_INTERRUPTED};
use crate::logging::LogGuard;
use std::sync::{Arc, Mutex};

/// On Ctrl-C, report the stage that was running and exit.
///
/// Child stack tools receive the same signal. The stage is reported as
/// undefined rather than waited on. The log file is flushed before exit.
pub fn exit_on_interrupt(in_flight: Arc<Mutex<String>>, log: LogGuard) -> anyhow::Result<()> {
    ctrlc::set_handler(move || {
        let stage = in_flight
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        tracing::error!(stage = %stage, "interrupted");
        eprint!("{}", LabError::interrupted(&stage));
        log.flush();
        std::process::exit(EXIT_INTERRUPTED);
    })?;
    Ok(())
}

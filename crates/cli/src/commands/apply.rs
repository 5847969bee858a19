// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `adlab apply`: precheck, every phase in dependency order, then validate

use crate::error::LabError;
use crate::lab::Lab;
use crate::logging::LogGuard;
use crate::output::{self, ApplySummary, OutputFormat};

pub async fn handle(lab: &Lab, format: OutputFormat, log: &LogGuard) -> anyhow::Result<()> {
    let controller = lab.controller();
    super::exit_on_interrupt(controller.in_flight(), log.clone())?;

    let outcome = controller.apply().await;
    output::print(
        &ApplySummary::new(&controller.context().run_id, &outcome),
        format,
    );

    match &outcome.abort {
        None => Ok(()),
        Some(abort) => Err(LabError::apply_aborted(abort, &lab.runbook.precheck).into()),
    }
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `adlab destroy`: tear the lab down, last phase first

use crate::error::LabError;
use crate::lab::Lab;
use crate::logging::LogGuard;
use crate::output::{self, OutputFormat, TeardownSummary};

pub async fn handle(lab: &Lab, format: OutputFormat, log: &LogGuard) -> anyhow::Result<()> {
    let controller = lab.controller();
    super::exit_on_interrupt(controller.in_flight(), log.clone())?;

    let outcome = controller.teardown().await;
    output::print(
        &TeardownSummary::new(&controller.context().run_id, &outcome),
        format,
    );

    match &outcome.abort {
        None => Ok(()),
        Some(abort) => Err(LabError::teardown_aborted(abort).into()),
    }
}

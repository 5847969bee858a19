// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `adlab plan`: show both pipelines without running anything

use crate::error::LabError;
use crate::lab::Lab;
use crate::output::{self, OutputFormat};
use adlab_engine::Plan;

pub fn handle(lab: &Lab, format: OutputFormat) -> anyhow::Result<()> {
    let plan = Plan::new(&lab.runbook.phases).map_err(LabError::plan_invalid)?;
    output::print(&plan, format);
    Ok(())
}

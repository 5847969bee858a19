// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `adlab validate`: read-only endpoint report

use crate::lab::Lab;
use crate::output::{self, OutputFormat};

/// Missing endpoints are part of the report, never a failure
pub async fn handle(lab: &Lab, format: OutputFormat) -> anyhow::Result<()> {
    let report = lab.controller().validate().await;
    output::print(&report, format);
    Ok(())
}

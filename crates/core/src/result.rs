// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Phase results

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    Success,
    Failure,
}

/// Outcome of one phase invocation. Never modified after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseResult {
    pub phase: String,
    pub outcome: Outcome,
    /// Named values the phase produced (e.g. `image_id`)
    pub outputs: BTreeMap<String, String>,
    /// Failure cause, for failed phases
    pub error: Option<String>,
    pub finished_at: DateTime<Utc>,
    pub elapsed_ms: u64,
}

impl PhaseResult {
    pub fn success(
        phase: impl Into<String>,
        outputs: BTreeMap<String, String>,
        elapsed: Duration,
    ) -> Self {
        Self {
            phase: phase.into(),
            outcome: Outcome::Success,
            outputs,
            error: None,
            finished_at: Utc::now(),
            elapsed_ms: elapsed.as_millis() as u64,
        }
    }

    pub fn failure(phase: impl Into<String>, error: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            phase: phase.into(),
            outcome: Outcome::Failure,
            outputs: BTreeMap::new(),
            error: Some(error.into()),
            finished_at: Utc::now(),
            elapsed_ms: elapsed.as_millis() as u64,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.outcome == Outcome::Success
    }

    pub fn output(&self, name: &str) -> Option<&str> {
        self.outputs.get(name).map(String::as_str)
    }
}

/// The recorded successful result for `phase`, if any
pub fn success_of<'a>(results: &'a [PhaseResult], phase: &str) -> Option<&'a PhaseResult> {
    results
        .iter()
        .rev()
        .find(|r| r.phase == phase && r.succeeded())
}

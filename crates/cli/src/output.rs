// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output formatting for CLI commands

use adlab_core::{IrreversibleResource, PhaseResult, Report};
use adlab_engine::{ApplyOutcome, FailureMode, TeardownOutcome};
use clap::ValueEnum;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Print output in the specified format
pub fn print<T: Serialize + fmt::Display>(value: &T, format: OutputFormat) {
    match format {
        OutputFormat::Text => {
            let text = value.to_string();
            if text.ends_with('\n') {
                print!("{}", text);
            } else {
                println!("{}", text);
            }
        }
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(value) {
                println!("{}", json);
            }
        }
    }
}

/// Where an apply run ended up
#[derive(Debug, Serialize)]
pub struct ApplySummary {
    pub run_id: String,
    pub state: String,
    pub stages: Vec<String>,
    pub phases: Vec<PhaseResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<Report>,
}

#[derive(Debug, Serialize)]
pub struct FailureSummary {
    pub stage: String,
    pub error: String,
    #[serde(flatten)]
    pub mode: FailureMode,
}

impl ApplySummary {
    pub fn new(run_id: &str, outcome: &ApplyOutcome) -> Self {
        Self {
            run_id: run_id.to_string(),
            state: outcome.state().to_string(),
            stages: outcome.trail.iter().map(|s| s.to_string()).collect(),
            phases: outcome.results.clone(),
            failure: outcome.abort.as_ref().map(|a| FailureSummary {
                stage: a.at.to_string(),
                error: a.failure.to_string(),
                mode: a.mode.clone(),
            }),
            report: outcome.report.clone(),
        }
    }
}

impl fmt::Display for ApplySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "apply {}: {}", self.run_id, self.state)?;

        let width = self.phases.iter().map(|p| p.phase.len()).max().unwrap_or(0);
        for result in &self.phases {
            let status = if result.succeeded() { "ok" } else { "failed" };
            writeln!(
                f,
                "  {:<width$}  {:<6}  {:.1}s",
                result.phase,
                status,
                result.elapsed_ms as f64 / 1000.0,
                width = width
            )?;
        }

        if let Some(report) = &self.report {
            writeln!(f)?;
            write!(f, "{}", report)?;
        }
        Ok(())
    }
}

/// Where a teardown run ended up
#[derive(Debug, Serialize)]
pub struct TeardownSummary {
    pub run_id: String,
    pub state: String,
    pub stages: Vec<String>,
    pub purged: Vec<IrreversibleResource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<TeardownFailureSummary>,
}

#[derive(Debug, Serialize)]
pub struct TeardownFailureSummary {
    pub stage: String,
    pub error: String,
}

impl TeardownSummary {
    pub fn new(run_id: &str, outcome: &TeardownOutcome) -> Self {
        Self {
            run_id: run_id.to_string(),
            state: outcome.state().to_string(),
            stages: outcome.trail.iter().map(|s| s.to_string()).collect(),
            purged: outcome.purged.clone(),
            failure: outcome.abort.as_ref().map(|a| TeardownFailureSummary {
                stage: a.at.to_string(),
                error: a.failure.to_string(),
            }),
        }
    }
}

impl fmt::Display for TeardownSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "destroy {}: {}", self.run_id, self.state)?;
        writeln!(f, "  stages: {}", self.stages.join(" -> "))?;

        if self.purged.is_empty() {
            writeln!(f, "  purged: nothing")?;
        } else {
            writeln!(f, "  purged:")?;
            for resource in &self.purged {
                writeln!(f, "    {} {} ({})", resource.kind, resource.id, resource.rule)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;

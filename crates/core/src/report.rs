// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Validation report
//!
//! One row per expected endpoint: either the address it was found at or an
//! explicit "not found" marker. A missing endpoint is a gap to report, never
//! an error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Marker printed for endpoints that could not be located
pub const NOT_FOUND: &str = "not found";

/// An endpoint the lab is expected to expose, identified by tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub label: String,
    #[serde(default = "default_tag")]
    pub tag: String,
    pub value: String,
}

fn default_tag() -> String {
    "Name".to_string()
}

impl Endpoint {
    pub fn new(label: impl Into<String>, tag: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            tag: tag.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EndpointStatus {
    Found { address: String },
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub endpoint: Endpoint,
    #[serde(flatten)]
    pub status: EndpointStatus,
}

impl ReportRow {
    pub fn address(&self) -> Option<&str> {
        match &self.status {
            EndpointStatus::Found { address } => Some(address),
            EndpointStatus::NotFound => None,
        }
    }
}

/// An expected endpoint that was not found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationGap<'a> {
    pub label: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub rows: Vec<ReportRow>,
    pub generated_at: DateTime<Utc>,
}

impl Report {
    pub fn new(rows: Vec<ReportRow>) -> Self {
        Self {
            rows,
            generated_at: Utc::now(),
        }
    }

    pub fn found(&self) -> usize {
        self.rows.iter().filter(|r| r.address().is_some()).count()
    }

    pub fn gaps(&self) -> Vec<ValidationGap<'_>> {
        self.rows
            .iter()
            .filter(|r| r.address().is_none())
            .map(|r| ValidationGap {
                label: &r.endpoint.label,
            })
            .collect()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .rows
            .iter()
            .map(|r| r.endpoint.label.len() + 1)
            .max()
            .unwrap_or(0);

        for row in &self.rows {
            let label = format!("{}:", row.endpoint.label);
            writeln!(
                f,
                "{:<width$}  {}",
                label,
                row.address().unwrap_or(NOT_FOUND),
                width = width
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;

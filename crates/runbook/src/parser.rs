// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runbook TOML parsing

use crate::template::interpolate;
use crate::PhaseDef;
use adlab_core::{Endpoint, InputBinding, LabVars, Phase};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during runbook parsing
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid format: {0}")]
    InvalidFormat(String),
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
}

/// The `[precheck]` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrecheckDef {
    /// Command-line tools that must be on PATH
    #[serde(default)]
    pub tools: Vec<String>,
    /// Environment variables that must be set and non-empty
    #[serde(default)]
    pub env: Vec<String>,
    /// Whether the cloud credentials must resolve to a caller identity
    #[serde(default = "default_true")]
    pub credentials: bool,
}

impl Default for PrecheckDef {
    fn default() -> Self {
        Self {
            tools: Vec::new(),
            env: Vec::new(),
            credentials: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// The `[cloud]` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CloudDef {
    /// Cloud provider CLI used for lookups and purges
    #[serde(default = "default_cli")]
    pub cli: String,
    /// Named credential profile, if not the default
    #[serde(default)]
    pub profile: Option<String>,
}

impl Default for CloudDef {
    fn default() -> Self {
        Self {
            cli: default_cli(),
            profile: None,
        }
    }
}

fn default_cli() -> String {
    "aws".to_string()
}

/// A parsed runbook
#[derive(Debug, Clone, Default)]
pub struct Runbook {
    pub lab: LabVars,
    pub precheck: PrecheckDef,
    pub cloud: CloudDef,
    /// Phases in declaration order
    pub phases: Vec<Phase>,
    pub endpoints: Vec<Endpoint>,
}

impl Runbook {
    /// Get a phase definition by name
    pub fn get_phase(&self, name: &str) -> Option<&Phase> {
        self.phases.iter().find(|p| p.name == name)
    }

    /// Replace lab variables, leaving the rest untouched
    pub fn with_lab(self, lab: LabVars) -> Self {
        Self { lab, ..self }
    }

    /// Expand `{lab_var}` and `${ENV:-default}` placeholders in stack
    /// directories, purge rules, tag values and endpoint values.
    pub fn interpolated(mut self) -> Self {
        let vars = self.lab.as_vars();
        let expand = |s: &mut String| *s = interpolate(s, &vars);

        for phase in &mut self.phases {
            let dir = interpolate(&phase.action.dir.to_string_lossy(), &vars);
            phase.action.dir = dir.into();
            if let Some(prefix) = phase.purge_images.as_mut() {
                expand(prefix);
            }
            phase.purge_secrets.iter_mut().for_each(expand);
            for binding in phase.inputs.values_mut() {
                if let InputBinding::Tagged { value, .. } = binding {
                    expand(value);
                }
            }
        }
        for endpoint in &mut self.endpoints {
            expand(&mut endpoint.value);
        }
        self
    }
}

/// Parse a runbook from TOML content
pub fn parse_runbook(content: &str) -> Result<Runbook, ParseError> {
    let raw: toml::Value = toml::from_str(content)?;
    let table = raw
        .as_table()
        .ok_or_else(|| ParseError::InvalidFormat("root must be a table".to_string()))?;

    let mut runbook = Runbook::default();

    if let Some(lab) = table.get("lab") {
        runbook.lab = lab
            .clone()
            .try_into()
            .map_err(|e| ParseError::InvalidFormat(format!("lab: {}", e)))?;
    }

    if let Some(precheck) = table.get("precheck") {
        runbook.precheck = precheck
            .clone()
            .try_into()
            .map_err(|e| ParseError::InvalidFormat(format!("precheck: {}", e)))?;
    }

    if let Some(cloud) = table.get("cloud") {
        runbook.cloud = cloud
            .clone()
            .try_into()
            .map_err(|e| ParseError::InvalidFormat(format!("cloud: {}", e)))?;
    }

    // Parse phases, keeping declaration order
    if let Some(phases) = table.get("phase") {
        let phases = phases
            .as_table()
            .ok_or_else(|| ParseError::InvalidFormat("phase must be a table".to_string()))?;
        for (name, value) in phases {
            runbook.phases.push(parse_phase(name, value)?);
        }
    }

    if let Some(validate) = table.get("validate") {
        runbook.endpoints = parse_endpoints(validate)?;
    }

    Ok(runbook)
}

/// Read and parse a runbook file
pub fn load_runbook(path: &Path) -> Result<Runbook, ParseError> {
    let content = std::fs::read_to_string(path).map_err(|source| ParseError::Read {
        path: path.display().to_string(),
        source,
    })?;
    parse_runbook(&content)
}

fn parse_phase(name: &str, value: &toml::Value) -> Result<Phase, ParseError> {
    let def: PhaseDef = value
        .clone()
        .try_into()
        .map_err(|e| ParseError::InvalidFormat(format!("phase.{}: {}", name, e)))?;
    Ok(def.into_phase(name))
}

fn parse_endpoints(value: &toml::Value) -> Result<Vec<Endpoint>, ParseError> {
    let table = value
        .as_table()
        .ok_or_else(|| ParseError::InvalidFormat("validate must be a table".to_string()))?;

    let Some(endpoints) = table.get("endpoint") else {
        return Ok(Vec::new());
    };
    let endpoints = endpoints.as_array().ok_or_else(|| {
        ParseError::InvalidFormat("validate.endpoint must be an array of tables".to_string())
    })?;

    endpoints
        .iter()
        .enumerate()
        .map(|(i, v)| {
            v.clone()
                .try_into()
                .map_err(|e| ParseError::InvalidFormat(format!("validate.endpoint[{}]: {}", i, e)))
        })
        .collect()
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;

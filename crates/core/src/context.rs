// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-run pipeline context
//!
//! Everything a phase needs to know about the run it belongs to is carried
//! here explicitly: the stack root directory and the lab variables. Nothing
//! is read from the process working directory or exported shell state.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Lab-wide configuration inputs handed to every provisioning phase
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabVars {
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub dns_zone: String,
    #[serde(default)]
    pub netbios: String,
    #[serde(default)]
    pub user_base_dn: String,
    #[serde(default)]
    pub realm: String,
}

impl LabVars {
    /// Field names paired with their values, in a stable order
    pub fn entries(&self) -> [(&'static str, &str); 5] {
        [
            ("region", &self.region),
            ("dns_zone", &self.dns_zone),
            ("netbios", &self.netbios),
            ("user_base_dn", &self.user_base_dn),
            ("realm", &self.realm),
        ]
    }

    /// The lab variables as stack variables
    pub fn as_vars(&self) -> BTreeMap<String, String> {
        self.entries()
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    /// Name of the first variable that is empty, if any
    pub fn first_missing(&self) -> Option<&'static str> {
        self.entries()
            .into_iter()
            .find(|(_, v)| v.trim().is_empty())
            .map(|(k, _)| k)
    }

    /// Apply a lookup (typically the process environment) over the current values.
    ///
    /// `lookup` receives the variable name and returns an override if one exists.
    pub fn overlay(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let fields: [(&str, &mut String); 5] = [
            ("region", &mut self.region),
            ("dns_zone", &mut self.dns_zone),
            ("netbios", &mut self.netbios),
            ("user_base_dn", &mut self.user_base_dn),
            ("realm", &mut self.realm),
        ];
        for (name, slot) in fields {
            if let Some(value) = lookup(name).filter(|v| !v.is_empty()) {
                *slot = value;
            }
        }
        self
    }
}

/// Context threaded through every phase call of a single run
#[derive(Debug, Clone)]
pub struct PipelineContext {
    pub run_id: String,
    pub root: PathBuf,
    pub lab: LabVars,
}

impl PipelineContext {
    pub fn new(root: impl Into<PathBuf>, lab: LabVars) -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            root: root.into(),
            lab,
        }
    }

    /// Resolve a stack directory against the run's root
    pub fn stack_path(&self, dir: &Path) -> PathBuf {
        if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            self.root.join(dir)
        }
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;

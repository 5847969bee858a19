// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Values threaded from upstream phases into a downstream phase

use crate::phase::Phase;
use crate::resource::ResourceKind;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors deriving a phase input from upstream results
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    #[error("no {kind} tagged {tag}={value}")]
    Missing {
        kind: ResourceKind,
        tag: String,
        value: String,
    },
    #[error("{} {kind}s tagged {tag}={value}: {}", .candidates.len(), .candidates.join(", "))]
    Ambiguous {
        kind: ResourceKind,
        tag: String,
        value: String,
        candidates: Vec<String>,
    },
    #[error("phase {from} produced no output named {output}")]
    MissingOutput { from: String, output: String },
    #[error("phase {target} needs {upstream}, which has not succeeded")]
    UpstreamNotSucceeded { target: String, upstream: String },
    #[error("{kind} lookup failed: {cause}")]
    Lookup { kind: ResourceKind, cause: String },
}

/// One input value for a phase and the upstream phase it was derived from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedInput {
    pub target: String,
    pub name: String,
    pub value: String,
    pub source: String,
}

/// Every input a phase declares, resolved
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedInputs {
    inputs: BTreeMap<String, ResolvedInput>,
}

impl ResolvedInputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, input: ResolvedInput) {
        self.inputs.insert(input.name.clone(), input);
    }

    pub fn get(&self, name: &str) -> Option<&ResolvedInput> {
        self.inputs.get(name)
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResolvedInput> {
        self.inputs.values()
    }

    /// Input values keyed by name, as stack variables
    pub fn as_vars(&self) -> BTreeMap<String, String> {
        self.inputs
            .iter()
            .map(|(k, v)| (k.clone(), v.value.clone()))
            .collect()
    }

    /// First input `phase` declares that is not present here
    pub fn first_unsatisfied<'a>(&self, phase: &'a Phase) -> Option<&'a str> {
        phase
            .inputs
            .keys()
            .find(|name| !self.inputs.contains_key(name.as_str()))
            .map(String::as_str)
    }
}

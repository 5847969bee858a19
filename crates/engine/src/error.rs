// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the lab pipelines

use adlab_adapters::{CloudError, ProvisionError};
use adlab_core::{IrreversibleKind, ResolutionError};
use thiserror::Error;

/// A prerequisite the pipeline cannot start without
#[derive(Debug, Error)]
pub enum PrecheckError {
    #[error("missing prerequisite: {missing}")]
    Missing { missing: String },
    #[error("cloud credentials did not resolve to an identity: {cause}")]
    Credentials { cause: String },
}

/// A phase's provisioning action did not complete
#[derive(Debug, Error)]
pub enum PhaseError {
    #[error("phase {phase} failed: {source}")]
    Tool {
        phase: String,
        #[source]
        source: ProvisionError,
    },
    #[error("phase {phase} was handed no value for input {input}")]
    MissingInput { phase: String, input: String },
}

impl PhaseError {
    /// Name of the phase that failed
    pub fn phase(&self) -> &str {
        match self {
            PhaseError::Tool { phase, .. } | PhaseError::MissingInput { phase, .. } => phase,
        }
    }
}

/// The runbook's phase graph cannot be walked
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("phase {phase} requires unknown phase {upstream}")]
    UnknownRequires { phase: String, upstream: String },
    #[error("input {input} of phase {phase} reads from unknown phase {from}")]
    UnknownSource {
        phase: String,
        input: String,
        from: String,
    },
    #[error("input {input} of phase {phase} reads from {from}, which is not upstream of it")]
    SourceNotUpstream {
        phase: String,
        input: String,
        from: String,
    },
    #[error("phase dependencies form a cycle through: {}", .phases.join(", "))]
    Cycle { phases: Vec<String> },
}

/// Why an apply run stopped
#[derive(Debug, Error)]
pub enum ApplyFailure {
    #[error(transparent)]
    Plan(#[from] PlanError),
    #[error(transparent)]
    Precheck(#[from] PrecheckError),
    #[error("inputs for phase {phase} could not be resolved: {source}")]
    Resolution {
        phase: String,
        #[source]
        source: ResolutionError,
    },
    #[error(transparent)]
    Phase(#[from] PhaseError),
}

impl ApplyFailure {
    /// The phase the failure is attributed to, if it happened inside one
    pub fn phase(&self) -> Option<&str> {
        match self {
            ApplyFailure::Resolution { phase, .. } => Some(phase),
            ApplyFailure::Phase(e) => Some(e.phase()),
            ApplyFailure::Plan(_) | ApplyFailure::Precheck(_) => None,
        }
    }
}

/// Why a teardown run stopped
#[derive(Debug, Error)]
pub enum TeardownFailure {
    #[error(transparent)]
    Plan(#[from] PlanError),
    #[error("destroying {phase} failed: {source}")]
    Destroy {
        phase: String,
        #[source]
        source: ProvisionError,
    },
    #[error("listing images named {prefix}* failed: {source}")]
    ListImages {
        prefix: String,
        #[source]
        source: CloudError,
    },
    #[error("deleting {kind} {id} failed: {source}")]
    Purge {
        kind: IrreversibleKind,
        id: String,
        #[source]
        source: CloudError,
    },
}

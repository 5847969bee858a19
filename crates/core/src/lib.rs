// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! adlab-core: domain types for the lab deployment orchestrator
//!
//! This crate provides:
//! - Phase definitions and the input bindings between phases
//! - Phase results and resolved inputs
//! - Tagged cloud resources and the typed tag lookup
//! - Apply and teardown stage labels
//! - The validation report

pub mod context;
pub mod phase;
pub mod report;
pub mod resolution;
pub mod resource;
pub mod result;
pub mod stage;

pub use context::{LabVars, PipelineContext};
pub use phase::{InputBinding, Phase, Stack, StackTool, TeardownStep};
pub use report::{Endpoint, EndpointStatus, Report, ReportRow, ValidationGap};
pub use resolution::{ResolutionError, ResolvedInput, ResolvedInputs};
pub use resource::{
    find_by_tag, IrreversibleKind, IrreversibleResource, MachineImage, ResourceKind,
    TaggedResource,
};
pub use result::{Outcome, PhaseResult};
pub use stage::{ApplyStage, TeardownStage};

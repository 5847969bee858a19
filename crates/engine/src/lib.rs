// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Lab pipeline engine: precheck, phase execution, dependency resolution,
//! apply/teardown sequencing and validation

mod controller;
mod error;
mod executor;
mod plan;
mod prechecker;
mod resolver;
mod validator;

pub use controller::{
    Aborted, ApplyOutcome, Controller, ControllerDeps, FailureMode, TeardownAbort,
    TeardownOutcome,
};
pub use error::{ApplyFailure, PhaseError, PlanError, PrecheckError, TeardownFailure};
pub use executor::PhaseExecutor;
pub use plan::{apply_order, teardown_steps, Plan};
pub use prechecker::Prechecker;
pub use resolver::Resolver;
pub use validator::Validator;

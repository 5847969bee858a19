// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Lab runbook parsing and definition

mod defaults;
mod parser;
mod phase;
mod template;

pub use defaults::{default_runbook, DEFAULT_RUNBOOK};
pub use parser::{load_runbook, parse_runbook, CloudDef, ParseError, PrecheckDef, Runbook};
pub use phase::PhaseDef;
pub use template::interpolate;

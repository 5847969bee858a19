// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stack provisioning adapters

mod shell;

pub use shell::{parse_packer_artifact, parse_terraform_outputs, ShellProvisioner};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeProvisioner, ProvisionCall};

use adlab_core::{Stack, StackTool};
use async_trait::async_trait;
use std::collections::BTreeMap;
use thiserror::Error;

/// Variables handed to a stack tool
pub type StackVars = BTreeMap<String, String>;

/// Errors from stack tool invocations
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("{tool} could not be started: {message}")]
    Spawn { tool: StackTool, message: String },
    #[error("{tool} {step} exited with {}: {stderr}", exit_label(.status))]
    CommandFailed {
        tool: StackTool,
        step: String,
        status: Option<i32>,
        stderr: String,
    },
    #[error("{tool} output could not be read: {message}")]
    Output { tool: StackTool, message: String },
    #[error("{tool} cannot {op} a stack")]
    Unsupported { tool: StackTool, op: &'static str },
}

fn exit_label(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("status {}", code),
        None => "signal".to_string(),
    }
}

/// Adapter that materializes and destroys stacks.
///
/// `apply` is long-running and not safe to re-invoke blindly; callers that
/// retry must first establish whether the stack already exists.
#[async_trait]
pub trait ProvisionAdapter: Clone + Send + Sync + 'static {
    /// Create or update the stack, returning the outputs it reports
    async fn apply(
        &self,
        stack: &Stack,
        vars: &StackVars,
    ) -> Result<BTreeMap<String, String>, ProvisionError>;

    /// Destroy everything the stack created
    async fn destroy(&self, stack: &Stack, vars: &StackVars) -> Result<(), ProvisionError>;
}

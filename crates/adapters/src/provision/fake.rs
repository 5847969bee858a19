// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake provisioner for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{ProvisionAdapter, ProvisionError, StackVars};
use adlab_core::Stack;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Recorded provisioner call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionCall {
    Apply { dir: PathBuf, vars: StackVars },
    Destroy { dir: PathBuf },
}

impl ProvisionCall {
    pub fn dir(&self) -> &Path {
        match self {
            ProvisionCall::Apply { dir, .. } | ProvisionCall::Destroy { dir } => dir,
        }
    }
}

#[derive(Default)]
struct FakeState {
    calls: Vec<ProvisionCall>,
    /// Outputs keyed by stack directory suffix
    outputs: Vec<(PathBuf, BTreeMap<String, String>)>,
    failing_apply: Vec<PathBuf>,
    failing_destroy: Vec<PathBuf>,
}

/// Fake provisioner for testing.
///
/// Stacks are matched by directory suffix, so `"02-packer"` matches
/// `/lab/02-packer`.
#[derive(Clone, Default)]
pub struct FakeProvisioner {
    state: Arc<Mutex<FakeState>>,
}

impl FakeProvisioner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<ProvisionCall> {
        self.lock().calls.clone()
    }

    /// Directories applied so far, in order
    pub fn applied(&self) -> Vec<PathBuf> {
        self.lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                ProvisionCall::Apply { dir, .. } => Some(dir.clone()),
                ProvisionCall::Destroy { .. } => None,
            })
            .collect()
    }

    /// Outputs reported when the stack at `dir` is applied
    pub fn set_outputs(&self, dir: impl Into<PathBuf>, outputs: &[(&str, &str)]) {
        let outputs = outputs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.lock().outputs.push((dir.into(), outputs));
    }

    /// Make `apply` fail for the stack at `dir`
    pub fn fail_apply(&self, dir: impl Into<PathBuf>) {
        self.lock().failing_apply.push(dir.into());
    }

    /// Make `destroy` fail for the stack at `dir`
    pub fn fail_destroy(&self, dir: impl Into<PathBuf>) {
        self.lock().failing_destroy.push(dir.into());
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn injected_failure(stack: &Stack, step: &str) -> ProvisionError {
    ProvisionError::CommandFailed {
        tool: stack.tool,
        step: step.to_string(),
        status: Some(1),
        stderr: format!("injected failure in {}", stack.dir.display()),
    }
}

#[async_trait]
impl ProvisionAdapter for FakeProvisioner {
    async fn apply(
        &self,
        stack: &Stack,
        vars: &StackVars,
    ) -> Result<BTreeMap<String, String>, ProvisionError> {
        let mut state = self.lock();
        state.calls.push(ProvisionCall::Apply {
            dir: stack.dir.clone(),
            vars: vars.clone(),
        });

        if state.failing_apply.iter().any(|d| stack.dir.ends_with(d)) {
            return Err(injected_failure(stack, "apply"));
        }

        Ok(state
            .outputs
            .iter()
            .filter(|(d, _)| stack.dir.ends_with(d))
            .flat_map(|(_, o)| o.clone())
            .collect())
    }

    async fn destroy(&self, stack: &Stack, _vars: &StackVars) -> Result<(), ProvisionError> {
        let mut state = self.lock();
        state.calls.push(ProvisionCall::Destroy {
            dir: stack.dir.clone(),
        });

        if state.failing_destroy.iter().any(|d| stack.dir.ends_with(d)) {
            return Err(injected_failure(stack, "destroy"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;

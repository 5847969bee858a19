// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake host for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::HostAdapter;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct FakeState {
    tools: BTreeSet<String>,
    env: BTreeMap<String, String>,
}

/// Host with a fixed set of tools and environment variables
#[derive(Clone, Default)]
pub struct FakeHost {
    state: Arc<Mutex<FakeState>>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Host that has every listed tool installed
    pub fn with_tools(tools: &[&str]) -> Self {
        let host = Self::new();
        for tool in tools {
            host.install(tool);
        }
        host
    }

    pub fn install(&self, tool: &str) {
        self.lock().tools.insert(tool.to_string());
    }

    pub fn uninstall(&self, tool: &str) {
        self.lock().tools.remove(tool);
    }

    pub fn set_env(&self, name: &str, value: &str) {
        self.lock().env.insert(name.to_string(), value.to_string());
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl HostAdapter for FakeHost {
    fn has_tool(&self, tool: &str) -> bool {
        self.lock().tools.contains(tool)
    }

    fn env_var(&self, name: &str) -> Option<String> {
        self.lock().env.get(name).cloned()
    }
}

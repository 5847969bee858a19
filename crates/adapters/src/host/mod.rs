// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Local host inspection: executables on PATH and environment variables

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeHost;

use std::ffi::OsString;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

/// Adapter for questions about the machine the orchestrator runs on
pub trait HostAdapter: Clone + Send + Sync + 'static {
    /// Whether `tool` resolves to an executable file
    fn has_tool(&self, tool: &str) -> bool;

    /// Value of an environment variable, if set
    fn env_var(&self, name: &str) -> Option<String>;
}

/// The real host, backed by the process environment
#[derive(Clone, Debug, Default)]
pub struct SystemHost {
    path: Option<OsString>,
}

impl SystemHost {
    pub fn new() -> Self {
        Self {
            path: std::env::var_os("PATH"),
        }
    }

    /// Search `path` instead of the process PATH
    pub fn with_path(path: impl Into<OsString>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }
}

fn is_executable(path: &Path) -> bool {
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

impl HostAdapter for SystemHost {
    fn has_tool(&self, tool: &str) -> bool {
        if tool.contains('/') {
            return is_executable(Path::new(tool));
        }
        let Some(path) = &self.path else {
            return false;
        };
        std::env::split_paths(path).any(|dir| is_executable(&dir.join(tool)))
    }

    fn env_var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

#[cfg(test)]
#[path = "host_tests.rs"]
mod tests;

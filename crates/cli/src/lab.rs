// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runbook loading and controller factory for CLI commands

use crate::error::LabError;
use adlab_adapters::{
    AwsCliAdapter, ShellProvisioner, SystemHost, TracedCloudAdapter, TracedProvisioner,
};
use adlab_core::PipelineContext;
use adlab_engine::{Controller, ControllerDeps};
use adlab_runbook::{default_runbook, load_runbook, Runbook};
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Runbook looked up in the working directory when `--runbook` is absent
pub const RUNBOOK_FILE: &str = "adlab.toml";

/// Prefix of the environment variables overriding `[lab]` values
pub const ENV_PREFIX: &str = "ADLAB_";

pub type LabController = Controller<
    TracedProvisioner<ShellProvisioner>,
    TracedCloudAdapter<AwsCliAdapter>,
    SystemHost,
>;

/// A runbook ready to run, and the directory its stacks live under
#[derive(Debug)]
pub struct Lab {
    pub runbook: Runbook,
    pub root: PathBuf,
}

impl Lab {
    /// Load the runbook named on the command line, `./adlab.toml`, or the
    /// built-in lab, in that order, then apply environment overrides.
    pub fn load(runbook: Option<&Path>, root: Option<&Path>) -> Result<Self> {
        let local = Path::new(RUNBOOK_FILE);
        let (parsed, base) = match runbook {
            Some(path) => (read(path)?, parent_dir(path)),
            None if local.is_file() => (read(local)?, PathBuf::from(".")),
            None => {
                tracing::debug!("no {} found, using the built-in lab runbook", RUNBOOK_FILE);
                (default_runbook()?, PathBuf::from("."))
            }
        };

        Ok(Self {
            runbook: with_env_overrides(parsed, |name| std::env::var(name).ok()),
            root: root.map(Path::to_path_buf).unwrap_or(base),
        })
    }

    pub fn controller(&self) -> LabController {
        let deps = ControllerDeps {
            provisioner: TracedProvisioner::new(ShellProvisioner::new()),
            cloud: TracedCloudAdapter::new(
                AwsCliAdapter::new(&self.runbook.cloud.cli, &self.runbook.lab.region)
                    .with_profile(self.runbook.cloud.profile.clone()),
            ),
            host: SystemHost::new(),
        };
        let ctx = PipelineContext::new(&self.root, self.runbook.lab.clone());
        Controller::new(deps, self.runbook.clone(), ctx)
    }
}

fn read(path: &Path) -> Result<Runbook> {
    load_runbook(path).map_err(|e| LabError::runbook_invalid(path, e).into())
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Overlay `ADLAB_<VAR>` values onto `[lab]` and expand placeholders.
///
/// `lookup` receives the full environment variable name.
pub fn with_env_overrides(runbook: Runbook, lookup: impl Fn(&str) -> Option<String>) -> Runbook {
    let lab = runbook
        .lab
        .clone()
        .overlay(|name| lookup(&format!("{}{}", ENV_PREFIX, name.to_uppercase())));
    runbook.with_lab(lab).interpolated()
}

#[cfg(test)]
#[path = "lab_tests.rs"]
mod tests;

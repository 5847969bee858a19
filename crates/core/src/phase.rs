// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Phase definitions
//!
//! A phase is one independently re-runnable provisioning stack together with
//! the upstream phases it depends on, the inputs it draws from them, and the
//! teardown steps that undo it.

use crate::resource::ResourceKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// External tool that materializes a stack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StackTool {
    Terraform,
    Packer,
}

impl StackTool {
    pub fn name(&self) -> &'static str {
        match self {
            StackTool::Terraform => "terraform",
            StackTool::Packer => "packer",
        }
    }

    /// Whether the tool can destroy what it created.
    ///
    /// Image builds leave artifacts that only a purge removes.
    pub fn can_destroy(&self) -> bool {
        matches!(self, StackTool::Terraform)
    }
}

impl std::fmt::Display for StackTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The execution action of a phase: a tool run against a stack directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stack {
    pub tool: StackTool,
    pub dir: PathBuf,
}

impl Stack {
    pub fn new(tool: StackTool, dir: impl Into<PathBuf>) -> Self {
        Self {
            tool,
            dir: dir.into(),
        }
    }
}

/// Where a phase input comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputBinding {
    /// Exactly one cloud resource of `kind` whose tag `tag` equals `value`
    Tagged {
        from: String,
        kind: ResourceKind,
        tag: String,
        value: String,
    },
    /// A named output of the upstream phase, passed through unchanged
    Output { from: String, output: String },
}

impl InputBinding {
    /// Name of the upstream phase this binding reads from
    pub fn source(&self) -> &str {
        match self {
            InputBinding::Tagged { from, .. } | InputBinding::Output { from, .. } => from,
        }
    }
}

/// One step of undoing a phase during teardown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TeardownStep {
    /// Deregister every machine image whose name starts with the prefix
    PurgeImages { name_prefix: String },
    /// Delete the snapshots backing the images purged by the preceding step
    PurgeSnapshots,
    /// Force-delete the named secrets without a recovery window
    PurgeSecrets { names: Vec<String> },
    /// Run the stack tool's destroy
    Destroy { label: String },
}

/// A phase of the apply pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    pub name: String,
    pub requires: Vec<String>,
    pub action: Stack,
    pub inputs: BTreeMap<String, InputBinding>,
    pub purge_images: Option<String>,
    pub purge_secrets: Vec<String>,
    pub teardown_label: Option<String>,
}

impl Phase {
    pub fn new(name: impl Into<String>, action: Stack) -> Self {
        Self {
            name: name.into(),
            requires: Vec::new(),
            action,
            inputs: BTreeMap::new(),
            purge_images: None,
            purge_secrets: Vec::new(),
            teardown_label: None,
        }
    }

    pub fn requires(mut self, upstream: impl Into<String>) -> Self {
        self.requires.push(upstream.into());
        self
    }

    pub fn input(mut self, name: impl Into<String>, binding: InputBinding) -> Self {
        self.inputs.insert(name.into(), binding);
        self
    }

    pub fn with_image_purge(mut self, name_prefix: impl Into<String>) -> Self {
        self.purge_images = Some(name_prefix.into());
        self
    }

    pub fn with_secret_purge(mut self, names: Vec<String>) -> Self {
        self.purge_secrets = names;
        self
    }

    pub fn with_teardown_label(mut self, label: impl Into<String>) -> Self {
        self.teardown_label = Some(label.into());
        self
    }

    /// Label of this phase's destroy stage
    pub fn destroy_label(&self) -> String {
        self.teardown_label
            .clone()
            .unwrap_or_else(|| format!("{}:destroy", self.name))
    }

    /// The rollback action, in its fixed order: images, their snapshots,
    /// secrets, then the stack destroy.
    pub fn rollback(&self) -> Vec<TeardownStep> {
        let mut steps = Vec::new();
        if let Some(prefix) = &self.purge_images {
            steps.push(TeardownStep::PurgeImages {
                name_prefix: prefix.clone(),
            });
            steps.push(TeardownStep::PurgeSnapshots);
        }
        if !self.purge_secrets.is_empty() {
            steps.push(TeardownStep::PurgeSecrets {
                names: self.purge_secrets.clone(),
            });
        }
        if self.action.tool.can_destroy() {
            steps.push(TeardownStep::Destroy {
                label: self.destroy_label(),
            });
        }
        steps
    }
}

#[cfg(test)]
#[path = "phase_tests.rs"]
mod tests;

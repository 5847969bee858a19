// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Phase definitions as written in the runbook

use adlab_core::{InputBinding, Phase, Stack, StackTool};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// A `[phase.<name>]` table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PhaseDef {
    /// Tool that materializes the stack
    pub tool: StackTool,
    /// Stack directory, relative to the lab root
    pub dir: PathBuf,
    /// Upstream phases that must succeed first
    #[serde(default)]
    pub requires: Vec<String>,
    /// Stack variables drawn from upstream phases
    #[serde(default)]
    pub inputs: BTreeMap<String, InputBinding>,
    /// Label of the destroy stage during teardown
    #[serde(default)]
    pub teardown: Option<String>,
    /// Name prefix of machine images this phase leaves behind
    #[serde(default)]
    pub purge_images: Option<String>,
    /// Secrets to force-delete when this phase is torn down
    #[serde(default)]
    pub purge_secrets: Vec<String>,
}

impl PhaseDef {
    pub fn into_phase(self, name: &str) -> Phase {
        Phase {
            name: name.to_string(),
            requires: self.requires,
            action: Stack::new(self.tool, self.dir),
            inputs: self.inputs,
            purge_images: self.purge_images,
            purge_secrets: self.purge_secrets,
            teardown_label: self.teardown,
        }
    }
}

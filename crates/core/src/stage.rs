// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline stages
//!
//! Apply: `Init -> Precheck -> <phases in dependency order> -> Validate -> Done`.
//! Teardown: `Init -> <rollback steps in reverse dependency order> -> Done`.
//! Both reach `Aborted` from any stage on failure.

use crate::phase::TeardownStep;
use serde::Serialize;

/// A stage of the apply pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ApplyStage {
    Init,
    Precheck,
    Phase(String),
    Validate,
    Done,
    Aborted,
}

impl ApplyStage {
    pub fn name(&self) -> &str {
        match self {
            ApplyStage::Init => "Init",
            ApplyStage::Precheck => "Precheck",
            ApplyStage::Phase(name) => name,
            ApplyStage::Validate => "Validate",
            ApplyStage::Done => "Done",
            ApplyStage::Aborted => "Aborted",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ApplyStage::Done | ApplyStage::Aborted)
    }
}

impl std::fmt::Display for ApplyStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A stage of the teardown pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TeardownStage {
    Init,
    /// Stack destroy of a phase, under its teardown label (e.g. `ServersDown`)
    Destroy(String),
    PurgeImages,
    PurgeSnapshots,
    PurgeSecrets,
    Done,
    Aborted,
}

impl TeardownStage {
    pub fn name(&self) -> &str {
        match self {
            TeardownStage::Init => "Init",
            TeardownStage::Destroy(label) => label,
            TeardownStage::PurgeImages => "PurgeImages",
            TeardownStage::PurgeSnapshots => "PurgeSnapshots",
            TeardownStage::PurgeSecrets => "PurgeSecrets",
            TeardownStage::Done => "Done",
            TeardownStage::Aborted => "Aborted",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TeardownStage::Done | TeardownStage::Aborted)
    }
}

impl From<&TeardownStep> for TeardownStage {
    fn from(step: &TeardownStep) -> Self {
        match step {
            TeardownStep::PurgeImages { .. } => TeardownStage::PurgeImages,
            TeardownStep::PurgeSnapshots => TeardownStage::PurgeSnapshots,
            TeardownStep::PurgeSecrets { .. } => TeardownStage::PurgeSecrets,
            TeardownStep::Destroy { label } => TeardownStage::Destroy(label.clone()),
        }
    }
}

impl std::fmt::Display for TeardownStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

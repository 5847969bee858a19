// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cloud resources as seen through tag and name lookups

use crate::resolution::ResolutionError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Kinds of resource that can be discovered by tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    #[serde(alias = "vpc")]
    Network,
    Subnet,
    Instance,
}

impl ResourceKind {
    pub fn name(&self) -> &'static str {
        match self {
            ResourceKind::Network => "network",
            ResourceKind::Subnet => "subnet",
            ResourceKind::Instance => "instance",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A resource returned by a tag lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedResource {
    pub kind: ResourceKind,
    pub id: String,
    pub tags: BTreeMap<String, String>,
    /// Reachable address, for instances
    pub address: Option<String>,
}

impl TaggedResource {
    pub fn new(kind: ResourceKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
            tags: BTreeMap::new(),
            address: None,
        }
    }

    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn has_tag(&self, key: &str, value: &str) -> bool {
        self.tags.get(key).is_some_and(|v| v == value)
    }
}

/// A machine image together with the snapshots backing it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineImage {
    pub id: String,
    pub name: String,
    pub snapshot_ids: Vec<String>,
}

/// Kinds of resource that teardown deletes without any way back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IrreversibleKind {
    MachineImage,
    StorageSnapshot,
    Secret,
}

impl std::fmt::Display for IrreversibleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IrreversibleKind::MachineImage => f.write_str("image"),
            IrreversibleKind::StorageSnapshot => f.write_str("snapshot"),
            IrreversibleKind::Secret => f.write_str("secret"),
        }
    }
}

/// A resource scheduled for unrecoverable deletion, with the rule that matched it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IrreversibleResource {
    pub kind: IrreversibleKind,
    pub id: String,
    pub rule: String,
}

impl IrreversibleResource {
    pub fn new(kind: IrreversibleKind, id: impl Into<String>, rule: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
            rule: rule.into(),
        }
    }
}

/// Pick the single resource of `kind` tagged `key=value` out of `candidates`.
///
/// Zero matches is [`ResolutionError::Missing`], more than one is
/// [`ResolutionError::Ambiguous`].
pub fn find_by_tag(
    candidates: &[TaggedResource],
    kind: ResourceKind,
    key: &str,
    value: &str,
) -> Result<String, ResolutionError> {
    let matches: Vec<&TaggedResource> = candidates
        .iter()
        .filter(|r| r.kind == kind && r.has_tag(key, value))
        .collect();

    match matches.as_slice() {
        [only] => Ok(only.id.clone()),
        [] => Err(ResolutionError::Missing {
            kind,
            tag: key.to_string(),
            value: value.to_string(),
        }),
        many => Err(ResolutionError::Ambiguous {
            kind,
            tag: key.to_string(),
            value: value.to_string(),
            candidates: many.iter().map(|r| r.id.clone()).collect(),
        }),
    }
}

#[cfg(test)]
#[path = "resource_tests.rs"]
mod tests;

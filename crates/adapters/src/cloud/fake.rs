// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory cloud for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{CloudAdapter, CloudError};
use adlab_core::{MachineImage, ResourceKind, TaggedResource};
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

/// Recorded cloud call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloudCall {
    CallerIdentity,
    FindTagged {
        kind: ResourceKind,
        key: String,
        value: String,
    },
    ListImages(String),
    DeregisterImage(String),
    DeleteSnapshot(String),
    DeleteSecret(String),
}

/// Injectable failure points
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloudFailure {
    Lookup(ResourceKind),
    ListImages,
    DeregisterImage(String),
    DeleteSnapshot(String),
    DeleteSecret(String),
}

#[derive(Default)]
struct FakeState {
    calls: Vec<CloudCall>,
    identity: Option<String>,
    resources: Vec<TaggedResource>,
    images: Vec<MachineImage>,
    snapshots: BTreeSet<String>,
    secrets: BTreeSet<String>,
    failures: Vec<CloudFailure>,
}

/// Fake cloud adapter holding resources in memory.
///
/// Deletions mutate the held state, so a second teardown sees what the
/// first one left behind.
#[derive(Clone)]
pub struct FakeCloudAdapter {
    state: Arc<Mutex<FakeState>>,
}

impl Default for FakeCloudAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeCloudAdapter {
    pub fn new() -> Self {
        let state = FakeState {
            identity: Some("arn:aws:iam::000000000000:user/fake".to_string()),
            ..FakeState::default()
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<CloudCall> {
        self.lock().calls.clone()
    }

    /// `None` makes the credentials check fail
    pub fn set_identity(&self, identity: Option<&str>) {
        self.lock().identity = identity.map(str::to_string);
    }

    pub fn add_resource(&self, resource: TaggedResource) {
        self.lock().resources.push(resource);
    }

    /// Register an image along with its backing snapshots
    pub fn add_image(&self, id: &str, name: &str, snapshot_ids: &[&str]) {
        let mut state = self.lock();
        state
            .snapshots
            .extend(snapshot_ids.iter().map(|s| s.to_string()));
        state.images.push(MachineImage {
            id: id.to_string(),
            name: name.to_string(),
            snapshot_ids: snapshot_ids.iter().map(|s| s.to_string()).collect(),
        });
    }

    /// A snapshot not owned by any image
    pub fn add_snapshot(&self, id: &str) {
        self.lock().snapshots.insert(id.to_string());
    }

    pub fn add_secret(&self, name: &str) {
        self.lock().secrets.insert(name.to_string());
    }

    pub fn fail(&self, failure: CloudFailure) {
        self.lock().failures.push(failure);
    }

    pub fn images(&self) -> Vec<MachineImage> {
        self.lock().images.clone()
    }

    pub fn snapshots(&self) -> Vec<String> {
        self.lock().snapshots.iter().cloned().collect()
    }

    pub fn secrets(&self) -> Vec<String> {
        self.lock().secrets.iter().cloned().collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn injected(command: &str, target: &str) -> CloudError {
    CloudError::CommandFailed {
        command: command.to_string(),
        stderr: format!("injected failure for {}", target),
    }
}

#[async_trait]
impl CloudAdapter for FakeCloudAdapter {
    async fn caller_identity(&self) -> Result<String, CloudError> {
        let mut state = self.lock();
        state.calls.push(CloudCall::CallerIdentity);
        state
            .identity
            .clone()
            .ok_or_else(|| CloudError::Credentials("Unable to locate credentials".to_string()))
    }

    async fn find_tagged(
        &self,
        kind: ResourceKind,
        key: &str,
        value: &str,
    ) -> Result<Vec<TaggedResource>, CloudError> {
        let mut state = self.lock();
        state.calls.push(CloudCall::FindTagged {
            kind,
            key: key.to_string(),
            value: value.to_string(),
        });
        if state.failures.contains(&CloudFailure::Lookup(kind)) {
            return Err(injected("ec2 describe", kind.name()));
        }
        Ok(state
            .resources
            .iter()
            .filter(|r| r.kind == kind && r.has_tag(key, value))
            .cloned()
            .collect())
    }

    async fn list_images(&self, name_prefix: &str) -> Result<Vec<MachineImage>, CloudError> {
        let mut state = self.lock();
        state.calls.push(CloudCall::ListImages(name_prefix.to_string()));
        if state.failures.contains(&CloudFailure::ListImages) {
            return Err(injected("ec2 describe-images", name_prefix));
        }
        Ok(state
            .images
            .iter()
            .filter(|i| i.name.starts_with(name_prefix))
            .cloned()
            .collect())
    }

    async fn deregister_image(&self, image_id: &str) -> Result<(), CloudError> {
        let mut state = self.lock();
        state.calls.push(CloudCall::DeregisterImage(image_id.to_string()));
        if state
            .failures
            .contains(&CloudFailure::DeregisterImage(image_id.to_string()))
        {
            return Err(injected("ec2 deregister-image", image_id));
        }
        let before = state.images.len();
        state.images.retain(|i| i.id != image_id);
        if state.images.len() == before {
            return Err(CloudError::NotFound(image_id.to_string()));
        }
        Ok(())
    }

    async fn delete_snapshot(&self, snapshot_id: &str) -> Result<(), CloudError> {
        let mut state = self.lock();
        state.calls.push(CloudCall::DeleteSnapshot(snapshot_id.to_string()));
        if state
            .failures
            .contains(&CloudFailure::DeleteSnapshot(snapshot_id.to_string()))
        {
            return Err(injected("ec2 delete-snapshot", snapshot_id));
        }
        if let Some(image) = state
            .images
            .iter()
            .find(|i| i.snapshot_ids.iter().any(|s| s == snapshot_id))
        {
            return Err(CloudError::CommandFailed {
                command: "ec2 delete-snapshot".to_string(),
                stderr: format!("snapshot {} is in use by {}", snapshot_id, image.id),
            });
        }
        if !state.snapshots.remove(snapshot_id) {
            return Err(CloudError::NotFound(snapshot_id.to_string()));
        }
        Ok(())
    }

    async fn delete_secret(&self, name: &str) -> Result<(), CloudError> {
        let mut state = self.lock();
        state.calls.push(CloudCall::DeleteSecret(name.to_string()));
        if state
            .failures
            .contains(&CloudFailure::DeleteSecret(name.to_string()))
        {
            return Err(injected("secretsmanager delete-secret", name));
        }
        if !state.secrets.remove(name) {
            return Err(CloudError::NotFound(name.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cloud provider adapters
//!
//! The cloud provider is the system of record: phase outputs that cannot be
//! handed over in memory are found again by tag or name.

mod aws;

pub use aws::AwsCliAdapter;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{CloudCall, CloudFailure, FakeCloudAdapter};

use adlab_core::{MachineImage, ResourceKind, TaggedResource};
use async_trait::async_trait;
use thiserror::Error;

/// Errors from cloud provider calls
#[derive(Debug, Error)]
pub enum CloudError {
    #[error("{cli} could not be started: {message}")]
    Spawn { cli: String, message: String },
    #[error("{command} failed: {stderr}")]
    CommandFailed { command: String, stderr: String },
    #[error("{0} not found")]
    NotFound(String),
    #[error("unexpected response from {command}: {message}")]
    Parse { command: String, message: String },
    #[error("credentials rejected: {0}")]
    Credentials(String),
}

/// Adapter for cloud provider lookups and irreversible deletions
#[async_trait]
pub trait CloudAdapter: Clone + Send + Sync + 'static {
    /// Identity the current credentials resolve to
    async fn caller_identity(&self) -> Result<String, CloudError>;

    /// Resources of `kind` whose tag `key` equals `value`.
    ///
    /// Instance lookups only return running instances.
    async fn find_tagged(
        &self,
        kind: ResourceKind,
        key: &str,
        value: &str,
    ) -> Result<Vec<TaggedResource>, CloudError>;

    /// Self-owned machine images whose name starts with `name_prefix`
    async fn list_images(&self, name_prefix: &str) -> Result<Vec<MachineImage>, CloudError>;

    async fn deregister_image(&self, image_id: &str) -> Result<(), CloudError>;

    async fn delete_snapshot(&self, snapshot_id: &str) -> Result<(), CloudError>;

    /// Delete a secret immediately, with no recovery window
    async fn delete_secret(&self, name: &str) -> Result<(), CloudError>;
}

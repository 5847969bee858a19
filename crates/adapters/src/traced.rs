// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability
//!
//! Spans are attached with [`Instrument`] so they stay correct across awaits.

use crate::cloud::{CloudAdapter, CloudError};
use crate::provision::{ProvisionAdapter, ProvisionError, StackVars};
use adlab_core::{MachineImage, ResourceKind, Stack, TaggedResource};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tracing::Instrument;

/// Wrapper that adds tracing to any ProvisionAdapter
#[derive(Clone)]
pub struct TracedProvisioner<P> {
    inner: P,
}

impl<P> TracedProvisioner<P> {
    pub fn new(inner: P) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<P: ProvisionAdapter> ProvisionAdapter for TracedProvisioner<P> {
    async fn apply(
        &self,
        stack: &Stack,
        vars: &StackVars,
    ) -> Result<BTreeMap<String, String>, ProvisionError> {
        let span =
            tracing::info_span!("stack.apply", tool = %stack.tool, dir = %stack.dir.display());

        async move {
            tracing::info!(var_count = vars.len(), "starting");

            // Precondition: the stack directory must exist
            if !stack.dir.is_dir() {
                tracing::error!("stack directory does not exist");
                return Err(ProvisionError::Spawn {
                    tool: stack.tool,
                    message: format!("stack directory does not exist: {}", stack.dir.display()),
                });
            }

            let start = std::time::Instant::now();
            let result = self.inner.apply(stack, vars).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(outputs) => tracing::info!(
                    outputs = outputs.len(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "stack applied"
                ),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "apply failed"
                ),
            }

            result
        }
        .instrument(span)
        .await
    }

    async fn destroy(&self, stack: &Stack, vars: &StackVars) -> Result<(), ProvisionError> {
        let span =
            tracing::info_span!("stack.destroy", tool = %stack.tool, dir = %stack.dir.display());

        async move {
            tracing::info!("starting");

            let start = std::time::Instant::now();
            let result = self.inner.destroy(stack, vars).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(()) => {
                    tracing::info!(elapsed_ms = elapsed.as_millis() as u64, "stack destroyed")
                }
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "destroy failed"
                ),
            }

            result
        }
        .instrument(span)
        .await
    }
}

/// Wrapper that adds tracing to any CloudAdapter
#[derive(Clone)]
pub struct TracedCloudAdapter<C> {
    inner: C,
}

impl<C> TracedCloudAdapter<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<C: CloudAdapter> CloudAdapter for TracedCloudAdapter<C> {
    async fn caller_identity(&self) -> Result<String, CloudError> {
        let result = self.inner.caller_identity().await;
        match &result {
            Ok(identity) => tracing::debug!(identity, "credentials accepted"),
            Err(e) => tracing::error!(error = %e, "credentials check failed"),
        }
        result
    }

    async fn find_tagged(
        &self,
        kind: ResourceKind,
        key: &str,
        value: &str,
    ) -> Result<Vec<TaggedResource>, CloudError> {
        let span = tracing::info_span!("cloud.find_tagged", kind = %kind, key, value);

        async move {
            let start = std::time::Instant::now();
            let result = self.inner.find_tagged(kind, key, value).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(found) => tracing::debug!(
                    count = found.len(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "lookup finished"
                ),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "lookup failed"
                ),
            }

            result
        }
        .instrument(span)
        .await
    }

    async fn list_images(&self, name_prefix: &str) -> Result<Vec<MachineImage>, CloudError> {
        let result = self.inner.list_images(name_prefix).await;
        tracing::debug!(
            name_prefix,
            count = result.as_ref().map(|v| v.len()).ok(),
            "listed images"
        );
        result
    }

    async fn deregister_image(&self, image_id: &str) -> Result<(), CloudError> {
        let span = tracing::info_span!("cloud.deregister_image", image_id);
        let result = self.inner.deregister_image(image_id).instrument(span.clone()).await;
        span.in_scope(|| log_deletion(&result, "image deregistered"));
        result
    }

    async fn delete_snapshot(&self, snapshot_id: &str) -> Result<(), CloudError> {
        let span = tracing::info_span!("cloud.delete_snapshot", snapshot_id);
        let result = self.inner.delete_snapshot(snapshot_id).instrument(span.clone()).await;
        span.in_scope(|| log_deletion(&result, "snapshot deleted"));
        result
    }

    async fn delete_secret(&self, name: &str) -> Result<(), CloudError> {
        let span = tracing::info_span!("cloud.delete_secret", name);
        let result = self.inner.delete_secret(name).instrument(span.clone()).await;
        span.in_scope(|| log_deletion(&result, "secret deleted"));
        result
    }
}

fn log_deletion(result: &Result<(), CloudError>, done: &str) {
    match result {
        Ok(()) => tracing::info!("{}", done),
        // Already gone is acceptable on a repeated teardown
        Err(CloudError::NotFound(_)) => tracing::warn!("already absent"),
        Err(e) => tracing::error!(error = %e, "deletion failed"),
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Advisory post-flight validation

use adlab_adapters::CloudAdapter;
use adlab_core::{Endpoint, EndpointStatus, Report, ReportRow, ResourceKind};

/// Locates the lab's expected endpoints among running instances
#[derive(Clone)]
pub struct Validator<C> {
    cloud: C,
    endpoints: Vec<Endpoint>,
}

impl<C: CloudAdapter> Validator<C> {
    pub fn new(cloud: C, endpoints: Vec<Endpoint>) -> Self {
        Self { cloud, endpoints }
    }

    /// Build the report. Lookup failures become "not found" rows; this
    /// never fails.
    pub async fn validate(&self) -> Report {
        let mut rows = Vec::with_capacity(self.endpoints.len());
        for endpoint in &self.endpoints {
            let status = self.locate(endpoint).await;
            rows.push(ReportRow {
                endpoint: endpoint.clone(),
                status,
            });
        }

        let report = Report::new(rows);
        let gaps = report.gaps();
        for gap in &gaps {
            tracing::warn!(endpoint = gap.label, "endpoint not found");
        }
        tracing::info!(found = report.found(), missing = gaps.len(), "validation finished");
        report
    }

    async fn locate(&self, endpoint: &Endpoint) -> EndpointStatus {
        let instances = match self
            .cloud
            .find_tagged(ResourceKind::Instance, &endpoint.tag, &endpoint.value)
            .await
        {
            Ok(instances) => instances,
            Err(e) => {
                tracing::warn!(endpoint = %endpoint.label, error = %e, "lookup failed");
                return EndpointStatus::NotFound;
            }
        };

        if instances.len() > 1 {
            tracing::warn!(
                endpoint = %endpoint.label,
                count = instances.len(),
                "several running instances match, reporting the first"
            );
        }

        match instances.into_iter().find_map(|i| i.address) {
            Some(address) => EndpointStatus::Found { address },
            None => EndpointStatus::NotFound,
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;

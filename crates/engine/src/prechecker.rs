// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pre-flight checks run before any phase

use crate::error::PrecheckError;
use adlab_adapters::{CloudAdapter, HostAdapter};
use adlab_core::PipelineContext;
use adlab_runbook::PrecheckDef;

/// Verifies local tooling, environment, lab variables and credentials.
///
/// Reads only. Checks run in that order and stop at the first failure.
pub struct Prechecker<H, C> {
    host: H,
    cloud: C,
    def: PrecheckDef,
}

impl<H: HostAdapter, C: CloudAdapter> Prechecker<H, C> {
    pub fn new(host: H, cloud: C, def: PrecheckDef) -> Self {
        Self { host, cloud, def }
    }

    pub async fn check(&self, ctx: &PipelineContext) -> Result<(), PrecheckError> {
        if let Some(tool) = self.def.tools.iter().find(|t| !self.host.has_tool(t)) {
            return Err(PrecheckError::Missing {
                missing: tool.clone(),
            });
        }

        let unset = self.def.env.iter().find(|name| {
            self.host
                .env_var(name)
                .filter(|value| !value.trim().is_empty())
                .is_none()
        });
        if let Some(name) = unset {
            return Err(PrecheckError::Missing {
                missing: name.clone(),
            });
        }

        if let Some(var) = ctx.lab.first_missing() {
            return Err(PrecheckError::Missing {
                missing: var.to_string(),
            });
        }

        if self.def.credentials {
            let identity = self
                .cloud
                .caller_identity()
                .await
                .map_err(|e| PrecheckError::Credentials {
                    cause: e.to_string(),
                })?;
            tracing::info!(identity, "credentials resolved");
        }

        tracing::info!(tools = self.def.tools.len(), env = self.def.env.len(), "precheck passed");
        Ok(())
    }
}

#[cfg(test)]
#[path = "prechecker_tests.rs"]
mod tests;

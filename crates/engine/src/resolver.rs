// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dependency resolver
//!
//! Tagged bindings are looked up in the cloud provider, which stays the
//! system of record between runs. Output bindings pass an upstream phase's
//! reported output through unchanged.

use adlab_adapters::CloudAdapter;
use adlab_core::result::success_of;
use adlab_core::{
    find_by_tag, InputBinding, Phase, PhaseResult, ResolutionError, ResolvedInput, ResolvedInputs,
};

/// Derives a phase's inputs from the results of earlier phases
#[derive(Clone)]
pub struct Resolver<C> {
    cloud: C,
}

impl<C: CloudAdapter> Resolver<C> {
    pub fn new(cloud: C) -> Self {
        Self { cloud }
    }

    /// Resolve every input `target` declares.
    ///
    /// Fails on the first binding whose source has not succeeded or whose
    /// value cannot be found unambiguously.
    pub async fn resolve(
        &self,
        target: &Phase,
        from_results: &[PhaseResult],
    ) -> Result<ResolvedInputs, ResolutionError> {
        let mut resolved = ResolvedInputs::new();

        for (name, binding) in &target.inputs {
            let source = binding.source();
            let Some(upstream) = success_of(from_results, source) else {
                return Err(ResolutionError::UpstreamNotSucceeded {
                    target: target.name.clone(),
                    upstream: source.to_string(),
                });
            };

            let value = match binding {
                InputBinding::Tagged {
                    kind, tag, value, ..
                } => {
                    let candidates = self
                        .cloud
                        .find_tagged(*kind, tag, value)
                        .await
                        .map_err(|e| ResolutionError::Lookup {
                            kind: *kind,
                            cause: e.to_string(),
                        })?;
                    find_by_tag(&candidates, *kind, tag, value)?
                }
                InputBinding::Output { from, output } => upstream
                    .output(output)
                    .map(str::to_string)
                    .ok_or_else(|| ResolutionError::MissingOutput {
                        from: from.clone(),
                        output: output.clone(),
                    })?,
            };

            tracing::debug!(phase = %target.name, input = %name, %value, "resolved");
            resolved.insert(ResolvedInput {
                target: target.name.clone(),
                name: name.clone(),
                value,
                source: source.to_string(),
            });
        }

        Ok(resolved)
    }
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Phase executor

use crate::error::PhaseError;
use adlab_adapters::{ProvisionAdapter, ProvisionError, StackVars};
use adlab_core::{Phase, PhaseResult, PipelineContext, ResolvedInputs, Stack};
use tracing::Instrument;

/// Runs a phase's provisioning action through a [`ProvisionAdapter`]
#[derive(Clone)]
pub struct PhaseExecutor<P> {
    provisioner: P,
}

impl<P: ProvisionAdapter> PhaseExecutor<P> {
    pub fn new(provisioner: P) -> Self {
        Self { provisioner }
    }

    /// Apply the phase's stack with lab variables and resolved inputs.
    ///
    /// Performs no cleanup on failure.
    pub async fn execute(
        &self,
        phase: &Phase,
        ctx: &PipelineContext,
        inputs: ResolvedInputs,
    ) -> Result<PhaseResult, PhaseError> {
        if let Some(input) = inputs.first_unsatisfied(phase) {
            return Err(PhaseError::MissingInput {
                phase: phase.name.clone(),
                input: input.to_string(),
            });
        }

        let span = tracing::info_span!("phase", phase = %phase.name, run_id = %ctx.run_id);
        async {
            let stack = self.stack(phase, ctx);
            let mut vars = ctx.lab.as_vars();
            vars.extend(inputs.as_vars());

            for input in inputs.iter() {
                tracing::info!(input = %input.name, value = %input.value, from = %input.source, "input resolved");
            }

            let start = std::time::Instant::now();
            let outputs = self
                .provisioner
                .apply(&stack, &vars)
                .await
                .map_err(|source| PhaseError::Tool {
                    phase: phase.name.clone(),
                    source,
                })?;

            Ok(PhaseResult::success(&phase.name, outputs, start.elapsed()))
        }
        .instrument(span)
        .await
    }

    /// Run the stack tool's destroy for `phase`, with lab variables only
    pub async fn destroy(&self, phase: &Phase, ctx: &PipelineContext) -> Result<(), ProvisionError> {
        let vars: StackVars = ctx.lab.as_vars();
        self.provisioner.destroy(&self.stack(phase, ctx), &vars).await
    }

    fn stack(&self, phase: &Phase, ctx: &PipelineContext) -> Stack {
        Stack::new(phase.action.tool, ctx.stack_path(&phase.action.dir))
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;

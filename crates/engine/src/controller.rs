// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline controller
//!
//! Apply: `Init -> Precheck -> <phases> -> Validate -> Done`, advancing only on
//! success. Teardown: `Init -> <rollback steps, last phase first> -> Done`.
//! Either pipeline halts at the first failure in `Aborted`, without rollback.

use crate::error::{ApplyFailure, TeardownFailure};
use crate::executor::PhaseExecutor;
use crate::plan::{apply_order, teardown_steps};
use crate::prechecker::Prechecker;
use crate::resolver::Resolver;
use crate::validator::Validator;
use adlab_adapters::{CloudAdapter, CloudError, HostAdapter, ProvisionAdapter};
use adlab_core::{
    ApplyStage, IrreversibleKind, IrreversibleResource, PhaseResult, PipelineContext, Report,
    TeardownStage, TeardownStep,
};
use adlab_runbook::Runbook;
use serde::Serialize;
use std::sync::{Arc, Mutex};

/// Adapters the controller drives
pub struct ControllerDeps<P, C, H> {
    pub provisioner: P,
    pub cloud: C,
    pub host: H,
}

/// What an aborted apply left behind
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum FailureMode {
    /// No phase succeeded, nothing is live
    Clean,
    /// These phases succeeded and their resources remain live
    LiveUpstream { live: Vec<String> },
}

#[derive(Debug)]
pub struct Aborted {
    /// Stage that was running when the failure happened
    pub at: ApplyStage,
    pub failure: ApplyFailure,
    pub mode: FailureMode,
}

/// Result of an apply run
#[derive(Debug)]
pub struct ApplyOutcome {
    /// Every stage entered, ending in `Done` or `Aborted`
    pub trail: Vec<ApplyStage>,
    /// One result per attempted phase, including a failed one
    pub results: Vec<PhaseResult>,
    pub report: Option<Report>,
    pub abort: Option<Aborted>,
}

impl ApplyOutcome {
    pub fn is_done(&self) -> bool {
        self.abort.is_none()
    }

    /// Terminal stage
    pub fn state(&self) -> &ApplyStage {
        self.trail.last().unwrap_or(&ApplyStage::Init)
    }

    /// Name of the phase the run failed in, if it failed in one
    pub fn failed_phase(&self) -> Option<&str> {
        self.abort.as_ref().and_then(|a| a.failure.phase())
    }
}

#[derive(Debug)]
pub struct TeardownAbort {
    pub at: TeardownStage,
    pub failure: TeardownFailure,
}

/// Result of a teardown run
#[derive(Debug)]
pub struct TeardownOutcome {
    pub trail: Vec<TeardownStage>,
    /// Irreversible resources deleted by this run
    pub purged: Vec<IrreversibleResource>,
    pub abort: Option<TeardownAbort>,
}

impl TeardownOutcome {
    pub fn is_done(&self) -> bool {
        self.abort.is_none()
    }

    pub fn state(&self) -> &TeardownStage {
        self.trail.last().unwrap_or(&TeardownStage::Init)
    }
}

/// Sequences the apply and teardown pipelines for one runbook
pub struct Controller<P, C, H> {
    runbook: Runbook,
    ctx: PipelineContext,
    executor: PhaseExecutor<P>,
    resolver: Resolver<C>,
    prechecker: Prechecker<H, C>,
    validator: Validator<C>,
    cloud: C,
    in_flight: Arc<Mutex<String>>,
}

impl<P, C, H> Controller<P, C, H>
where
    P: ProvisionAdapter,
    C: CloudAdapter,
    H: HostAdapter,
{
    pub fn new(deps: ControllerDeps<P, C, H>, runbook: Runbook, ctx: PipelineContext) -> Self {
        Self {
            executor: PhaseExecutor::new(deps.provisioner),
            resolver: Resolver::new(deps.cloud.clone()),
            prechecker: Prechecker::new(deps.host, deps.cloud.clone(), runbook.precheck.clone()),
            validator: Validator::new(deps.cloud.clone(), runbook.endpoints.clone()),
            cloud: deps.cloud,
            runbook,
            ctx,
            in_flight: Arc::new(Mutex::new("Init".to_string())),
        }
    }

    /// Name of the stage currently running, shared for interrupt reporting
    pub fn in_flight(&self) -> Arc<Mutex<String>> {
        Arc::clone(&self.in_flight)
    }

    pub fn context(&self) -> &PipelineContext {
        &self.ctx
    }

    fn enter(&self, stage: &str) {
        tracing::info!(stage, run_id = %self.ctx.run_id, "stage started");
        *self.in_flight.lock().unwrap_or_else(|e| e.into_inner()) = stage.to_string();
    }

    /// Run the apply pipeline to `Done` or `Aborted`
    pub async fn apply(&self) -> ApplyOutcome {
        let mut outcome = ApplyOutcome {
            trail: vec![ApplyStage::Init],
            results: Vec::new(),
            report: None,
            abort: None,
        };
        self.enter(ApplyStage::Init.name());

        let order = match apply_order(&self.runbook.phases) {
            Ok(order) => order,
            Err(e) => return self.abort_apply(outcome, e.into()),
        };

        self.advance(&mut outcome, ApplyStage::Precheck);
        if let Err(e) = self.prechecker.check(&self.ctx).await {
            return self.abort_apply(outcome, e.into());
        }

        for phase in order {
            self.advance(&mut outcome, ApplyStage::Phase(phase.name.clone()));

            let inputs = match self.resolver.resolve(phase, &outcome.results).await {
                Ok(inputs) => inputs,
                Err(source) => {
                    let failure = ApplyFailure::Resolution {
                        phase: phase.name.clone(),
                        source,
                    };
                    return self.abort_apply(outcome, failure);
                }
            };

            let start = std::time::Instant::now();
            match self.executor.execute(phase, &self.ctx, inputs).await {
                Ok(result) => {
                    tracing::info!(phase = %phase.name, elapsed_ms = result.elapsed_ms, "phase succeeded");
                    outcome.results.push(result);
                }
                Err(e) => {
                    outcome
                        .results
                        .push(PhaseResult::failure(&phase.name, e.to_string(), start.elapsed()));
                    return self.abort_apply(outcome, e.into());
                }
            }
        }

        self.advance(&mut outcome, ApplyStage::Validate);
        outcome.report = Some(self.validator.validate().await);

        self.advance(&mut outcome, ApplyStage::Done);
        outcome
    }

    fn advance(&self, outcome: &mut ApplyOutcome, stage: ApplyStage) {
        self.enter(stage.name());
        outcome.trail.push(stage);
    }

    fn abort_apply(&self, mut outcome: ApplyOutcome, failure: ApplyFailure) -> ApplyOutcome {
        let at = outcome.state().clone();
        let live: Vec<String> = outcome
            .results
            .iter()
            .filter(|r| r.succeeded())
            .map(|r| r.phase.clone())
            .collect();
        let mode = if live.is_empty() {
            FailureMode::Clean
        } else {
            FailureMode::LiveUpstream { live }
        };

        tracing::error!(stage = %at, error = %failure, ?mode, "apply aborted");
        self.enter(ApplyStage::Aborted.name());
        outcome.trail.push(ApplyStage::Aborted);
        outcome.abort = Some(Aborted { at, failure, mode });
        outcome
    }

    /// Run the teardown pipeline to `Done` or `Aborted`
    pub async fn teardown(&self) -> TeardownOutcome {
        let mut outcome = TeardownOutcome {
            trail: vec![TeardownStage::Init],
            purged: Vec::new(),
            abort: None,
        };
        self.enter(TeardownStage::Init.name());

        let steps = match teardown_steps(&self.runbook.phases) {
            Ok(steps) => steps,
            Err(e) => return abort_teardown(outcome, e.into()),
        };

        // Snapshots backing the images deregistered by the last PurgeImages
        let mut backing: Vec<String> = Vec::new();

        for (phase, step) in steps {
            let stage = TeardownStage::from(&step);
            self.enter(stage.name());
            outcome.trail.push(stage);

            let result = match &step {
                TeardownStep::Destroy { .. } => self
                    .executor
                    .destroy(phase, &self.ctx)
                    .await
                    .map_err(|source| TeardownFailure::Destroy {
                        phase: phase.name.clone(),
                        source,
                    }),
                TeardownStep::PurgeImages { name_prefix } => {
                    self.purge_images(name_prefix, &mut backing, &mut outcome.purged)
                        .await
                }
                TeardownStep::PurgeSnapshots => {
                    self.purge_snapshots(std::mem::take(&mut backing), &mut outcome.purged)
                        .await
                }
                TeardownStep::PurgeSecrets { names } => {
                    self.purge_secrets(names, &mut outcome.purged).await
                }
            };

            if let Err(failure) = result {
                return abort_teardown(outcome, failure);
            }
        }

        self.enter(TeardownStage::Done.name());
        outcome.trail.push(TeardownStage::Done);
        tracing::info!(purged = outcome.purged.len(), "teardown finished");
        outcome
    }

    async fn purge_images(
        &self,
        prefix: &str,
        backing: &mut Vec<String>,
        purged: &mut Vec<IrreversibleResource>,
    ) -> Result<(), TeardownFailure> {
        let images = self
            .cloud
            .list_images(prefix)
            .await
            .map_err(|source| TeardownFailure::ListImages {
                prefix: prefix.to_string(),
                source,
            })?;

        if images.is_empty() {
            tracing::warn!(prefix, "no images match, nothing to purge");
            return Ok(());
        }

        let rule = format!("image name starts with {}", prefix);
        for image in images {
            let deleted = match tolerate_absent(self.cloud.deregister_image(&image.id).await) {
                Ok(deleted) => deleted,
                Err(source) => {
                    // Snapshots of images already deregistered cannot be listed again
                    let orphaned = std::mem::take(backing);
                    if !orphaned.is_empty() {
                        if let Err(e) = self.purge_snapshots(orphaned, purged).await {
                            tracing::error!(error = %e, "deleting snapshots of deregistered images failed");
                        }
                    }
                    return Err(TeardownFailure::Purge {
                        kind: IrreversibleKind::MachineImage,
                        id: image.id.clone(),
                        source,
                    });
                }
            };
            if deleted {
                purged.push(IrreversibleResource::new(
                    IrreversibleKind::MachineImage,
                    &image.id,
                    &rule,
                ));
            }
            backing.extend(image.snapshot_ids);
        }
        Ok(())
    }

    async fn purge_snapshots(
        &self,
        snapshots: Vec<String>,
        purged: &mut Vec<IrreversibleResource>,
    ) -> Result<(), TeardownFailure> {
        if snapshots.is_empty() {
            tracing::warn!("no snapshots back the purged images, nothing to purge");
            return Ok(());
        }

        for id in snapshots {
            let deleted = tolerate_absent(self.cloud.delete_snapshot(&id).await).map_err(
                |source| TeardownFailure::Purge {
                    kind: IrreversibleKind::StorageSnapshot,
                    id: id.clone(),
                    source,
                },
            )?;
            if deleted {
                purged.push(IrreversibleResource::new(
                    IrreversibleKind::StorageSnapshot,
                    id,
                    "backs a purged image",
                ));
            }
        }
        Ok(())
    }

    async fn purge_secrets(
        &self,
        names: &[String],
        purged: &mut Vec<IrreversibleResource>,
    ) -> Result<(), TeardownFailure> {
        for name in names {
            let deleted = tolerate_absent(self.cloud.delete_secret(name).await).map_err(
                |source| TeardownFailure::Purge {
                    kind: IrreversibleKind::Secret,
                    id: name.clone(),
                    source,
                },
            )?;
            if deleted {
                purged.push(IrreversibleResource::new(
                    IrreversibleKind::Secret,
                    name,
                    "listed in runbook, no recovery window",
                ));
            }
        }
        Ok(())
    }

    /// Read-only endpoint report
    pub async fn validate(&self) -> Report {
        self.enter(ApplyStage::Validate.name());
        self.validator.validate().await
    }
}

/// `Ok(false)` when the resource was already gone
fn tolerate_absent(result: Result<(), CloudError>) -> Result<bool, CloudError> {
    match result {
        Ok(()) => Ok(true),
        Err(CloudError::NotFound(_)) => Ok(false),
        Err(e) => Err(e),
    }
}

fn abort_teardown(mut outcome: TeardownOutcome, failure: TeardownFailure) -> TeardownOutcome {
    let at = outcome.state().clone();
    tracing::error!(stage = %at, error = %failure, "teardown aborted");
    outcome.trail.push(TeardownStage::Aborted);
    outcome.abort = Some(TeardownAbort { at, failure });
    outcome
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-facing error display with context and suggestions.
//!
//! A [`LabError`] says what went wrong (message), what state the lab was
//! left in (context) and how to move forward (suggestions). It also carries
//! the process exit code.

use adlab_core::LabVars;
use adlab_engine::{Aborted, ApplyFailure, FailureMode, PlanError, PrecheckError, TeardownAbort};
use adlab_runbook::{ParseError, PrecheckDef};
use std::fmt;
use std::path::Path;

/// Exit code for failures before any phase ran
pub const EXIT_PRECHECK: u8 = 2;

/// Exit code for everything else that stopped a pipeline
pub const EXIT_FAILURE: u8 = 1;

/// Exit code after an interrupt
pub const EXIT_INTERRUPTED: i32 = 130;

#[derive(Debug)]
pub struct LabError {
    /// What went wrong
    pub message: String,
    /// State left behind, and why
    pub context: Vec<String>,
    /// How to move forward
    pub suggestions: Vec<String>,
    pub exit_code: u8,
    /// Original error if any
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl LabError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
            exit_code: EXIT_FAILURE,
            source: None,
        }
    }

    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_exit_code(mut self, code: u8) -> Self {
        self.exit_code = code;
        self
    }

    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for LabError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "error: {}", self.message)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            for ctx in &self.context {
                writeln!(f, "  -> {}", ctx)?;
            }
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            writeln!(f, "suggestions:")?;
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for LabError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Builders for the failures the commands report
impl LabError {
    /// The runbook file could not be read or parsed
    pub fn runbook_invalid(path: &Path, err: ParseError) -> Self {
        LabError::new(format!("cannot load runbook {}", path.display()))
            .with_context(err.to_string())
            .with_suggestion("Run without --runbook to use the built-in lab runbook")
            .with_source(err)
    }

    /// The phase graph cannot be ordered
    pub fn plan_invalid(err: PlanError) -> Self {
        LabError::new("runbook phases cannot be ordered")
            .with_context(err.to_string())
            .with_suggestion("Fix the requires/from references under [phase.*]")
            .with_source(err)
    }

    /// An apply run stopped before `Done`
    pub fn apply_aborted(abort: &Aborted, precheck: &PrecheckDef) -> Self {
        match &abort.failure {
            ApplyFailure::Precheck(err) => Self::precheck_failed(err, precheck),
            ApplyFailure::Plan(err) => Self::plan_invalid(err.clone()),
            failure => {
                let phase = failure.phase().unwrap_or(abort.at.name());
                let err = LabError::new(format!("apply failed in {}", phase))
                    .with_context(failure.to_string());
                match &abort.mode {
                    FailureMode::Clean => err
                        .with_context("no phase completed, nothing is live")
                        .with_suggestion("Fix the cause and re-run `adlab apply`"),
                    FailureMode::LiveUpstream { live } => err
                        .with_context(format!("still live: {}", live.join(", ")))
                        .with_suggestion(
                            "Fix the cause and re-run `adlab apply`; completed phases converge",
                        )
                        .with_suggestion("Or remove the live resources with `adlab destroy`"),
                }
            }
        }
    }

    fn precheck_failed(err: &PrecheckError, def: &PrecheckDef) -> Self {
        let base = LabError::new(format!("precheck failed: {}", err))
            .with_context("no phase ran, nothing was created")
            .with_exit_code(EXIT_PRECHECK);

        match err {
            PrecheckError::Missing { missing } if def.tools.contains(missing) => base
                .with_suggestion(format!("Install `{}` and make sure it is on PATH", missing)),
            PrecheckError::Missing { missing } if def.env.contains(missing) => {
                base.with_suggestion(format!("Export {} with a non-empty value", missing))
            }
            PrecheckError::Missing { missing } if is_lab_var(missing) => base.with_suggestion(
                format!(
                    "Set `{}` under [lab] or export ADLAB_{}",
                    missing,
                    missing.to_uppercase()
                ),
            ),
            PrecheckError::Missing { .. } => base,
            PrecheckError::Credentials { .. } => base
                .with_suggestion("Check the credentials with `aws sts get-caller-identity`")
                .with_suggestion("Select a profile with AWS_PROFILE or `profile` under [cloud]"),
        }
    }

    /// A teardown run stopped before `Done`
    pub fn teardown_aborted(abort: &TeardownAbort) -> Self {
        LabError::new(format!("destroy stopped at {}", abort.at))
            .with_context(abort.failure.to_string())
            .with_context("later teardown stages did not run")
            .with_suggestion(
                "Fix the cause and re-run `adlab destroy`; resources already gone are skipped",
            )
    }

    /// The process was interrupted while `stage` was running
    pub fn interrupted(stage: &str) -> Self {
        LabError::new(format!("interrupted during {}", stage))
            .with_context(format!("the external state of {} is undefined", stage))
            .with_suggestion("Re-run `adlab apply` or `adlab destroy` to converge")
    }
}

fn is_lab_var(name: &str) -> bool {
    LabVars::default().entries().iter().any(|(k, _)| *k == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use adlab_core::ApplyStage;
    use adlab_engine::PhaseError;

    fn def() -> PrecheckDef {
        PrecheckDef {
            tools: vec!["terraform".to_string()],
            env: vec!["AWS_PROFILE".to_string()],
            credentials: true,
        }
    }

    fn missing(what: &str) -> Aborted {
        Aborted {
            at: ApplyStage::Precheck,
            failure: ApplyFailure::Precheck(PrecheckError::Missing {
                missing: what.to_string(),
            }),
            mode: FailureMode::Clean,
        }
    }

    #[test]
    fn test_error_display() {
        let err = LabError::new("Something went wrong")
            .with_context("First context")
            .with_context("Second context")
            .with_suggestion("Try this")
            .with_suggestion("Or this");

        let output = format!("{}", err);
        assert!(output.contains("error: Something went wrong"));
        assert!(output.contains("-> First context"));
        assert!(output.contains("-> Second context"));
        assert!(output.contains("1. Try this"));
        assert!(output.contains("2. Or this"));
    }

    #[test]
    fn test_missing_tool_exits_with_precheck_code() {
        let err = LabError::apply_aborted(&missing("terraform"), &def());
        assert_eq!(err.exit_code, EXIT_PRECHECK);
        let output = err.to_string();
        assert!(output.contains("precheck failed: missing prerequisite: terraform"));
        assert!(output.contains("Install `terraform`"));
    }

    #[test]
    fn test_missing_lab_var_names_its_override() {
        let err = LabError::apply_aborted(&missing("dns_zone"), &def());
        assert!(err.to_string().contains("export ADLAB_DNS_ZONE"));
    }

    #[test]
    fn test_missing_env_var_suggests_export() {
        let err = LabError::apply_aborted(&missing("AWS_PROFILE"), &def());
        assert!(err.to_string().contains("Export AWS_PROFILE"));
    }

    #[test]
    fn test_phase_failure_lists_live_upstream() {
        let abort = Aborted {
            at: ApplyStage::Phase("ImageBuild".to_string()),
            failure: ApplyFailure::Phase(PhaseError::MissingInput {
                phase: "ImageBuild".to_string(),
                input: "vpc_id".to_string(),
            }),
            mode: FailureMode::LiveUpstream {
                live: vec!["DirectoryUp".to_string()],
            },
        };

        let err = LabError::apply_aborted(&abort, &def());
        assert_eq!(err.exit_code, EXIT_FAILURE);
        let output = err.to_string();
        assert!(output.contains("apply failed in ImageBuild"));
        assert!(output.contains("still live: DirectoryUp"));
        assert!(output.contains("adlab destroy"));
    }

    #[test]
    fn test_interrupted_names_the_stage() {
        let output = LabError::interrupted("ServersUp").to_string();
        assert!(output.contains("interrupted during ServersUp"));
        assert!(output.contains("external state of ServersUp is undefined"));
    }
}

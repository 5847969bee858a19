// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Phase dependency graph
//!
//! Apply walks phases in topological order (Kahn's algorithm, declaration
//! order breaking ties). Teardown walks the same order reversed, expanding
//! each phase into its rollback steps.

use crate::error::PlanError;
use adlab_core::{Phase, TeardownStage, TeardownStep};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// Phases in the order apply runs them.
///
/// Rejects unknown `requires` and input sources, inputs whose source is not
/// an upstream of the phase reading them, and cycles.
pub fn apply_order(phases: &[Phase]) -> Result<Vec<&Phase>, PlanError> {
    let index: HashMap<&str, usize> = phases
        .iter()
        .enumerate()
        .map(|(i, p)| (p.name.as_str(), i))
        .collect();

    let mut deps: Vec<BTreeSet<usize>> = Vec::with_capacity(phases.len());
    for phase in phases {
        let mut set = BTreeSet::new();
        for upstream in &phase.requires {
            let Some(&i) = index.get(upstream.as_str()) else {
                return Err(PlanError::UnknownRequires {
                    phase: phase.name.clone(),
                    upstream: upstream.clone(),
                });
            };
            set.insert(i);
        }
        deps.push(set);
    }

    let mut dependents = vec![Vec::new(); phases.len()];
    for (i, set) in deps.iter().enumerate() {
        for &d in set {
            dependents[d].push(i);
        }
    }

    let mut pending: Vec<usize> = deps.iter().map(BTreeSet::len).collect();
    let mut ready: BTreeSet<usize> = (0..phases.len()).filter(|&i| pending[i] == 0).collect();
    let mut order = Vec::with_capacity(phases.len());

    while let Some(i) = ready.pop_first() {
        order.push(i);
        for &next in &dependents[i] {
            pending[next] -= 1;
            if pending[next] == 0 {
                ready.insert(next);
            }
        }
    }

    if order.len() < phases.len() {
        return Err(PlanError::Cycle {
            phases: (0..phases.len())
                .filter(|&i| pending[i] > 0)
                .map(|i| phases[i].name.clone())
                .collect(),
        });
    }

    // Transitive upstreams, filled in dependency order
    let mut upstream: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); phases.len()];
    for &i in &order {
        let mut set = BTreeSet::new();
        for &d in &deps[i] {
            set.insert(d);
            set.extend(upstream[d].iter().copied());
        }
        upstream[i] = set;
    }

    for (i, phase) in phases.iter().enumerate() {
        for (input, binding) in &phase.inputs {
            let from = binding.source();
            let Some(&src) = index.get(from) else {
                return Err(PlanError::UnknownSource {
                    phase: phase.name.clone(),
                    input: input.clone(),
                    from: from.to_string(),
                });
            };
            if !upstream[i].contains(&src) {
                return Err(PlanError::SourceNotUpstream {
                    phase: phase.name.clone(),
                    input: input.clone(),
                    from: from.to_string(),
                });
            }
        }
    }

    Ok(order.into_iter().map(|i| &phases[i]).collect())
}

/// Rollback steps in the order teardown runs them
pub fn teardown_steps(phases: &[Phase]) -> Result<Vec<(&Phase, TeardownStep)>, PlanError> {
    let order = apply_order(phases)?;
    Ok(order
        .into_iter()
        .rev()
        .flat_map(|phase| phase.rollback().into_iter().map(move |step| (phase, step)))
        .collect())
}

/// Stage names of both pipelines, for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plan {
    pub apply: Vec<String>,
    pub teardown: Vec<String>,
}

impl Plan {
    pub fn new(phases: &[Phase]) -> Result<Self, PlanError> {
        let apply = std::iter::once("Precheck".to_string())
            .chain(apply_order(phases)?.into_iter().map(|p| p.name.clone()))
            .chain(std::iter::once("Validate".to_string()))
            .collect();
        let teardown = teardown_steps(phases)?
            .iter()
            .map(|(_, step)| TeardownStage::from(step).to_string())
            .collect();
        Ok(Self { apply, teardown })
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "apply:")?;
        for (i, stage) in self.apply.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, stage)?;
        }
        writeln!(f, "destroy:")?;
        for (i, stage) in self.teardown.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, stage)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "plan_tests.rs"]
mod tests;

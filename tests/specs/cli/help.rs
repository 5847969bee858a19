// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Help and completion specs

use crate::prelude::*;

#[test]
fn help_lists_every_command() {
    Project::empty()
        .adlab()
        .args(&["--help"])
        .passes()
        .stdout_has("apply")
        .stdout_has("destroy")
        .stdout_has("validate")
        .stdout_has("plan")
        .stdout_has("--runbook");
}

#[test]
fn missing_subcommand_is_a_usage_error() {
    Project::empty()
        .adlab()
        .exits(2)
        .stderr_has("Usage");
}

#[test]
fn completions_are_generated_for_the_adlab_binary() {
    Project::empty()
        .adlab()
        .args(&["completions", "bash"])
        .passes()
        .stdout_has("_adlab");
}

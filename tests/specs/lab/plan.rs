// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Plan specs
//!
//! The plan is derived from the runbook alone: nothing is executed.

use crate::prelude::*;

#[test]
fn built_in_lab_plan_mirrors_apply_in_destroy() {
    Project::empty().adlab().args(&["plan"]).passes().stdout_eq(
        "apply:
  1. Precheck
  2. DirectoryUp
  3. ImageBuild
  4. ServersUp
  5. Validate
destroy:
  1. ServersDown
  2. PurgeImages
  3. PurgeSnapshots
  4. PurgeSecrets
  5. DirectoryDown
",
    );
}

#[test]
fn local_runbook_is_picked_up_from_the_working_directory() {
    let project = Project::empty();
    project.file(
        "adlab.toml",
        &format!(
            "{}
[phase.Network]
tool = \"terraform\"
dir = \"network\"

[phase.Hosts]
tool = \"terraform\"
dir = \"hosts\"
requires = [\"Network\"]
teardown = \"HostsGone\"
",
            LAB
        ),
    );

    project
        .adlab()
        .args(&["plan"])
        .passes()
        .stdout_has("2. Network\n  3. Hosts")
        .stdout_has("1. HostsGone")
        .stdout_lacks("DirectoryUp");
}

#[test]
fn plan_renders_as_json() {
    Project::empty()
        .adlab()
        .args(&["plan", "--format", "json"])
        .passes()
        .stdout_has("\"apply\": [")
        .stdout_has("\"teardown\": [");
}

#[test]
fn cyclic_runbook_is_rejected_before_anything_runs() {
    let project = Project::empty();
    project.file(
        "cyclic.toml",
        &format!(
            "{}
[phase.A]
tool = \"terraform\"
dir = \"a\"
requires = [\"B\"]

[phase.B]
tool = \"terraform\"
dir = \"b\"
requires = [\"A\"]
",
            LAB
        ),
    );

    project
        .adlab()
        .args(&["plan", "--runbook", "cyclic.toml"])
        .exits(1)
        .stderr_has("cannot be ordered")
        .stderr_has("cycle through: A, B");
}

#[test]
fn unreadable_runbook_names_the_file() {
    Project::empty()
        .adlab()
        .args(&["plan", "--runbook", "nope.toml"])
        .exits(1)
        .stderr_has("cannot load runbook nope.toml");
}

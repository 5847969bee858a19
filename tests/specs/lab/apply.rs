// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Apply specs
//!
//! Stack tools are shell scripts on a private PATH; credentials checks are
//! off so no cloud CLI is needed.

use crate::prelude::*;

fn one_stack(tools: &str) -> String {
    format!(
        "{}
[precheck]
tools = [{}]
credentials = false

[phase.DirectoryUp]
tool = \"terraform\"
dir = \"01-directory\"
teardown = \"DirectoryDown\"
",
        LAB, tools
    )
}

#[test]
fn missing_tool_fails_precheck_with_exit_code_2() {
    let project = Project::empty();
    project.file("lab.toml", &one_stack("\"adlab-test-missing-tool\""));

    project
        .adlab()
        .args(&["apply", "--runbook", "lab.toml"])
        .exits(2)
        .stderr_has("missing prerequisite: adlab-test-missing-tool")
        .stderr_has("Install `adlab-test-missing-tool`")
        .stdout_has("Aborted")
        .stdout_lacks("DirectoryUp");
}

#[test]
fn empty_lab_variable_fails_precheck() {
    let project = Project::empty();
    project.file(
        "lab.toml",
        r#"
[lab]
region = "us-east-1"
dns_zone = "lab.example.com"
netbios = "LAB"
user_base_dn = "CN=Users,DC=lab,DC=example,DC=com"
realm = ""

[precheck]
credentials = false

[phase.DirectoryUp]
tool = "terraform"
dir = "01-directory"
"#,
    );

    project
        .adlab()
        .args(&["apply", "--runbook", "lab.toml"])
        .exits(2)
        .stderr_has("missing prerequisite: realm")
        .stderr_has("export ADLAB_REALM");
}

#[cfg(unix)]
#[test]
fn succeeding_stack_reaches_done() {
    let project = Project::empty();
    project
        .script(
            "terraform",
            r#"for arg in "$@"; do [ "$arg" = output ] && echo '{}'; done; exit 0"#,
        )
        .dir("01-directory")
        .file("lab.toml", &one_stack("\"terraform\""));

    project
        .adlab()
        .env("PATH", &project.path_with_bin())
        .args(&["apply", "--runbook", "lab.toml"])
        .passes()
        .stdout_has(": Done")
        .stdout_has("DirectoryUp  ok");
}

#[cfg(unix)]
#[test]
fn failing_stack_aborts_with_nothing_live() {
    let project = Project::empty();
    project
        .script("terraform", "echo 'Error: no valid credential sources' >&2; exit 1")
        .dir("01-directory")
        .file("lab.toml", &one_stack("\"terraform\""));

    project
        .adlab()
        .env("PATH", &project.path_with_bin())
        .args(&["apply", "--runbook", "lab.toml"])
        .exits(1)
        .stdout_has("DirectoryUp  failed")
        .stderr_has("apply failed in DirectoryUp")
        .stderr_has("nothing is live");
}

#[cfg(unix)]
#[test]
fn json_outcome_carries_the_failure_mode() {
    let project = Project::empty();
    project
        .script("terraform", "exit 1")
        .dir("01-directory")
        .file("lab.toml", &one_stack("\"terraform\""));

    project
        .adlab()
        .env("PATH", &project.path_with_bin())
        .args(&["apply", "--runbook", "lab.toml", "--format", "json"])
        .exits(1)
        .stdout_has("\"mode\": \"clean\"")
        .stdout_has("\"stage\": \"DirectoryUp\"");
}

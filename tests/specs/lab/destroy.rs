// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Destroy specs

use crate::prelude::*;

fn lab_with_secrets(cli: &str) -> String {
    format!(
        "{}
[cloud]
cli = \"{}\"

[phase.DirectoryUp]
tool = \"terraform\"
dir = \"01-directory\"
teardown = \"DirectoryDown\"
purge_secrets = [\"admin_ad_credentials\", \"jsmith_ad_credentials\"]
",
        LAB, cli
    )
}

#[cfg(unix)]
#[test]
fn destroy_purges_secrets_then_destroys_the_stack() {
    let project = Project::empty();
    project
        .script("terraform", "exit 0")
        .script("fake-aws", "exit 0")
        .dir("01-directory")
        .file("lab.toml", &lab_with_secrets("fake-aws"));

    project
        .adlab()
        .env("PATH", &project.path_with_bin())
        .args(&["destroy", "--runbook", "lab.toml"])
        .passes()
        .stdout_has("stages: Init -> PurgeSecrets -> DirectoryDown -> Done")
        .stdout_has("secret admin_ad_credentials")
        .stdout_has("secret jsmith_ad_credentials");
}

#[cfg(unix)]
#[test]
fn already_deleted_secrets_are_not_an_error() {
    let project = Project::empty();
    project
        .script("terraform", "exit 0")
        .script(
            "fake-aws",
            "echo 'An error occurred (ResourceNotFoundException)' >&2; exit 254",
        )
        .dir("01-directory")
        .file("lab.toml", &lab_with_secrets("fake-aws"));

    project
        .adlab()
        .env("PATH", &project.path_with_bin())
        .args(&["destroy", "--runbook", "lab.toml"])
        .passes()
        .stdout_has("purged: nothing");
}

#[test]
fn unreachable_cloud_stops_teardown_at_the_first_purge() {
    let project = Project::empty();
    project
        .dir("01-directory")
        .file("lab.toml", &lab_with_secrets("adlab-test-no-such-cloud-cli"));

    project
        .adlab()
        .args(&["destroy", "--runbook", "lab.toml"])
        .exits(1)
        .stdout_has("Aborted")
        .stderr_has("destroy stopped at PurgeSecrets")
        .stderr_has("later teardown stages did not run");
}

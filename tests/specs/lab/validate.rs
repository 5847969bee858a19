// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Validate specs
//!
//! Validation is advisory: missing endpoints are reported, never fatal.

use crate::prelude::*;

fn unreachable_cloud(project: &Project) {
    project.file(
        "lab.toml",
        &format!(
            "{}
[cloud]
cli = \"adlab-test-no-such-cloud-cli\"

[[validate.endpoint]]
label = \"Windows AD admin host\"
value = \"windows-ad-admin\"

[[validate.endpoint]]
label = \"Linux desktop host\"
value = \"linux-desktop\"
",
            LAB
        ),
    );
}

#[test]
fn unreachable_cloud_reports_every_endpoint_missing() {
    let project = Project::empty();
    unreachable_cloud(&project);

    project
        .adlab()
        .args(&["validate", "--runbook", "lab.toml"])
        .passes()
        .stdout_eq(
            "Windows AD admin host:  not found
Linux desktop host:     not found
",
        );
}

#[test]
fn report_renders_as_json() {
    let project = Project::empty();
    unreachable_cloud(&project);

    project
        .adlab()
        .args(&["validate", "--runbook", "lab.toml", "--format", "json"])
        .passes()
        .stdout_has("\"status\": \"not_found\"")
        .stdout_has("\"label\": \"Linux desktop host\"");
}

#[cfg(unix)]
#[test]
fn found_endpoint_shows_its_address() {
    let project = Project::empty();
    project.script(
        "fake-aws",
        r#"case "$*" in
  *windows-ad-admin*) echo '{"Reservations":[{"Instances":[{"InstanceId":"i-1","PublicDnsName":"ec2-1.compute.amazonaws.com","Tags":[{"Key":"Name","Value":"windows-ad-admin"}]}]}]}' ;;
  *) echo '{"Reservations":[]}' ;;
esac"#,
    );
    project.file(
        "lab.toml",
        &format!(
            "{}
[cloud]
cli = \"fake-aws\"

[[validate.endpoint]]
label = \"admin\"
value = \"windows-ad-admin\"

[[validate.endpoint]]
label = \"desktop\"
value = \"linux-desktop\"
",
            LAB
        ),
    );

    project
        .adlab()
        .env("PATH", &project.path_with_bin())
        .args(&["validate", "--runbook", "lab.toml"])
        .passes()
        .stdout_eq(
            "admin:    ec2-1.compute.amazonaws.com
desktop:  not found
",
        );
}

#[test]
fn malformed_runbook_is_reported_without_failing() {
    let project = Project::empty();
    project.file("adlab.toml", "[lab\nregion = ");

    project
        .adlab()
        .args(&["validate"])
        .passes()
        .stderr_has("cannot load runbook adlab.toml");
}

#[test]
fn malformed_runbook_still_fails_apply() {
    let project = Project::empty();
    project.file("adlab.toml", "[lab\nregion = ");

    project
        .adlab()
        .args(&["apply"])
        .exits(1)
        .stderr_has("cannot load runbook adlab.toml");
}

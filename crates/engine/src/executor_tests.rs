// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use adlab_adapters::{FakeProvisioner, ProvisionCall};
use adlab_core::{InputBinding, LabVars, ResolvedInput, StackTool};
use std::path::PathBuf;

fn ctx() -> PipelineContext {
    let lab = LabVars {
        region: "us-east-1".into(),
        dns_zone: "mcloud.mikecloud.com".into(),
        netbios: "MCLOUD".into(),
        user_base_dn: "CN=Users,DC=mcloud,DC=mikecloud,DC=com".into(),
        realm: "MCLOUD.MIKECLOUD.COM".into(),
    };
    PipelineContext::new("/lab", lab)
}

fn servers() -> Phase {
    Phase::new("ServersUp", Stack::new(StackTool::Terraform, "03-servers")).input(
        "ami_id",
        InputBinding::Output {
            from: "ImageBuild".into(),
            output: "image_id".into(),
        },
    )
}

fn ami(value: &str) -> ResolvedInputs {
    let mut inputs = ResolvedInputs::new();
    inputs.insert(ResolvedInput {
        target: "ServersUp".into(),
        name: "ami_id".into(),
        value: value.into(),
        source: "ImageBuild".into(),
    });
    inputs
}

#[tokio::test]
async fn passes_lab_vars_and_inputs_to_the_stack() {
    let fake = FakeProvisioner::new();
    let executor = PhaseExecutor::new(fake.clone());

    let result = executor.execute(&servers(), &ctx(), ami("ami-1")).await.unwrap();
    assert!(result.succeeded());

    match fake.calls().as_slice() {
        [ProvisionCall::Apply { dir, vars }] => {
            assert_eq!(dir, &PathBuf::from("/lab/03-servers"));
            assert_eq!(vars.get("ami_id").map(String::as_str), Some("ami-1"));
            assert_eq!(vars.get("realm").map(String::as_str), Some("MCLOUD.MIKECLOUD.COM"));
        }
        other => panic!("expected one apply, got {other:?}"),
    }
}

#[tokio::test]
async fn reports_stack_outputs() {
    let fake = FakeProvisioner::new();
    fake.set_outputs("02-packer", &[("image_id", "ami-0abc")]);
    let executor = PhaseExecutor::new(fake);

    let phase = Phase::new("ImageBuild", Stack::new(StackTool::Packer, "02-packer"));
    let result = executor
        .execute(&phase, &ctx(), ResolvedInputs::new())
        .await
        .unwrap();
    assert_eq!(result.output("image_id"), Some("ami-0abc"));
}

#[tokio::test]
async fn tool_failure_names_the_phase() {
    let fake = FakeProvisioner::new();
    fake.fail_apply("03-servers");
    let executor = PhaseExecutor::new(fake);

    let err = executor
        .execute(&servers(), &ctx(), ami("ami-1"))
        .await
        .unwrap_err();
    assert_eq!(err.phase(), "ServersUp");
    assert!(matches!(err, PhaseError::Tool { .. }));
}

#[tokio::test]
async fn unresolved_input_never_reaches_the_stack() {
    let fake = FakeProvisioner::new();
    let executor = PhaseExecutor::new(fake.clone());

    let err = executor
        .execute(&servers(), &ctx(), ResolvedInputs::new())
        .await
        .unwrap_err();
    assert!(matches!(err, PhaseError::MissingInput { ref input, .. } if input == "ami_id"));
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn destroy_passes_only_lab_vars() {
    let fake = FakeProvisioner::new();
    let executor = PhaseExecutor::new(fake.clone());

    executor.destroy(&servers(), &ctx()).await.unwrap();
    assert_eq!(
        fake.calls(),
        vec![ProvisionCall::Destroy {
            dir: PathBuf::from("/lab/03-servers")
        }]
    );
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use adlab_adapters::{CloudCall, FakeCloudAdapter, FakeHost};
use adlab_core::LabVars;

fn def(tools: &[&str], env: &[&str]) -> PrecheckDef {
    PrecheckDef {
        tools: tools.iter().map(|s| s.to_string()).collect(),
        env: env.iter().map(|s| s.to_string()).collect(),
        credentials: true,
    }
}

fn lab() -> LabVars {
    LabVars {
        region: "us-east-1".into(),
        dns_zone: "mcloud.mikecloud.com".into(),
        netbios: "MCLOUD".into(),
        user_base_dn: "CN=Users,DC=mcloud,DC=mikecloud,DC=com".into(),
        realm: "MCLOUD.MIKECLOUD.COM".into(),
    }
}

fn ctx() -> PipelineContext {
    PipelineContext::new("/lab", lab())
}

fn missing(err: PrecheckError) -> String {
    match err {
        PrecheckError::Missing { missing } => missing,
        other => panic!("expected a missing prerequisite, got {other:?}"),
    }
}

#[tokio::test]
async fn passes_when_everything_is_present() {
    let host = FakeHost::with_tools(&["terraform", "packer", "aws"]);
    host.set_env("AWS_PROFILE", "lab");
    let checker = Prechecker::new(
        host,
        FakeCloudAdapter::new(),
        def(&["terraform", "packer", "aws"], &["AWS_PROFILE"]),
    );
    checker.check(&ctx()).await.unwrap();
}

#[tokio::test]
async fn first_missing_tool_is_named() {
    let host = FakeHost::with_tools(&["terraform"]);
    let checker = Prechecker::new(host, FakeCloudAdapter::new(), def(&["terraform", "packer", "aws"], &[]));
    let err = checker.check(&ctx()).await.unwrap_err();
    assert_eq!(missing(err), "packer");
}

#[tokio::test]
async fn blank_env_var_counts_as_missing() {
    let host = FakeHost::new();
    host.set_env("AWS_PROFILE", "  ");
    let checker = Prechecker::new(host, FakeCloudAdapter::new(), def(&[], &["AWS_PROFILE"]));
    let err = checker.check(&ctx()).await.unwrap_err();
    assert_eq!(missing(err), "AWS_PROFILE");
}

#[tokio::test]
async fn empty_lab_variable_is_named() {
    let lab = LabVars {
        realm: String::new(),
        ..lab()
    };
    let checker = Prechecker::new(FakeHost::new(), FakeCloudAdapter::new(), def(&[], &[]));
    let err = checker
        .check(&PipelineContext::new("/lab", lab))
        .await
        .unwrap_err();
    assert_eq!(missing(err), "realm");
}

#[tokio::test]
async fn rejected_credentials_carry_the_cause() {
    let cloud = FakeCloudAdapter::new();
    cloud.set_identity(None);
    let checker = Prechecker::new(FakeHost::new(), cloud, def(&[], &[]));
    let err = checker.check(&ctx()).await.unwrap_err();
    match err {
        PrecheckError::Credentials { cause } => assert!(cause.contains("Unable to locate")),
        other => panic!("expected credentials failure, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_tool_stops_before_credentials_are_checked() {
    let cloud = FakeCloudAdapter::new();
    let checker = Prechecker::new(FakeHost::new(), cloud.clone(), def(&["aws"], &[]));
    assert!(checker.check(&ctx()).await.is_err());
    assert!(!cloud.calls().contains(&CloudCall::CallerIdentity));
}

#[tokio::test]
async fn credentials_check_can_be_disabled() {
    let cloud = FakeCloudAdapter::new();
    cloud.set_identity(None);
    let mut def = def(&[], &[]);
    def.credentials = false;
    let checker = Prechecker::new(FakeHost::new(), cloud.clone(), def);
    checker.check(&ctx()).await.unwrap();
    assert!(cloud.calls().is_empty());
}

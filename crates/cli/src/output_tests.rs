// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use adlab_core::{ApplyStage, IrreversibleKind, TeardownStage};
use adlab_engine::{Aborted, ApplyFailure, PhaseError, TeardownAbort, TeardownFailure};
use std::collections::BTreeMap;
use std::time::Duration;

fn ok(phase: &str, ms: u64) -> PhaseResult {
    PhaseResult::success(phase, BTreeMap::new(), Duration::from_millis(ms))
}

#[test]
fn apply_summary_lists_each_phase() {
    let outcome = ApplyOutcome {
        trail: vec![
            ApplyStage::Init,
            ApplyStage::Precheck,
            ApplyStage::Phase("DirectoryUp".into()),
            ApplyStage::Phase("ImageBuild".into()),
            ApplyStage::Validate,
            ApplyStage::Done,
        ],
        results: vec![ok("DirectoryUp", 1500), ok("ImageBuild", 2000)],
        report: None,
        abort: None,
    };

    let text = ApplySummary::new("r1", &outcome).to_string();
    similar_asserts::assert_eq!(
        text,
        "apply r1: Done\n  DirectoryUp  ok      1.5s\n  ImageBuild   ok      2.0s\n"
    );
}

#[test]
fn aborted_apply_serializes_failure_mode() {
    let outcome = ApplyOutcome {
        trail: vec![
            ApplyStage::Init,
            ApplyStage::Precheck,
            ApplyStage::Phase("DirectoryUp".into()),
            ApplyStage::Phase("ImageBuild".into()),
            ApplyStage::Aborted,
        ],
        results: vec![
            ok("DirectoryUp", 10),
            PhaseResult::failure("ImageBuild", "boom", Duration::from_millis(5)),
        ],
        report: None,
        abort: Some(Aborted {
            at: ApplyStage::Phase("ImageBuild".into()),
            failure: ApplyFailure::Phase(PhaseError::MissingInput {
                phase: "ImageBuild".into(),
                input: "vpc_id".into(),
            }),
            mode: FailureMode::LiveUpstream {
                live: vec!["DirectoryUp".into()],
            },
        }),
    };

    let json = serde_json::to_value(ApplySummary::new("r1", &outcome)).unwrap();
    assert_eq!(json["state"], "Aborted");
    assert_eq!(json["failure"]["stage"], "ImageBuild");
    assert_eq!(json["failure"]["mode"], "live_upstream");
    assert_eq!(json["failure"]["live"][0], "DirectoryUp");
    assert!(json.get("report").is_none());

    let text = ApplySummary::new("r1", &outcome).to_string();
    assert!(text.contains("ImageBuild   failed"));
}

#[test]
fn teardown_summary_names_purged_resources() {
    let outcome = TeardownOutcome {
        trail: vec![
            TeardownStage::Init,
            TeardownStage::Destroy("ServersDown".into()),
            TeardownStage::PurgeImages,
            TeardownStage::Done,
        ],
        purged: vec![IrreversibleResource::new(
            IrreversibleKind::MachineImage,
            "ami-1",
            "image name starts with desktop_ami",
        )],
        abort: None,
    };

    let text = TeardownSummary::new("r2", &outcome).to_string();
    similar_asserts::assert_eq!(
        text,
        "destroy r2: Done\n  stages: Init -> ServersDown -> PurgeImages -> Done\n  purged:\n    image ami-1 (image name starts with desktop_ami)\n"
    );
}

#[test]
fn teardown_failure_is_reported_in_json() {
    let outcome = TeardownOutcome {
        trail: vec![
            TeardownStage::Init,
            TeardownStage::PurgeImages,
            TeardownStage::Aborted,
        ],
        purged: Vec::new(),
        abort: Some(TeardownAbort {
            at: TeardownStage::PurgeImages,
            failure: TeardownFailure::ListImages {
                prefix: "desktop_ami".into(),
                source: adlab_adapters::CloudError::NotFound("desktop_ami".into()),
            },
        }),
    };

    let summary = TeardownSummary::new("r3", &outcome);
    assert!(summary.to_string().contains("purged: nothing"));
    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["failure"]["stage"], "PurgeImages");
    assert_eq!(json["stages"].as_array().map(Vec::len), Some(3));
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! AWS adapter backed by the `aws` command-line tool

use super::{CloudAdapter, CloudError};
use adlab_core::{MachineImage, ResourceKind, TaggedResource};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeMap;
use tokio::process::Command;

/// Error codes meaning the resource is already gone. A deregistered image
/// reports `InvalidAMIID.Unavailable` rather than a `*NotFound` code.
const ABSENT_MARKERS: &[&str] = &["NotFound", "InvalidAMIID.Unavailable"];

/// Cloud adapter that shells out to the AWS CLI with JSON output
#[derive(Clone, Debug)]
pub struct AwsCliAdapter {
    cli: String,
    region: String,
    profile: Option<String>,
}

impl AwsCliAdapter {
    pub fn new(cli: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            cli: cli.into(),
            region: region.into(),
            profile: None,
        }
    }

    pub fn with_profile(mut self, profile: Option<String>) -> Self {
        self.profile = profile;
        self
    }

    async fn run(&self, args: &[&str]) -> Result<String, CloudError> {
        let command = args.iter().take(2).copied().collect::<Vec<_>>().join(" ");

        let mut cmd = Command::new(&self.cli);
        cmd.args(args)
            .args(["--region", &self.region, "--output", "json"]);
        if let Some(profile) = &self.profile {
            cmd.args(["--profile", profile]);
        }

        let output = cmd.output().await.map_err(|e| CloudError::Spawn {
            cli: self.cli.clone(),
            message: e.to_string(),
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            if ABSENT_MARKERS.iter().any(|m| stderr.contains(m)) {
                return Err(CloudError::NotFound(stderr));
            }
            return Err(CloudError::CommandFailed { command, stderr });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

#[async_trait]
impl CloudAdapter for AwsCliAdapter {
    async fn caller_identity(&self) -> Result<String, CloudError> {
        let json = match self.run(&["sts", "get-caller-identity"]).await {
            Ok(json) => json,
            Err(CloudError::CommandFailed { stderr, .. }) => {
                return Err(CloudError::Credentials(stderr))
            }
            Err(e) => return Err(e),
        };
        parse_caller_identity(&json).map_err(|message| CloudError::Parse {
            command: "sts get-caller-identity".to_string(),
            message,
        })
    }

    async fn find_tagged(
        &self,
        kind: ResourceKind,
        key: &str,
        value: &str,
    ) -> Result<Vec<TaggedResource>, CloudError> {
        let tag_filter = format!("Name=tag:{},Values={}", key, value);
        let operation = match kind {
            ResourceKind::Network => "describe-vpcs",
            ResourceKind::Subnet => "describe-subnets",
            ResourceKind::Instance => "describe-instances",
        };

        let mut args = vec!["ec2", operation, "--filters", tag_filter.as_str()];
        if kind == ResourceKind::Instance {
            args.push("Name=instance-state-name,Values=running");
        }

        let json = self.run(&args).await?;
        parse_tagged(kind, &json).map_err(|message| CloudError::Parse {
            command: format!("ec2 {}", operation),
            message,
        })
    }

    async fn list_images(&self, name_prefix: &str) -> Result<Vec<MachineImage>, CloudError> {
        let name_filter = format!("Name=name,Values={}*", name_prefix);
        let json = self
            .run(&[
                "ec2",
                "describe-images",
                "--owners",
                "self",
                "--filters",
                &name_filter,
            ])
            .await?;
        parse_images(&json, name_prefix).map_err(|message| CloudError::Parse {
            command: "ec2 describe-images".to_string(),
            message,
        })
    }

    async fn deregister_image(&self, image_id: &str) -> Result<(), CloudError> {
        self.run(&["ec2", "deregister-image", "--image-id", image_id])
            .await
            .map(drop)
    }

    async fn delete_snapshot(&self, snapshot_id: &str) -> Result<(), CloudError> {
        self.run(&["ec2", "delete-snapshot", "--snapshot-id", snapshot_id])
            .await
            .map(drop)
    }

    async fn delete_secret(&self, name: &str) -> Result<(), CloudError> {
        self.run(&[
            "secretsmanager",
            "delete-secret",
            "--secret-id",
            name,
            "--force-delete-without-recovery",
        ])
        .await
        .map(drop)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AwsTag {
    key: String,
    value: String,
}

fn tag_map(tags: Vec<AwsTag>) -> BTreeMap<String, String> {
    tags.into_iter().map(|t| (t.key, t.value)).collect()
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Vpc {
    vpc_id: String,
    #[serde(default)]
    tags: Vec<AwsTag>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Subnet {
    subnet_id: String,
    #[serde(default)]
    tags: Vec<AwsTag>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Instance {
    instance_id: String,
    #[serde(default)]
    public_dns_name: Option<String>,
    #[serde(default)]
    public_ip_address: Option<String>,
    #[serde(default)]
    private_ip_address: Option<String>,
    #[serde(default)]
    tags: Vec<AwsTag>,
}

impl Instance {
    /// Public DNS name, else public IP, else private IP
    fn address(&self) -> Option<String> {
        [
            &self.public_dns_name,
            &self.public_ip_address,
            &self.private_ip_address,
        ]
        .into_iter()
        .flatten()
        .find(|a| !a.is_empty())
        .cloned()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Reservation {
    #[serde(default)]
    instances: Vec<Instance>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeVpcs {
    #[serde(default)]
    vpcs: Vec<Vpc>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeSubnets {
    #[serde(default)]
    subnets: Vec<Subnet>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeInstances {
    #[serde(default)]
    reservations: Vec<Reservation>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Ebs {
    #[serde(default)]
    snapshot_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct BlockDeviceMapping {
    #[serde(default)]
    ebs: Option<Ebs>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Image {
    image_id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    block_device_mappings: Vec<BlockDeviceMapping>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeImages {
    #[serde(default)]
    images: Vec<Image>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CallerIdentity {
    arn: String,
}

pub(crate) fn parse_caller_identity(json: &str) -> Result<String, String> {
    serde_json::from_str::<CallerIdentity>(json)
        .map(|c| c.arn)
        .map_err(|e| e.to_string())
}

pub(crate) fn parse_tagged(kind: ResourceKind, json: &str) -> Result<Vec<TaggedResource>, String> {
    let resources = match kind {
        ResourceKind::Network => serde_json::from_str::<DescribeVpcs>(json)
            .map_err(|e| e.to_string())?
            .vpcs
            .into_iter()
            .map(|v| TaggedResource {
                kind,
                id: v.vpc_id,
                tags: tag_map(v.tags),
                address: None,
            })
            .collect(),
        ResourceKind::Subnet => serde_json::from_str::<DescribeSubnets>(json)
            .map_err(|e| e.to_string())?
            .subnets
            .into_iter()
            .map(|s| TaggedResource {
                kind,
                id: s.subnet_id,
                tags: tag_map(s.tags),
                address: None,
            })
            .collect(),
        ResourceKind::Instance => serde_json::from_str::<DescribeInstances>(json)
            .map_err(|e| e.to_string())?
            .reservations
            .into_iter()
            .flat_map(|r| r.instances)
            .map(|i| {
                let address = i.address();
                TaggedResource {
                    kind,
                    id: i.instance_id,
                    tags: tag_map(i.tags),
                    address,
                }
            })
            .collect(),
    };
    Ok(resources)
}

pub(crate) fn parse_images(json: &str, name_prefix: &str) -> Result<Vec<MachineImage>, String> {
    let images = serde_json::from_str::<DescribeImages>(json)
        .map_err(|e| e.to_string())?
        .images
        .into_iter()
        .filter_map(|image| {
            let name = image.name.unwrap_or_default();
            if !name.starts_with(name_prefix) {
                return None;
            }
            let snapshot_ids = image
                .block_device_mappings
                .into_iter()
                .filter_map(|m| m.ebs.and_then(|e| e.snapshot_id))
                .collect();
            Some(MachineImage {
                id: image.image_id,
                name,
                snapshot_ids,
            })
        })
        .collect();
    Ok(images)
}

#[cfg(test)]
#[path = "aws_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Terraform and Packer driven through their command-line tools
//!
//! Variables are passed through the environment (`TF_VAR_*`, `PKR_VAR_*`) so
//! a stack that does not declare a lab variable simply ignores it.

use super::{ProvisionAdapter, ProvisionError, StackVars};
use adlab_core::{Stack, StackTool};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::process::Output;
use tokio::process::Command;

/// Provisioner that runs the real `terraform` and `packer` binaries
#[derive(Clone, Debug)]
pub struct ShellProvisioner {
    terraform: String,
    packer: String,
}

impl Default for ShellProvisioner {
    fn default() -> Self {
        Self::new()
    }
}

impl ShellProvisioner {
    pub fn new() -> Self {
        Self {
            terraform: "terraform".to_string(),
            packer: "packer".to_string(),
        }
    }

    /// Use specific binaries instead of the ones on PATH
    pub fn with_binaries(terraform: impl Into<String>, packer: impl Into<String>) -> Self {
        Self {
            terraform: terraform.into(),
            packer: packer.into(),
        }
    }

    fn command(&self, tool: StackTool, vars: &StackVars) -> Command {
        let (program, prefix) = match tool {
            StackTool::Terraform => (&self.terraform, "TF_VAR_"),
            StackTool::Packer => (&self.packer, "PKR_VAR_"),
        };
        let mut cmd = Command::new(program);
        cmd.envs(vars.iter().map(|(k, v)| (format!("{}{}", prefix, k), v)));
        if tool == StackTool::Terraform {
            cmd.env("TF_IN_AUTOMATION", "1");
        }
        cmd
    }

    async fn terraform_apply(
        &self,
        stack: &Stack,
        vars: &StackVars,
    ) -> Result<BTreeMap<String, String>, ProvisionError> {
        let chdir = format!("-chdir={}", stack.dir.display());
        let tool = StackTool::Terraform;

        run(
            tool,
            "init",
            self.command(tool, vars)
                .args([chdir.as_str(), "init", "-input=false", "-no-color"]),
        )
        .await?;
        run(
            tool,
            "apply",
            self.command(tool, vars)
                .args([chdir.as_str(), "apply", "-auto-approve", "-input=false", "-no-color"]),
        )
        .await?;
        let output = run(
            tool,
            "output",
            self.command(tool, vars)
                .args([chdir.as_str(), "output", "-json", "-no-color"]),
        )
        .await?;

        parse_terraform_outputs(&String::from_utf8_lossy(&output.stdout))
    }

    async fn terraform_destroy(&self, stack: &Stack, vars: &StackVars) -> Result<(), ProvisionError> {
        let chdir = format!("-chdir={}", stack.dir.display());
        let tool = StackTool::Terraform;

        run(
            tool,
            "init",
            self.command(tool, vars)
                .args([chdir.as_str(), "init", "-input=false", "-no-color"]),
        )
        .await?;
        run(
            tool,
            "destroy",
            self.command(tool, vars)
                .args([chdir.as_str(), "destroy", "-auto-approve", "-input=false", "-no-color"]),
        )
        .await?;
        Ok(())
    }

    async fn packer_build(
        &self,
        stack: &Stack,
        vars: &StackVars,
    ) -> Result<BTreeMap<String, String>, ProvisionError> {
        let tool = StackTool::Packer;

        run(
            tool,
            "init",
            self.command(tool, vars).arg("init").arg(&stack.dir),
        )
        .await?;
        let output = run(
            tool,
            "build",
            self.command(tool, vars)
                .args(["build", "-machine-readable", "-color=false"])
                .arg(&stack.dir),
        )
        .await?;

        parse_packer_artifact(&String::from_utf8_lossy(&output.stdout))
    }
}

#[async_trait]
impl ProvisionAdapter for ShellProvisioner {
    async fn apply(
        &self,
        stack: &Stack,
        vars: &StackVars,
    ) -> Result<BTreeMap<String, String>, ProvisionError> {
        match stack.tool {
            StackTool::Terraform => self.terraform_apply(stack, vars).await,
            StackTool::Packer => self.packer_build(stack, vars).await,
        }
    }

    async fn destroy(&self, stack: &Stack, vars: &StackVars) -> Result<(), ProvisionError> {
        match stack.tool {
            StackTool::Terraform => self.terraform_destroy(stack, vars).await,
            StackTool::Packer => Err(ProvisionError::Unsupported {
                tool: StackTool::Packer,
                op: "destroy",
            }),
        }
    }
}

/// Run one tool step to completion, logging its output
async fn run(tool: StackTool, step: &str, cmd: &mut Command) -> Result<Output, ProvisionError> {
    let output = cmd.output().await.map_err(|e| ProvisionError::Spawn {
        tool,
        message: e.to_string(),
    })?;

    if !output.stdout.is_empty() {
        tracing::info!(
            %tool,
            step,
            stdout = %String::from_utf8_lossy(&output.stdout),
            "tool stdout"
        );
    }
    if !output.stderr.is_empty() {
        tracing::warn!(
            %tool,
            step,
            stderr = %String::from_utf8_lossy(&output.stderr),
            "tool stderr"
        );
    }

    if !output.status.success() {
        return Err(ProvisionError::CommandFailed {
            tool,
            step: step.to_string(),
            status: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(output)
}

/// Flatten `terraform output -json` into name/value strings.
///
/// String values are kept verbatim; other values are kept as compact JSON.
/// Sensitive outputs are dropped.
pub fn parse_terraform_outputs(json: &str) -> Result<BTreeMap<String, String>, ProvisionError> {
    #[derive(serde::Deserialize)]
    struct TerraformOutput {
        value: serde_json::Value,
        #[serde(default)]
        sensitive: bool,
    }

    if json.trim().is_empty() {
        return Ok(BTreeMap::new());
    }

    let outputs: BTreeMap<String, TerraformOutput> =
        serde_json::from_str(json).map_err(|e| ProvisionError::Output {
            tool: StackTool::Terraform,
            message: e.to_string(),
        })?;

    Ok(outputs
        .into_iter()
        .filter(|(_, o)| !o.sensitive)
        .map(|(name, o)| {
            let value = match o.value {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            (name, value)
        })
        .collect())
}

/// Extract the built image from Packer's machine-readable output.
///
/// The artifact line looks like
/// `1700000000,amazon-ebs.desktop,artifact,0,id,us-east-1:ami-0abc`;
/// the first `region:image` pair yields `image_id` and `image_region`.
pub fn parse_packer_artifact(stdout: &str) -> Result<BTreeMap<String, String>, ProvisionError> {
    let artifact = stdout
        .lines()
        .map(|line| line.splitn(6, ',').collect::<Vec<_>>())
        .find(|fields| fields.len() == 6 && fields[2] == "artifact" && fields[4] == "id")
        .map(|fields| fields[5].trim().to_string())
        .ok_or_else(|| ProvisionError::Output {
            tool: StackTool::Packer,
            message: "build produced no artifact id".to_string(),
        })?;

    // Multi-region artifacts are joined with an escaped comma
    let first = artifact
        .split("%!(PACKER_COMMA)")
        .next()
        .unwrap_or(&artifact)
        .to_string();

    let mut outputs = BTreeMap::new();
    match first.split_once(':') {
        Some((region, image)) => {
            outputs.insert("image_region".to_string(), region.to_string());
            outputs.insert("image_id".to_string(), image.to_string());
        }
        None => {
            outputs.insert("image_id".to_string(), first);
        }
    }
    Ok(outputs)
}

#[cfg(test)]
#[path = "shell_tests.rs"]
mod tests;

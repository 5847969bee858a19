// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Built-in runbook for the Active Directory lab

use crate::{parse_runbook, ParseError, Runbook};

/// The lab as shipped: directory stack, desktop image build, server stack
pub const DEFAULT_RUNBOOK: &str = r#"
[lab]
region = "us-east-1"
dns_zone = "mcloud.mikecloud.com"
netbios = "MCLOUD"
user_base_dn = "CN=Users,DC=mcloud,DC=mikecloud,DC=com"
realm = "MCLOUD.MIKECLOUD.COM"

[precheck]
tools = ["terraform", "packer", "aws"]
credentials = true

[cloud]
cli = "aws"

[phase.DirectoryUp]
tool = "terraform"
dir = "01-directory"
teardown = "DirectoryDown"
purge_secrets = [
    "admin_ad_credentials",
    "jsmith_ad_credentials",
    "edavis_ad_credentials",
    "rpatel_ad_credentials",
    "akumar_ad_credentials",
]

[phase.ImageBuild]
tool = "packer"
dir = "02-packer"
requires = ["DirectoryUp"]
purge_images = "desktop_ami"

[phase.ImageBuild.inputs]
vpc_id = { from = "DirectoryUp", kind = "network", tag = "Name", value = "ad-vpc" }
subnet_id = { from = "DirectoryUp", kind = "subnet", tag = "Name", value = "vm-subnet-1" }

[phase.ServersUp]
tool = "terraform"
dir = "03-servers"
requires = ["ImageBuild"]
teardown = "ServersDown"

[phase.ServersUp.inputs]
ami_id = { from = "ImageBuild", output = "image_id" }

[[validate.endpoint]]
label = "Windows AD admin host"
tag = "Name"
value = "windows-ad-admin"

[[validate.endpoint]]
label = "Linux desktop host"
tag = "Name"
value = "linux-desktop"
"#;

/// Parse the built-in runbook
pub fn default_runbook() -> Result<Runbook, ParseError> {
    parse_runbook(DEFAULT_RUNBOOK)
}

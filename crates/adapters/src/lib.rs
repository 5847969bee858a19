// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for external I/O: stack tools, the cloud provider CLI, and the
//! local host

pub mod cloud;
pub mod host;
pub mod provision;
pub mod traced;

pub use cloud::{AwsCliAdapter, CloudAdapter, CloudError};
pub use host::{HostAdapter, SystemHost};
pub use provision::{ProvisionAdapter, ProvisionError, ShellProvisioner, StackVars};
pub use traced::{TracedCloudAdapter, TracedProvisioner};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use cloud::{CloudCall, CloudFailure, FakeCloudAdapter};
#[cfg(any(test, feature = "test-support"))]
pub use host::FakeHost;
#[cfg(any(test, feature = "test-support"))]
pub use provision::{FakeProvisioner, ProvisionCall};

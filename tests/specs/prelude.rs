// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared helpers for the CLI specs

use assert_cmd::assert::Assert;
use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub use predicates::prelude::*;

/// Lab variables every test runbook starts from
pub const LAB: &str = r#"
[lab]
region = "us-east-1"
dns_zone = "lab.example.com"
netbios = "LAB"
user_base_dn = "CN=Users,DC=lab,DC=example,DC=com"
realm = "LAB.EXAMPLE.COM"
"#;

/// Environment variables that would leak the caller's lab into a test
const LAB_ENV: &[&str] = &[
    "ADLAB_REGION",
    "ADLAB_DNS_ZONE",
    "ADLAB_NETBIOS",
    "ADLAB_USER_BASE_DN",
    "ADLAB_REALM",
    "RUST_LOG",
];

/// Path to the built `adlab` binary, next to the test's deps directory
fn adlab_bin() -> PathBuf {
    let exe = std::env::current_exe().unwrap();
    let target = exe.parent().and_then(Path::parent).unwrap();
    let bin = target.join(format!("adlab{}", std::env::consts::EXE_SUFFIX));
    assert!(
        bin.is_file(),
        "{} not built; run `cargo test --workspace`",
        bin.display()
    );
    bin
}

/// A scratch working directory for one test
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file, creating parent directories
    pub fn file(&self, rel: &str, content: &str) -> &Self {
        let path = self.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
        self
    }

    pub fn dir(&self, rel: &str) -> &Self {
        std::fs::create_dir_all(self.path().join(rel)).unwrap();
        self
    }

    /// Write an executable shell script under `bin/`
    #[cfg(unix)]
    pub fn script(&self, name: &str, body: &str) -> &Self {
        use std::os::unix::fs::PermissionsExt;

        let rel = format!("bin/{}", name);
        self.file(&rel, &format!("#!/bin/sh\n{}\n", body));
        let path = self.path().join(rel);
        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).unwrap();
        self
    }

    /// PATH with this project's `bin/` first, then the system directories
    pub fn path_with_bin(&self) -> String {
        format!("{}:/usr/bin:/bin", self.path().join("bin").display())
    }

    /// `adlab` run from this project's directory
    pub fn adlab(&self) -> Cli {
        let mut cmd = Command::new(adlab_bin());
        cmd.current_dir(self.path());
        for name in LAB_ENV {
            cmd.env_remove(name);
        }
        Cli { cmd }
    }
}

pub struct Cli {
    cmd: Command,
}

impl Cli {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.cmd.env(key, value);
        self
    }

    pub fn passes(mut self) -> Run {
        Run(self.cmd.assert().success())
    }

    pub fn exits(mut self, code: i32) -> Run {
        Run(self.cmd.assert().code(code))
    }
}

pub struct Run(Assert);

impl Run {
    fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.0.get_output().stdout).into_owned()
    }

    pub fn stdout_eq(self, expected: &str) -> Self {
        similar_asserts::assert_eq!(self.stdout(), expected);
        self
    }

    pub fn stdout_has(self, needle: &str) -> Self {
        Run(self.0.stdout(predicate::str::contains(needle)))
    }

    pub fn stdout_lacks(self, needle: &str) -> Self {
        Run(self.0.stdout(predicate::str::contains(needle).not()))
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        Run(self.0.stderr(predicate::str::contains(needle)))
    }
}

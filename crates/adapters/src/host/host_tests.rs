// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn touch(dir: &Path, name: &str, mode: u32) {
    let path = dir.join(name);
    std::fs::write(&path, "#!/bin/sh\n").unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(mode)).unwrap();
}

#[test]
fn finds_executables_on_path() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "terraform", 0o755);

    let host = SystemHost::with_path(dir.path());
    assert!(host.has_tool("terraform"));
    assert!(!host.has_tool("packer"));
}

#[test]
fn ignores_files_without_exec_bit() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "packer", 0o644);

    let host = SystemHost::with_path(dir.path());
    assert!(!host.has_tool("packer"));
}

#[test]
fn searches_every_path_entry() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    touch(second.path(), "aws", 0o755);

    let path = std::env::join_paths([first.path(), second.path()]).unwrap();
    let host = SystemHost::with_path(path);
    assert!(host.has_tool("aws"));
}

#[test]
fn tool_given_as_path_is_checked_directly() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "aws", 0o755);

    let host = SystemHost::with_path("");
    assert!(host.has_tool(&dir.path().join("aws").display().to_string()));
    assert!(!host.has_tool("/nonexistent/aws"));
}

#[test]
fn fake_host_reports_installed_tools_and_env() {
    let host = FakeHost::with_tools(&["terraform"]);
    host.set_env("AWS_PROFILE", "lab");

    assert!(host.has_tool("terraform"));
    assert!(!host.has_tool("packer"));
    assert_eq!(host.env_var("AWS_PROFILE").as_deref(), Some("lab"));
    assert_eq!(host.env_var("HOME"), None);

    host.uninstall("terraform");
    assert!(!host.has_tool("terraform"));
}

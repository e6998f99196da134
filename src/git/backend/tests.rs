// gitrefs: branch, tag and tracked-ref queries over the git CLI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{GitRequest, GitRunner, ShellBackend, StubRunner};
use crate::error::{CommandError, RefsError};
use std::collections::BTreeMap;
use tempfile::TempDir;

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

#[test]
fn test_request_display() {
    let request = GitRequest::new(["for-each-ref", "--sort=refname", "refs/heads"], "/repo");
    insta::assert_snapshot!(request.to_string(), @"git for-each-ref --sort=refname refs/heads");
}

#[test]
fn test_request_env_is_merged() {
    let env = BTreeMap::from([("HOME".to_string(), "/tmp/home".to_string())]);
    let request = GitRequest::new(["status"], "/repo").with_env(&env);
    assert_eq!(request.env().get("HOME").map(String::as_str), Some("/tmp/home"));
}

#[test]
fn test_shell_backend_runs_git() {
    let temp = temp_dir();
    let backend = ShellBackend::locate().expect("git must be installed for tests");
    let out = backend
        .run(&GitRequest::new(["--version"], temp.path()))
        .expect("git --version should succeed");
    assert!(out.starts_with("git version"), "unexpected output: {out}");
}

#[test]
fn test_shell_backend_non_zero_exit() {
    let temp = temp_dir();
    let backend = ShellBackend::locate().expect("git must be installed for tests");
    let ceiling = temp.path().parent().unwrap_or_else(|| temp.path());
    let env = BTreeMap::from([(
        "GIT_CEILING_DIRECTORIES".to_string(),
        ceiling.display().to_string(),
    )]);
    let err = backend
        .run(&GitRequest::new(["rev-parse", "--absolute-git-dir"], temp.path()).with_env(&env))
        .unwrap_err();

    assert_eq!(err.exit_code(), Some(128));
    let RefsError::Command(inner) = err else {
        panic!("expected a command error");
    };
    let CommandError::NonZeroExit { command, stderr, .. } = *inner else {
        panic!("expected NonZeroExit");
    };
    assert_eq!(command, "git rev-parse --absolute-git-dir");
    assert!(stderr.contains("not a git repository"), "stderr: {stderr}");
}

#[test]
fn test_shell_backend_missing_executable() {
    let temp = temp_dir();
    let backend = ShellBackend::with_executable(temp.path().join("no-such-git"));
    assert!(backend.executable().ends_with("no-such-git"));
    let err = backend
        .run(&GitRequest::new(["--version"], temp.path()))
        .unwrap_err();
    assert!(
        matches!(&err, RefsError::Command(inner) if matches!(**inner, CommandError::ExecutableNotFound { .. })),
        "got {err:?}"
    );
}

#[test]
fn test_stub_runner_replays_in_order() {
    let runner = StubRunner::new()
        .respond(&["remote"], "")
        .respond(&["remote"], "origin\n")
        .fail(&["symbolic-ref", "--quiet", "HEAD"], 1, "");

    let remote = GitRequest::new(["remote"], ".");
    assert_eq!(runner.run(&remote).unwrap(), "");
    assert_eq!(runner.run(&remote).unwrap(), "origin\n");
    // last response is sticky
    assert_eq!(runner.run(&remote).unwrap(), "origin\n");

    let head = GitRequest::new(["symbolic-ref", "--quiet", "HEAD"], ".");
    assert_eq!(runner.run(&head).unwrap_err().exit_code(), Some(1));

    assert_eq!(runner.call_count(&["remote"]), 3);
    assert_eq!(runner.calls().len(), 4);
}

#[test]
fn test_stub_runner_unscripted_request_fails() {
    let runner = StubRunner::new();
    let err = runner.run(&GitRequest::new(["tag"], ".")).unwrap_err();
    assert!(err.to_string().contains("no stubbed response for 'git tag'"));
}

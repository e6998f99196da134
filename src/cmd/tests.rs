// gitrefs: branch, tag and tracked-ref queries over the git CLI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::query::{QueryOutput, run_query};
use crate::cli::{BranchArg, BranchesArgs, Command, RefsArgs};
use crate::config::OutputFormat;
use crate::error::RefsError;
use crate::git::backend::StubRunner;
use crate::git::context::RepoContext;
use crate::git::refs::{REF_FORMAT, RefSet};
use std::sync::Arc;

const HEAD: &[&str] = &["symbolic-ref", "--quiet", "HEAD"];
const CONFIG: &[&str] = &["config", "-z", "--list"];

fn context(runner: StubRunner) -> RepoContext {
    RepoContext::builder()
        .workdir("/work/repo")
        .runner(Arc::new(runner))
        .build()
}

fn sample_refs() -> RefSet {
    RefSet {
        local: vec!["main".to_string(), "topic".to_string()],
        remote: vec!["origin/main".to_string()],
        tags: vec!["v2".to_string(), "v1".to_string()],
    }
}

#[test]
fn test_render_list_text() {
    let output = QueryOutput::List(vec!["a".to_string(), "b c".to_string()]);
    insta::assert_snapshot!(output.render(OutputFormat::Text).unwrap(), @r"
    a
    b c
    ");
}

#[test]
fn test_render_empty_list_text_prints_nothing() {
    let output = QueryOutput::List(Vec::new());
    assert_eq!(output.render(OutputFormat::Text).unwrap(), "");
}

#[test]
fn test_render_absent_scalar() {
    let output = QueryOutput::Scalar(None);
    assert_eq!(output.render(OutputFormat::Text).unwrap(), "");
    assert_eq!(output.render(OutputFormat::Json).unwrap(), "null\n");
}

#[test]
fn test_render_scalar_json() {
    let output = QueryOutput::Scalar(Some("origin/main".to_string()));
    assert_eq!(
        output.render(OutputFormat::Json).unwrap(),
        "\"origin/main\"\n"
    );
}

#[test]
fn test_render_split_refs_text() {
    let output = QueryOutput::Refs(sample_refs());
    insta::assert_snapshot!(output.render(OutputFormat::Text).unwrap(), @r"
    [local]
    main
    topic
    [remote]
    origin/main
    [tags]
    v2
    v1
    ");
}

#[test]
fn test_render_split_refs_json() {
    let output = QueryOutput::Refs(sample_refs());
    let json: serde_json::Value =
        serde_json::from_str(&output.render(OutputFormat::Json).unwrap()).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "local": ["main", "topic"],
            "remote": ["origin/main"],
            "tags": ["v2", "v1"],
        })
    );
}

#[test]
fn test_run_current() {
    let ctx = context(StubRunner::new().respond(HEAD, "refs/heads/main\n"));
    assert_eq!(
        run_query(&Command::Current, &ctx).unwrap(),
        Some(QueryOutput::Scalar(Some("main".to_string())))
    );
}

#[test]
fn test_run_current_detached() {
    let ctx = context(StubRunner::new().fail(HEAD, 1, ""));
    assert!(matches!(
        run_query(&Command::Current, &ctx),
        Err(RefsError::NotOnBranch)
    ));
}

#[test]
fn test_run_remote_branches() {
    let ctx = context(StubRunner::new().respond(
        &["for-each-ref", "--sort=refname", REF_FORMAT, "refs/remotes"],
        "refs/remotes/origin/HEAD\t1700000000\trefs/remotes/origin/main\n\
         refs/remotes/origin/main\t1700000000\t\n",
    ));
    let command = Command::Branches(BranchesArgs { remote: true });
    assert_eq!(
        run_query(&command, &ctx).unwrap(),
        Some(QueryOutput::List(vec!["origin/main".to_string()]))
    );
}

#[test]
fn test_run_refs_split_and_combined() {
    let runner = StubRunner::new().respond(
        &[
            "for-each-ref",
            "--sort=refname",
            REF_FORMAT,
            "refs/heads",
            "refs/remotes",
            "refs/tags",
        ],
        "refs/heads/main\t1700000000\n\
         refs/remotes/origin/main\t1700000000\n\
         refs/tags/v1\t1700000000\n\
         refs/tags/v2\t1700000100\n",
    );
    let ctx = context(runner);

    let split = run_query(&Command::Refs(RefsArgs { split: true }), &ctx).unwrap();
    assert_eq!(
        split,
        Some(QueryOutput::Refs(RefSet {
            local: vec!["main".to_string()],
            remote: vec!["origin/main".to_string()],
            tags: vec!["v2".to_string(), "v1".to_string()],
        }))
    );

    let combined = run_query(&Command::Refs(RefsArgs { split: false }), &ctx).unwrap();
    assert_eq!(
        combined,
        Some(QueryOutput::List(vec![
            "main".to_string(),
            "origin/main".to_string(),
            "v2".to_string(),
            "v1".to_string(),
        ]))
    );
}

#[test]
fn test_run_tracked_explicit_branch() {
    let ctx = context(StubRunner::new().respond(
        CONFIG,
        "branch.topic.remote\nupstream\0branch.topic.merge\nrefs/heads/feature/x\0",
    ));
    let command = Command::Tracked(BranchArg {
        branch: Some("topic".to_string()),
    });
    assert_eq!(
        run_query(&command, &ctx).unwrap(),
        Some(QueryOutput::Scalar(Some("upstream/feature/x".to_string())))
    );
}

#[test]
fn test_run_upstream_unset_is_empty() {
    let ctx = context(
        StubRunner::new()
            .respond(HEAD, "refs/heads/main\n")
            .respond(CONFIG, "core.bare\nfalse\0"),
    );
    let output = run_query(&Command::Upstream(BranchArg::default()), &ctx)
        .unwrap()
        .unwrap();
    assert_eq!(output, QueryOutput::Scalar(None));
    assert_eq!(output.render(OutputFormat::Text).unwrap(), "");
}

#[test]
fn test_run_untracked() {
    let ctx = context(StubRunner::new().respond(
        &["ls-files", "-z", "--others", "--exclude-standard"],
        "C\0D\0E\0",
    ));
    assert_eq!(
        run_query(&Command::Untracked, &ctx).unwrap(),
        Some(QueryOutput::List(vec![
            "C".to_string(),
            "D".to_string(),
            "E".to_string(),
        ]))
    );
}

#[test]
fn test_settings_commands_are_not_queries() {
    let runner = Arc::new(StubRunner::new());
    let ctx = RepoContext::builder()
        .workdir("/work/repo")
        .runner(runner.clone())
        .build();

    assert_eq!(run_query(&Command::Options, &ctx).unwrap(), None);
    assert_eq!(run_query(&Command::ConfigFiles, &ctx).unwrap(), None);
    assert!(runner.calls().is_empty());
}

// gitrefs: branch, tag and tracked-ref queries over the git CLI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Branch, remote, tag and tracked-ref queries.
//!
//! ```text
//! current_branch     git symbolic-ref --quiet HEAD
//! branch_list        git for-each-ref refs/heads | refs/remotes
//! tag_list           git for-each-ref refs/tags
//! all_refs[_split]   git for-each-ref refs/heads refs/remotes refs/tags
//! remote_list        git remote
//! upstream_remote    config branch.<b>.remote
//! tracked_branch     config branch.<b>.remote + branch.<b>.merge
//! untracked_files    git ls-files --others --exclude-standard
//! all_files          git ls-files --cached --others --exclude-standard
//! merge_message_path <git-dir>/SQUASH_MSG | <git-dir>/MERGE_MSG
//! ```
//!
//! # Ordering
//!
//! - Local and remote branches: ascending by name (byte order, same as git's
//!   `refname` sort).
//! - Tags: newest creation date first; tags with the same creation second
//!   fall back to descending name, so tags created in the order `a, b, c`
//!   list as `c, b, a`.
//! - Combined refs: locals, then remotes, then tags.
//!
//! Every call re-runs git. Only configuration lookups go through the
//! context's [`GitConfig`](super::gitconfig::GitConfig) cache.

use bitflags::bitflags;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;
use tracing::debug;

use super::context::RepoContext;
use crate::error::{ParseError, RefsError, RefsResult};

const HEADS: &str = "refs/heads/";
const REMOTES: &str = "refs/remotes/";
const TAGS: &str = "refs/tags/";

pub(crate) const REF_FORMAT: &str = "--format=%(refname)%09%(creatordate:unix)%09%(symref)";

/// Merge message files, highest precedence first.
pub const MERGE_MESSAGE_CANDIDATES: [&str; 2] = ["SQUASH_MSG", "MERGE_MSG"];

/// Local branches, remote-tracking branches and tags from one enumeration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RefSet {
    pub local: Vec<String>,
    pub remote: Vec<String>,
    pub tags: Vec<String>,
}

impl RefSet {
    /// Locals, then remotes, then tags.
    #[must_use]
    pub fn into_combined(self) -> Vec<String> {
        let mut refs = self.local;
        refs.extend(self.remote);
        refs.extend(self.tags);
        refs
    }
}

/// The `branch.<name>.remote` / `branch.<name>.merge` pair of a local branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackingConfig {
    pub remote: String,
    pub merge: String,
}

bitflags! {
    /// File classes passed to `git ls-files`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FileSet: u8 {
        /// Files recorded in the index
        const CACHED = 0x01;
        /// Files not recorded in the index
        const OTHERS = 0x02;
        /// Apply .gitignore, info/exclude and core.excludesFile
        const EXCLUDE_STANDARD = 0x04;
    }
}

impl FileSet {
    fn ls_files_args(self) -> Vec<&'static str> {
        let mut args = vec!["ls-files", "-z"];
        if self.contains(Self::CACHED) {
            args.push("--cached");
        }
        if self.contains(Self::OTHERS) {
            args.push("--others");
        }
        if self.contains(Self::EXCLUDE_STANDARD) {
            args.push("--exclude-standard");
        }
        args
    }
}

// --- HEAD ---

/// Name of the checked-out branch.
///
/// # Errors
///
/// Returns [`RefsError::NotOnBranch`] when HEAD is detached, or a
/// `CommandError` if git fails.
pub fn current_branch(ctx: &RepoContext) -> RefsResult<String> {
    head_branch(ctx)?.ok_or(RefsError::NotOnBranch)
}

/// Name of the checked-out branch, `None` when HEAD is detached.
///
/// Works on an unborn branch, so a freshly initialized repository reports
/// its initial branch.
///
/// # Errors
///
/// Returns a `CommandError` if git fails for any other reason.
pub fn head_branch(ctx: &RepoContext) -> RefsResult<Option<String>> {
    match ctx.git(["symbolic-ref", "--quiet", "HEAD"]) {
        Ok(out) => {
            let target = out.trim_end();
            match target.strip_prefix(HEADS) {
                Some(branch) if !branch.is_empty() => Ok(Some(branch.to_string())),
                _ => Err(ParseError::UnexpectedOutput {
                    command: "git symbolic-ref --quiet HEAD".to_string(),
                    output: target.to_string(),
                }
                .into()),
            }
        }
        // --quiet turns "not a symbolic ref" into a bare exit status 1
        Err(err) if err.exit_code() == Some(1) => {
            debug!("HEAD is detached");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

// --- Enumeration ---

struct RefEntry {
    refname: String,
    created: Option<i64>,
    symbolic: bool,
}

fn parse_ref_lines(output: &str) -> RefsResult<Vec<RefEntry>> {
    output
        .lines()
        .filter(|line| !line.is_empty())
        .map(|line| {
            let mut fields = line.splitn(3, '\t');
            let (Some(refname), Some(date)) = (fields.next(), fields.next()) else {
                return Err(ParseError::UnexpectedOutput {
                    command: "git for-each-ref".to_string(),
                    output: line.to_string(),
                }
                .into());
            };
            // Tags pointing at trees or blobs have no creation date
            let created = if date.is_empty() {
                None
            } else {
                Some(date.parse::<i64>().map_err(|_| ParseError::InvalidTimestamp {
                    refname: refname.to_string(),
                    value: date.to_string(),
                })?)
            };
            let symbolic = fields.next().is_some_and(|target| !target.is_empty());
            Ok(RefEntry {
                refname: refname.to_string(),
                created,
                symbolic,
            })
        })
        .collect()
}

/// Split `for-each-ref` entries into the three namespaces and apply the
/// documented ordering.
fn partition_refs(entries: Vec<RefEntry>) -> RefsResult<RefSet> {
    let mut set = RefSet::default();
    let mut tags = Vec::new();

    for entry in entries {
        if let Some(name) = entry.refname.strip_prefix(HEADS) {
            set.local.push(name.to_string());
        } else if let Some(name) = entry.refname.strip_prefix(REMOTES) {
            // refs/remotes/<remote>/HEAD is a symref to one of the others
            if !entry.symbolic {
                set.remote.push(name.to_string());
            }
        } else if let Some(name) = entry.refname.strip_prefix(TAGS) {
            tags.push((name.to_string(), entry.created));
        } else {
            return Err(ParseError::UnexpectedRef {
                refname: entry.refname,
            }
            .into());
        }
    }

    set.local.sort_unstable();
    set.remote.sort_unstable();
    tags.sort_unstable_by(|(a_name, a_created), (b_name, b_created)| {
        b_created.cmp(a_created).then_with(|| b_name.cmp(a_name))
    });
    set.tags = tags.into_iter().map(|(name, _)| name).collect();
    Ok(set)
}

fn for_each_ref(ctx: &RepoContext, prefixes: &[&str]) -> RefsResult<RefSet> {
    let mut args = vec!["for-each-ref", "--sort=refname", REF_FORMAT];
    args.extend(prefixes.iter().map(|prefix| prefix.trim_end_matches('/')));
    let out = ctx.git(args)?;
    let set = partition_refs(parse_ref_lines(&out)?)?;
    debug!(
        local = set.local.len(),
        remote = set.remote.len(),
        tags = set.tags.len(),
        "enumerated refs"
    );
    Ok(set)
}

/// Local branches (`remote = false`) or remote-tracking branches as
/// `<remote>/<branch>` (`remote = true`). Empty when there are none.
///
/// # Errors
///
/// Returns an error if git fails or prints unexpected output.
pub fn branch_list(ctx: &RepoContext, remote: bool) -> RefsResult<Vec<String>> {
    if remote {
        Ok(for_each_ref(ctx, &[REMOTES])?.remote)
    } else {
        Ok(for_each_ref(ctx, &[HEADS])?.local)
    }
}

/// All tags, most recently created first.
///
/// Creation dates have one-second resolution. Tags created within the same
/// second are listed in descending name order, which need not match the
/// order they were created in.
///
/// # Errors
///
/// Returns an error if git fails or prints unexpected output.
pub fn tag_list(ctx: &RepoContext) -> RefsResult<Vec<String>> {
    Ok(for_each_ref(ctx, &[TAGS])?.tags)
}

/// Local branches, remote branches and tags as three lists.
///
/// # Errors
///
/// Returns an error if git fails or prints unexpected output.
pub fn all_refs_split(ctx: &RepoContext) -> RefsResult<RefSet> {
    for_each_ref(ctx, &[HEADS, REMOTES, TAGS])
}

/// Local branches, then remote branches, then tags, in one list.
///
/// # Errors
///
/// Returns an error if git fails or prints unexpected output.
pub fn all_refs(ctx: &RepoContext) -> RefsResult<Vec<String>> {
    Ok(all_refs_split(ctx)?.into_combined())
}

/// Configured remote names, sorted.
///
/// # Errors
///
/// Returns an error if git fails.
pub fn remote_list(ctx: &RepoContext) -> RefsResult<Vec<String>> {
    let out = ctx.git(["remote"])?;
    let mut remotes: Vec<String> = out
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToString::to_string)
        .collect();
    remotes.sort_unstable();
    Ok(remotes)
}

// --- Tracking ---

fn resolve_branch(ctx: &RepoContext, branch: Option<&str>) -> RefsResult<Option<String>> {
    match branch {
        Some(branch) => Ok(Some(branch.to_string())),
        None => head_branch(ctx),
    }
}

fn branch_setting(ctx: &RepoContext, branch: &str, variable: &str) -> RefsResult<Option<String>> {
    Ok(ctx
        .cfg()
        .get(&format!("branch.{branch}.{variable}"))?
        .filter(|value| !value.is_empty()))
}

/// The `branch.<branch>.remote` setting of `branch` (default: the current
/// branch). `None` when unset or when HEAD is detached.
///
/// Reads the context's configuration cache; call `ctx.cfg().reset()` after
/// changing configuration outside this crate.
///
/// # Errors
///
/// Returns an error if HEAD or the configuration cannot be read.
pub fn upstream_remote(ctx: &RepoContext, branch: Option<&str>) -> RefsResult<Option<String>> {
    let Some(branch) = resolve_branch(ctx, branch)? else {
        return Ok(None);
    };
    branch_setting(ctx, &branch, "remote")
}

/// Raw tracking configuration of a local branch. `None` unless both the
/// remote and the merge ref are set.
///
/// # Errors
///
/// Returns an error if the configuration cannot be read.
pub fn tracking_config(ctx: &RepoContext, branch: &str) -> RefsResult<Option<TrackingConfig>> {
    let Some(remote) = branch_setting(ctx, branch, "remote")? else {
        return Ok(None);
    };
    let Some(merge) = branch_setting(ctx, branch, "merge")? else {
        return Ok(None);
    };
    Ok(Some(TrackingConfig { remote, merge }))
}

/// Remote-qualified name of the branch `branch` (default: the current
/// branch) integrates with, e.g. `origin/master`.
///
/// A remote of `.` means the upstream is a local branch and yields its bare
/// name. `None` when tracking is not configured, the merge ref is not a
/// branch, or HEAD is detached.
///
/// # Errors
///
/// Returns an error if HEAD or the configuration cannot be read.
pub fn tracked_branch(ctx: &RepoContext, branch: Option<&str>) -> RefsResult<Option<String>> {
    let Some(branch) = resolve_branch(ctx, branch)? else {
        return Ok(None);
    };
    let Some(TrackingConfig { remote, merge }) = tracking_config(ctx, &branch)? else {
        return Ok(None);
    };
    let Some(upstream) = merge.strip_prefix(HEADS) else {
        debug!(%branch, %merge, "merge ref is not a branch");
        return Ok(None);
    };
    if remote == "." {
        return Ok(Some(upstream.to_string()));
    }
    Ok(Some(format!("{remote}/{upstream}")))
}

// --- Work tree ---

fn ls_files(ctx: &RepoContext, set: FileSet) -> RefsResult<Vec<String>> {
    let out = ctx.git(set.ls_files_args())?;
    Ok(out
        .split('\0')
        .filter(|path| !path.is_empty())
        .map(ToString::to_string)
        .collect())
}

/// Untracked, non-ignored files, relative to the context's working
/// directory, in git's (path-sorted) order.
///
/// # Errors
///
/// Returns an error if git fails.
pub fn untracked_files(ctx: &RepoContext) -> RefsResult<Vec<String>> {
    ls_files(ctx, FileSet::OTHERS | FileSet::EXCLUDE_STANDARD)
}

/// Every tracked path plus every untracked, non-ignored path.
///
/// # Errors
///
/// Returns an error if git fails.
pub fn all_files(ctx: &RepoContext) -> RefsResult<BTreeSet<String>> {
    Ok(ls_files(ctx, FileSet::CACHED | FileSet::OTHERS | FileSet::EXCLUDE_STANDARD)?
        .into_iter()
        .collect())
}

/// Absolute path of the pending merge message: `SQUASH_MSG` if present,
/// otherwise `MERGE_MSG`, otherwise `None`.
///
/// Both the metadata directory and the files are checked on every call.
/// Files created or removed concurrently are seen as of the check.
///
/// # Errors
///
/// Returns an error if the metadata directory cannot be resolved.
pub fn merge_message_path(ctx: &RepoContext) -> RefsResult<Option<PathBuf>> {
    let git_dir = ctx.git_dir()?;
    Ok(MERGE_MESSAGE_CANDIDATES
        .iter()
        .map(|name| git_dir.join(name))
        .find(|path| path.exists()))
}

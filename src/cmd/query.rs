// gitrefs: branch, tag and tracked-ref queries over the git CLI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Query commands: run one ref query and render its answer.
//!
//! ```text
//! Command --> run_query(ctx) --> QueryOutput --> render(format) --> stdout
//!                                 List   | one item per line / JSON array
//!                                 Scalar | one line or nothing / JSON value or null
//!                                 Refs   | [local] [remote] [tags] / JSON object
//! ```

use serde::Serialize;

use crate::cli::Command;
use crate::config::OutputFormat;
use crate::error::{RefsResult, Result};
use crate::git::context::RepoContext;
use crate::git::refs::{self, RefSet};

/// Answer to a single query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum QueryOutput {
    /// Ordered list of names or paths.
    List(Vec<String>),
    /// A single optional value.
    Scalar(Option<String>),
    /// Refs grouped by kind.
    Refs(RefSet),
}

impl QueryOutput {
    /// Render for stdout. Text output ends with a newline unless empty.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Json => {
                let mut out = serde_json::to_string_pretty(self)?;
                out.push('\n');
                Ok(out)
            }
            OutputFormat::Text => Ok(self.render_text()),
        }
    }

    fn render_text(&self) -> String {
        let mut out = String::new();
        match self {
            Self::List(items) => push_lines(&mut out, items),
            Self::Scalar(Some(value)) => {
                out.push_str(value);
                out.push('\n');
            }
            Self::Scalar(None) => {}
            Self::Refs(set) => {
                for (heading, items) in [
                    ("local", &set.local),
                    ("remote", &set.remote),
                    ("tags", &set.tags),
                ] {
                    out.push('[');
                    out.push_str(heading);
                    out.push_str("]\n");
                    push_lines(&mut out, items);
                }
            }
        }
        out
    }
}

fn push_lines(out: &mut String, items: &[String]) {
    for item in items {
        out.push_str(item);
        out.push('\n');
    }
}

/// Run the query named by `command`. Returns `None` for commands that are
/// not repository queries.
///
/// # Errors
///
/// Returns the `RefsError` of the underlying query.
pub fn run_query(command: &Command, ctx: &RepoContext) -> RefsResult<Option<QueryOutput>> {
    let output = match command {
        Command::Current => QueryOutput::Scalar(Some(refs::current_branch(ctx)?)),
        Command::Branches(args) => QueryOutput::List(refs::branch_list(ctx, args.remote)?),
        Command::Remotes => QueryOutput::List(refs::remote_list(ctx)?),
        Command::Tags => QueryOutput::List(refs::tag_list(ctx)?),
        Command::Refs(args) if args.split => QueryOutput::Refs(refs::all_refs_split(ctx)?),
        Command::Refs(_) => QueryOutput::List(refs::all_refs(ctx)?),
        Command::Upstream(arg) => {
            QueryOutput::Scalar(refs::upstream_remote(ctx, arg.branch.as_deref())?)
        }
        Command::Tracked(arg) => {
            QueryOutput::Scalar(refs::tracked_branch(ctx, arg.branch.as_deref())?)
        }
        Command::Untracked => QueryOutput::List(refs::untracked_files(ctx)?),
        Command::Files => QueryOutput::List(refs::all_files(ctx)?.into_iter().collect()),
        Command::MergeMsg => QueryOutput::Scalar(
            refs::merge_message_path(ctx)?.map(|path| path.display().to_string()),
        ),
        Command::Options | Command::ConfigFiles => return Ok(None),
    };
    Ok(Some(output))
}

// gitrefs: branch, tag and tracked-ref queries over the git CLI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for gitrefs using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! gitrefs [global options] <command>
//! current
//! branches [--remote]
//! remotes
//! tags
//! refs [--split]
//! upstream [BRANCH]
//! tracked [BRANCH]
//! untracked
//! files
//! merge-msg
//! options
//! config-files
//! ```

pub mod global;


use crate::cli::global::GlobalOptions;
use clap::{Args, Parser, Subcommand};

/// Branch, tag and tracked-ref queries over the git CLI.
#[derive(Debug, Parser)]
#[command(
    name = "gitrefs",
    author,
    version,
    about = "Branch, tag and tracked-ref queries",
    long_about = "gitrefs Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Answers read-only questions about a git repository: the current\n\
                  branch, local and remote branches, tags, upstream tracking, and\n\
                  untracked files. Every answer is computed from a fresh git call.",
    after_help = "SETTINGS:\n\n\
                  gitrefs reads `gitrefs.toml` from the current directory when it\n\
                  exists, then every file given with --config, then GITREFS_*\n\
                  environment variables (GITREFS_LOG_LEVEL=4 sets log.level).\n\
                  Command-line flags override all of them."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Prints the checked-out branch; fails on a detached HEAD.
    Current,

    /// Lists local branches, or remote-tracking branches with --remote.
    Branches(BranchesArgs),

    /// Lists configured remotes.
    Remotes,

    /// Lists tags, newest first.
    Tags,

    /// Lists local branches, remote branches and tags.
    Refs(RefsArgs),

    /// Prints the remote a branch pulls from.
    Upstream(BranchArg),

    /// Prints the `remote/branch` a branch tracks.
    Tracked(BranchArg),

    /// Lists untracked, non-ignored files.
    Untracked,

    /// Lists tracked and untracked files.
    Files,

    /// Prints the path of a pending squash or merge message.
    #[command(name = "merge-msg")]
    MergeMsg,

    /// Lists all settings and their values.
    Options,

    /// Lists the settings files that were loaded.
    #[command(name = "config-files")]
    ConfigFiles,
}

/// Arguments for `branches`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Args)]
pub struct BranchesArgs {
    /// List remote-tracking branches instead of local ones.
    #[arg(short, long)]
    pub remote: bool,
}

/// Arguments for `refs`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Args)]
pub struct RefsArgs {
    /// Print the three groups separately.
    #[arg(short, long)]
    pub split: bool,
}

/// Optional branch name, defaulting to the current branch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Args)]
pub struct BranchArg {
    /// Branch to inspect (default: current branch)
    #[arg(value_name = "BRANCH")]
    pub branch: Option<String>,
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

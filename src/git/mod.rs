// gitrefs: branch, tag and tracked-ref queries over the git CLI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git query module.
//!
//! ```text
//!             refs.rs (public API)
//!   current_branch  branch_list  tag_list
//!   all_refs  tracked_branch  merge_message_path ...
//!                     |
//!                     v
//!        ,-------------------------,
//!        |       RepoContext       |
//!        |  workdir + env + cfg    |
//!        '----+---------------+----'
//!             |               |
//!             v               v
//!        GitInvoker       GitConfig
//!             |        (config -z --list,
//!             v          reset() to reload)
//!      GitRunner (trait)
//!        |          |
//!        v          v
//!  ShellBackend  StubRunner
//!   (git CLI)    (canned)
//! ```
//!
//! All queries are read-only and synchronous: one git invocation per call.

pub mod backend;
pub mod context;
pub mod gitconfig;
pub mod refs;

// gitrefs: branch, tag and tracked-ref queries over the git CLI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command implementations.
//!
//! ```text
//! CLI args --> cmd::run_* handlers
//!   query  (current, branches, tags, refs, tracked, ...)
//!   config (options, config-files)
//! ```

pub mod config;
pub mod query;

#[cfg(test)]
mod tests;

// gitrefs: branch, tag and tracked-ref queries over the git CLI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Global CLI options available for all commands.
//!
//! # Option Precedence
//!
//! ```text
//! -C/--repo DIR      ← Repository to query (default: cwd)
//! -c/--config FILE   ← Additional settings files (can repeat)
//! --no-default-config← Skip ./gitrefs.toml
//! -l/--log-level N   ← Console verbosity (0-5)
//! --log-file FILE    ← Also log to FILE
//! --json             ← output.format = json
//!
//! Precedence: CLI flags > GITREFS_* > --config > gitrefs.toml > defaults
//! ```

use clap::Args;
use std::path::PathBuf;

/// Global options available for all commands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Args)]
pub struct GlobalOptions {
    /// Run as if started in DIR.
    #[arg(short = 'C', long = "repo", value_name = "DIR", global = true)]
    pub repo: Option<PathBuf>,

    /// Path to additional TOML settings file(s).
    /// Can be specified multiple times.
    #[arg(short = 'c', long = "config", value_name = "FILE", action = clap::ArgAction::Append, global = true)]
    pub configs: Vec<PathBuf>,

    /// Do not load `gitrefs.toml` from the current directory.
    #[arg(long = "no-default-config", global = true)]
    pub no_default_config: bool,

    /// Console log level (0=silent, 1=errors, 2=warnings, 3=info, 4=debug, 5=trace).
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", global = true,
        value_parser = clap::value_parser!(u8).range(0..=5)
    )]
    pub log_level: Option<u8>,

    /// Path to log file.
    #[arg(long = "log-file", value_name = "FILE", global = true)]
    pub log_file: Option<PathBuf>,

    /// Print results as JSON.
    #[arg(long, global = true)]
    pub json: bool,
}

impl GlobalOptions {
    /// Converts command-line options to `(key, value)` settings overrides.
    #[must_use]
    pub fn to_overrides(&self) -> Vec<(&'static str, config::Value)> {
        let mut overrides = Vec::new();

        if let Some(level) = self.log_level {
            overrides.push(("log.level", i64::from(level).into()));
        }

        if let Some(ref path) = self.log_file {
            overrides.push(("log.file", path.display().to_string().into()));
        }

        if self.json {
            overrides.push(("output.format", "json".into()));
        }

        overrides
    }
}

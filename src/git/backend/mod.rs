// gitrefs: branch, tag and tracked-ref queries over the git CLI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git command execution layer.
//!
//! ```text
//! GitRequest { args, cwd, env }
//!        |
//!        v
//!   GitRunner (trait)
//!    |            |
//!    v            v
//! ShellBackend  StubRunner
//! (git CLI)     (canned output, tests)
//!    |
//!    v
//! stdout as text | CommandError
//! ```

mod stub;

pub use stub::StubRunner;

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, trace};

use crate::error::{CommandError, RefsResult};

/// Variables set on every git invocation, before the caller's environment.
const DEFAULT_ENV: [(&str, &str); 3] = [
    ("GCM_INTERACTIVE", "never"),
    ("GIT_TERMINAL_PROMPT", "0"),
    ("LC_ALL", "C"),
];

/// A single git invocation: arguments, working directory and extra environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitRequest {
    args: Vec<String>,
    cwd: PathBuf,
    env: BTreeMap<String, String>,
}

impl GitRequest {
    pub fn new<I, S>(args: I, cwd: impl Into<PathBuf>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            cwd: cwd.into(),
            env: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_env(mut self, env: &BTreeMap<String, String>) -> Self {
        self.env.extend(env.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    #[must_use]
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    #[must_use]
    pub const fn env(&self) -> &BTreeMap<String, String> {
        &self.env
    }
}

impl fmt::Display for GitRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "git")?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Runs git subcommands and returns their standard output.
///
/// Implementations must return the raw, untrimmed stdout on success and a
/// [`CommandError`] on spawn failure or non-zero exit.
pub trait GitRunner: fmt::Debug + Send + Sync {
    /// Execute one git invocation.
    ///
    /// # Errors
    ///
    /// Returns a `CommandError` if git cannot be started or exits non-zero.
    fn run(&self, request: &GitRequest) -> RefsResult<String>;
}

/// Git backend that spawns the real git executable.
#[derive(Debug, Clone)]
pub struct ShellBackend {
    executable: PathBuf,
}

impl ShellBackend {
    /// Find `git` in PATH.
    ///
    /// # Errors
    ///
    /// Returns `CommandError::ExecutableNotFound` if no git executable is on PATH.
    pub fn locate() -> RefsResult<Self> {
        let executable = which::which("git").map_err(|_| CommandError::ExecutableNotFound {
            name: "git".to_string(),
        })?;
        debug!(git = %executable.display(), "located git executable");
        Ok(Self { executable })
    }

    /// Use an explicit git executable. Existence is checked on the first run.
    pub fn with_executable(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    #[must_use]
    pub fn executable(&self) -> &Path {
        &self.executable
    }
}

impl GitRunner for ShellBackend {
    fn run(&self, request: &GitRequest) -> RefsResult<String> {
        debug!(command = %request, cwd = %request.cwd().display(), "running git");

        let output = Command::new(&self.executable)
            .args(request.args())
            .current_dir(request.cwd())
            .envs(DEFAULT_ENV)
            .envs(request.env())
            .output()
            .map_err(|source| {
                // A missing cwd is also reported as NotFound
                if source.kind() == std::io::ErrorKind::NotFound && request.cwd().is_dir() {
                    CommandError::ExecutableNotFound {
                        name: self.executable.display().to_string(),
                    }
                } else {
                    CommandError::SpawnFailed {
                        command: request.to_string(),
                        source,
                    }
                }
            })?;

        if !output.status.success() {
            return Err(CommandError::NonZeroExit {
                command: request.to_string(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }

        trace!(command = %request, bytes = output.stdout.len(), "git output");
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests;

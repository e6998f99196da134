// gitrefs: branch, tag and tracked-ref queries over the git CLI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!             RefsError (8 bytes)
//!                     |
//!   +--------+--------+--------+
//!   |        |        |        |
//!   v        v        v        v
//! Command NotOnBranch Parse  Config
//!   Box     (unit)    Box     Box
//!
//! Sub-errors:
//!   Command  ExecutableNotFound, SpawnFailed, NonZeroExit
//!   Parse    UnexpectedRef, InvalidTimestamp, MalformedConfigEntry,
//!            UnexpectedOutput
//!   Config   ParseError, InvalidValue, NotFound
//! ```

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`RefsError`].
pub type RefsResult<T> = std::result::Result<T, RefsError>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum RefsError {
    /// A git invocation failed or could not be started.
    #[error("git command error: {0}")]
    Command(#[from] Box<CommandError>),

    /// HEAD does not point at a named branch.
    #[error("HEAD is detached (not on a branch)")]
    NotOnBranch,

    /// Git printed something the parser did not expect.
    #[error("parse error: {0}")]
    Parse(#[from] Box<ParseError>),

    /// Application settings error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),
}

impl RefsError {
    /// Returns the exit code of a failed git invocation, if this is one.
    #[must_use]
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::Command(err) => match err.as_ref() {
                CommandError::NonZeroExit { code, .. } => *code,
                _ => None,
            },
            _ => None,
        }
    }
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for RefsError {
                fn from(err: $error) -> Self {
                    RefsError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    CommandError => Command,
    ParseError => Parse,
    ConfigError => Config,
}

// --- Command Errors ---

/// Failures of the external git executable.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Executable not found in PATH.
    #[error("executable not found: '{name}' (not in PATH)")]
    ExecutableNotFound { name: String },

    /// Failed to spawn the process.
    #[error("failed to spawn '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Process exited with a non-zero status (`code` is `None` when killed by a signal).
    #[error("'{command}' exited with {}: {stderr}", exit_label(.code))]
    NonZeroExit {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
}

#[allow(clippy::ref_option)]
fn exit_label(code: &Option<i32>) -> String {
    code.map_or_else(|| "signal".to_string(), |c| format!("code {c}"))
}

// --- Parse Errors ---

/// Unexpected git output.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A ref outside the namespaces that were queried.
    #[error("unexpected ref in for-each-ref output: {refname}")]
    UnexpectedRef { refname: String },

    /// A creation timestamp that is not a unix epoch value.
    #[error("invalid creation date '{value}' for {refname}")]
    InvalidTimestamp { refname: String, value: String },

    /// A `git config -z --list` entry without a key.
    #[error("malformed config entry: {entry:?}")]
    MalformedConfigEntry { entry: String },

    /// Output of the wrong shape for the command.
    #[error("unexpected output from '{command}': {output:?}")]
    UnexpectedOutput { command: String, output: String },
}

// --- Config Errors ---

/// Application settings errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse a settings source.
    #[error("failed to parse settings '{path}': {message}")]
    ParseError { path: String, message: String },

    /// Invalid settings value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },

    /// Settings file not found.
    #[error("settings file not found: {0}")]
    NotFound(String),
}

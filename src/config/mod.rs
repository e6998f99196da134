// gitrefs: branch, tag and tracked-ref queries over the git CLI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Application settings for the `gitrefs` binary.
//!
//! # Settings Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. gitrefs.toml (cwd, optional)
//! 3. --config FILE (repeatable)
//! 4. GITREFS_* env vars
//! 5. CLI overrides
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! GITREFS_LOG_LEVEL=4            → log.level = 4
//! GITREFS_GIT_EXECUTABLE=/bin/git → git.executable = "/bin/git"
//! GITREFS_OUTPUT_FORMAT=json     → output.format = "json"
//! ```
//!
//! # Example
//!
//! ```toml
//! [git]
//! executable = "/usr/local/bin/git"
//!
//! [git.env]
//! GIT_CONFIG_NOSYSTEM = "1"
//!
//! [log]
//! level = 4
//! file = "logs/gitrefs.log"
//!
//! [output]
//! format = "json"
//! ```

pub mod loader;


use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{ConfigError, RefsResult, Result};
use crate::git::backend::{GitRunner, ShellBackend};
use crate::logging::LogLevel;

use loader::SettingsLoader;

/// Complete application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// How git is invoked.
    pub git: GitSettings,
    /// Logging options.
    pub log: LogSettings,
    /// Output options.
    pub output: OutputSettings,
}

/// `[git]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GitSettings {
    /// Explicit git executable; PATH lookup when unset.
    pub executable: Option<PathBuf>,
    /// Extra environment for every git invocation.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,
}

/// `[log]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogSettings {
    pub level: LogLevel,
    pub file: Option<PathBuf>,
}

/// `[output]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSettings {
    pub format: OutputFormat,
}

/// Rendering of query results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One item per line.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

impl Settings {
    /// Create a new settings loader.
    #[must_use]
    pub fn builder() -> SettingsLoader {
        SettingsLoader::new()
    }

    /// Load settings from a single TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, is not valid TOML, or does
    /// not match the `Settings` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load settings from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match
    /// the `Settings` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Reject values that deserialize but cannot work.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for an empty executable path or
    /// an empty environment variable name.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self
            .git
            .executable
            .as_ref()
            .is_some_and(|exe| exe.as_os_str().is_empty())
        {
            return Err(ConfigError::InvalidValue {
                section: "git".to_string(),
                key: "executable".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if self.git.env.keys().any(|name| name.is_empty() || name.contains('=')) {
            return Err(ConfigError::InvalidValue {
                section: "git.env".to_string(),
                key: "<name>".to_string(),
                message: "variable names must be non-empty and contain no '='".to_string(),
            });
        }
        Ok(())
    }

    /// The runner these settings describe.
    ///
    /// # Errors
    ///
    /// Returns `CommandError::ExecutableNotFound` when no executable is
    /// configured and git is not on PATH.
    pub fn runner(&self) -> RefsResult<Arc<dyn GitRunner>> {
        let backend = match &self.git.executable {
            Some(exe) => ShellBackend::with_executable(exe),
            None => ShellBackend::locate()?,
        };
        Ok(Arc::new(backend))
    }

    /// Format settings for display, one `key = value` per line, sorted.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();
        options.insert(
            "git.executable".to_string(),
            self.git
                .executable
                .as_ref()
                .map_or_else(|| "<PATH>".to_string(), |exe| exe.display().to_string()),
        );
        for (name, value) in &self.git.env {
            options.insert(format!("git.env.{name}"), value.clone());
        }
        options.insert("log.level".to_string(), self.log.level.as_u8().to_string());
        if let Some(file) = &self.log.file {
            options.insert("log.file".to_string(), file.display().to_string());
        }
        options.insert(
            "output.format".to_string(),
            match self.output.format {
                OutputFormat::Text => "text",
                OutputFormat::Json => "json",
            }
            .to_string(),
        );

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);
        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }
}

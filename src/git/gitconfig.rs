// gitrefs: branch, tag and tracked-ref queries over the git CLI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Read-only view of the repository configuration.
//!
//! ```text
//! get(key) --> snapshot? --no--> git config -z --list --> parse --> cache
//!                  |
//!                 yes --> lookup
//! reset()  --> drop snapshot (next get re-reads)
//! ```
//!
//! Section and variable names are case-insensitive, subsection names are not,
//! matching git's own key rules.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, warn};

use super::context::GitInvoker;
use crate::error::{ParseError, RefsResult};

/// Parsed `git config --list` output.
///
/// A key maps to every value it was given, in file order. `None` is a key
/// written without `=` (an implicit boolean true).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigSnapshot {
    entries: BTreeMap<String, Vec<Option<String>>>,
}

impl ConfigSnapshot {
    /// Parse NUL-separated `git config -z --list` output.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::MalformedConfigEntry` for an entry with an empty key.
    pub fn parse(output: &str) -> RefsResult<Self> {
        let mut entries: BTreeMap<String, Vec<Option<String>>> = BTreeMap::new();
        for entry in output.split('\0').filter(|e| !e.is_empty()) {
            let (key, value) = match entry.split_once('\n') {
                Some((key, value)) => (key, Some(value.to_string())),
                None => (entry, None),
            };
            if key.is_empty() || !key.contains('.') {
                return Err(ParseError::MalformedConfigEntry {
                    entry: entry.to_string(),
                }
                .into());
            }
            entries.entry(normalize_key(key)).or_default().push(value);
        }
        Ok(Self { entries })
    }

    /// Last value of `key`. A valueless key reads as an empty string.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.entries
            .get(&normalize_key(key))
            .and_then(|values| values.last())
            .map(|value| value.clone().unwrap_or_default())
    }

    /// Every value of a multi-valued key, in file order.
    #[must_use]
    pub fn get_all(&self, key: &str) -> Vec<String> {
        self.entries
            .get(&normalize_key(key))
            .map(|values| {
                values
                    .iter()
                    .map(|value| value.clone().unwrap_or_default())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Last value of `key` read as a git boolean.
    #[must_use]
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        let value = self.entries.get(&normalize_key(key))?.last()?;
        let Some(value) = value else {
            return Some(true);
        };
        match value.to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(true),
            "false" | "no" | "off" | "0" | "" => Some(false),
            other => {
                warn!(key, value = other, "ignoring non-boolean config value");
                None
            }
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Lowercase the section and variable name, keep the subsection as is.
fn normalize_key(key: &str) -> String {
    let Some((section, rest)) = key.split_once('.') else {
        return key.to_ascii_lowercase();
    };
    match rest.rsplit_once('.') {
        Some((subsection, variable)) => format!(
            "{}.{subsection}.{}",
            section.to_ascii_lowercase(),
            variable.to_ascii_lowercase()
        ),
        None => key.to_ascii_lowercase(),
    }
}

/// Lazily loaded configuration store. Call [`GitConfig::reset`] after the
/// configuration changes on disk; nothing is re-read automatically.
#[derive(Debug)]
pub struct GitConfig {
    git: GitInvoker,
    snapshot: RwLock<Option<Arc<ConfigSnapshot>>>,
}

impl GitConfig {
    pub(crate) const fn new(git: GitInvoker) -> Self {
        Self {
            git,
            snapshot: RwLock::new(None),
        }
    }

    /// Current snapshot, loading it on first use after construction or reset.
    ///
    /// # Errors
    ///
    /// Returns an error if `git config` fails or prints malformed output.
    pub fn snapshot(&self) -> RefsResult<Arc<ConfigSnapshot>> {
        if let Some(snapshot) = self
            .snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            return Ok(Arc::clone(snapshot));
        }

        let output = self.git.run(["config", "-z", "--list"])?;
        let snapshot = Arc::new(ConfigSnapshot::parse(&output)?);
        debug!(keys = snapshot.len(), "loaded git config");
        *self
            .snapshot
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&snapshot));
        Ok(snapshot)
    }

    /// Value of `key`, or `None` when unset.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded.
    pub fn get(&self, key: &str) -> RefsResult<Option<String>> {
        Ok(self.snapshot()?.get(key))
    }

    /// Every value of `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded.
    pub fn get_all(&self, key: &str) -> RefsResult<Vec<String>> {
        Ok(self.snapshot()?.get_all(key))
    }

    /// Value of `key` as a boolean, or `None` when unset or not a boolean.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded.
    pub fn get_bool(&self, key: &str) -> RefsResult<Option<bool>> {
        Ok(self.snapshot()?.get_bool(key))
    }

    /// Forget the cached snapshot.
    pub fn reset(&self) {
        debug!("resetting git config cache");
        *self
            .snapshot
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigSnapshot, normalize_key};
    use crate::error::RefsError;
    use crate::git::backend::StubRunner;
    use crate::git::context::RepoContext;
    use std::sync::Arc;

    const LIST: &[&str] = &["config", "-z", "--list"];

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("Core.FileMode"), "core.filemode");
        assert_eq!(normalize_key("Branch.Feature/X.Remote"), "branch.Feature/X.remote");
        assert_eq!(normalize_key("remote.my.fork.URL"), "remote.my.fork.url");
    }

    #[test]
    fn test_parse_list_output() {
        let snapshot = ConfigSnapshot::parse(
            "core.bare\nfalse\0branch.master.remote\norigin\0\
             remote.origin.fetch\n+refs/heads/*:refs/remotes/origin/*\0\
             remote.origin.fetch\n+refs/tags/*:refs/tags/*\0core.sparse\0",
        )
        .unwrap();

        assert_eq!(snapshot.len(), 4);
        assert_eq!(snapshot.get("branch.master.remote").as_deref(), Some("origin"));
        assert_eq!(snapshot.get("BRANCH.master.REMOTE").as_deref(), Some("origin"));
        assert_eq!(snapshot.get("branch.Master.remote"), None);
        assert_eq!(
            snapshot.get("remote.origin.fetch").as_deref(),
            Some("+refs/tags/*:refs/tags/*")
        );
        assert_eq!(snapshot.get_all("remote.origin.fetch").len(), 2);
        assert_eq!(snapshot.get_bool("core.bare"), Some(false));
        assert_eq!(snapshot.get_bool("core.sparse"), Some(true));
        assert_eq!(snapshot.get("core.sparse").as_deref(), Some(""));
        assert_eq!(snapshot.get_bool("branch.master.remote"), None);
        assert_eq!(snapshot.get_bool("user.name"), None);
    }

    #[test]
    fn test_value_with_newlines() {
        let snapshot = ConfigSnapshot::parse("alias.multi\nline one\nline two\0").unwrap();
        assert_eq!(snapshot.get("alias.multi").as_deref(), Some("line one\nline two"));
    }

    #[test]
    fn test_malformed_entry_fails() {
        let err = ConfigSnapshot::parse("\nvalue-without-key\0").unwrap_err();
        assert!(matches!(err, RefsError::Parse(_)), "got {err:?}");
    }

    #[test]
    fn test_store_caches_until_reset() {
        let runner = Arc::new(
            StubRunner::new()
                .respond(LIST, "user.name\nA\0")
                .respond(LIST, "user.name\nB\0"),
        );
        let ctx = RepoContext::builder()
            .workdir("/repo")
            .runner(runner.clone())
            .build();

        assert_eq!(ctx.cfg().get("user.name").unwrap().as_deref(), Some("A"));
        assert_eq!(ctx.cfg().get("user.email").unwrap(), None);
        assert_eq!(runner.call_count(LIST), 1);

        ctx.cfg().reset();
        assert_eq!(ctx.cfg().get("user.name").unwrap().as_deref(), Some("B"));
        assert_eq!(runner.call_count(LIST), 2);
    }

    #[test]
    fn test_store_multi_valued_and_boolean_lookups() {
        let runner = Arc::new(StubRunner::new().respond(
            LIST,
            "remote.origin.fetch\n+refs/heads/*:refs/remotes/origin/*\0\
             remote.origin.fetch\n+refs/tags/*:refs/tags/*\0\
             core.bare\nfalse\0core.sparse\0",
        ));
        let ctx = RepoContext::builder()
            .workdir("/repo")
            .runner(runner.clone())
            .build();

        assert_eq!(
            ctx.cfg().get_all("Remote.origin.Fetch").unwrap(),
            ["+refs/heads/*:refs/remotes/origin/*", "+refs/tags/*:refs/tags/*"]
        );
        assert!(ctx.cfg().get_all("remote.upstream.fetch").unwrap().is_empty());
        assert_eq!(ctx.cfg().get_bool("core.bare").unwrap(), Some(false));
        assert_eq!(ctx.cfg().get_bool("core.sparse").unwrap(), Some(true));
        assert_eq!(ctx.cfg().get_bool("core.missing").unwrap(), None);
        assert_eq!(runner.call_count(LIST), 1);
    }

    #[test]
    fn test_store_propagates_command_failure() {
        let runner = Arc::new(StubRunner::new().fail(LIST, 128, "fatal: bad config line 3"));
        let ctx = RepoContext::builder().workdir("/repo").runner(runner).build();
        let err = ctx.cfg().get("user.name").unwrap_err();
        assert_eq!(err.exit_code(), Some(128));
    }
}

// gitrefs: branch, tag and tracked-ref queries over the git CLI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Repository context passed into every query.
//!
//! ```text
//! RepoContext
//!   +-- GitInvoker { runner, workdir, env }  --> GitRunner::run
//!   +-- GitConfig  { invoker, snapshot }     --> git config -z --list (lazy)
//! ```

use bon::bon;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use super::backend::{GitRequest, GitRunner, ShellBackend};
use super::gitconfig::GitConfig;
use crate::error::{ParseError, RefsResult};

/// Runner bound to a working directory and environment.
#[derive(Debug, Clone)]
pub struct GitInvoker {
    runner: Arc<dyn GitRunner>,
    workdir: PathBuf,
    env: BTreeMap<String, String>,
}

impl GitInvoker {
    pub fn new(runner: Arc<dyn GitRunner>, workdir: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            workdir: workdir.into(),
            env: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_env(mut self, env: BTreeMap<String, String>) -> Self {
        self.env = env;
        self
    }

    /// Run `git <args>` in the working directory and return raw stdout.
    ///
    /// # Errors
    ///
    /// Returns a `CommandError` if git cannot be started or exits non-zero.
    pub fn run<I, S>(&self, args: I) -> RefsResult<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let request = GitRequest::new(args, &self.workdir).with_env(&self.env);
        self.runner.run(&request)
    }

    #[must_use]
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }
}

/// Everything a query needs: where to run git, how, and the config store.
#[derive(Debug)]
pub struct RepoContext {
    git: GitInvoker,
    cfg: GitConfig,
}

#[bon]
impl RepoContext {
    /// Build a context.
    ///
    /// ```
    /// use std::sync::Arc;
    /// use gitrefs::git::backend::StubRunner;
    /// use gitrefs::git::context::RepoContext;
    ///
    /// let ctx = RepoContext::builder()
    ///     .workdir("/work/repo")
    ///     .runner(Arc::new(StubRunner::new()))
    ///     .build();
    /// assert_eq!(ctx.workdir(), std::path::Path::new("/work/repo"));
    /// ```
    #[builder]
    pub fn new(
        #[builder(into)] workdir: PathBuf,
        runner: Arc<dyn GitRunner>,
        #[builder(default)] env: BTreeMap<String, String>,
    ) -> Self {
        let git = GitInvoker::new(runner, workdir).with_env(env);
        let cfg = GitConfig::new(git.clone());
        Self { git, cfg }
    }
}

impl RepoContext {
    /// Context for `workdir` backed by the git executable found in PATH.
    ///
    /// # Errors
    ///
    /// Returns `CommandError::ExecutableNotFound` if git is not on PATH.
    pub fn open(workdir: impl Into<PathBuf>) -> RefsResult<Self> {
        let runner = Arc::new(ShellBackend::locate()?);
        Ok(Self::builder().workdir(workdir).runner(runner).build())
    }

    /// Context rooted at the top level of the work tree containing `path`.
    ///
    /// # Errors
    ///
    /// Returns a `CommandError` if `path` is not inside a git work tree.
    pub fn discover(
        path: impl AsRef<Path>,
        runner: Arc<dyn GitRunner>,
        env: BTreeMap<String, String>,
    ) -> RefsResult<Self> {
        let probe = GitInvoker::new(runner.clone(), path.as_ref()).with_env(env.clone());
        let toplevel = probe.run(["rev-parse", "--show-toplevel"])?;
        let toplevel = non_empty_line(&toplevel, "git rev-parse --show-toplevel")?;
        debug!(toplevel, "discovered work tree");
        Ok(Self::builder()
            .workdir(toplevel)
            .runner(runner)
            .env(env)
            .build())
    }

    /// Run `git <args>` for this repository.
    ///
    /// # Errors
    ///
    /// Returns a `CommandError` if git cannot be started or exits non-zero.
    pub fn git<I, S>(&self, args: I) -> RefsResult<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.git.run(args)
    }

    /// The repository configuration store.
    #[must_use]
    pub const fn cfg(&self) -> &GitConfig {
        &self.cfg
    }

    #[must_use]
    pub fn workdir(&self) -> &Path {
        self.git.workdir()
    }

    /// Absolute path of the repository metadata directory, resolved on every call.
    ///
    /// # Errors
    ///
    /// Returns a `CommandError` outside a repository.
    pub fn git_dir(&self) -> RefsResult<PathBuf> {
        let out = self.git(["rev-parse", "--absolute-git-dir"])?;
        non_empty_line(&out, "git rev-parse --absolute-git-dir").map(PathBuf::from)
    }
}

fn non_empty_line<'a>(output: &'a str, command: &str) -> RefsResult<&'a str> {
    let line = output.trim_end_matches(['\r', '\n']);
    if line.is_empty() || line.contains('\n') {
        return Err(ParseError::UnexpectedOutput {
            command: command.to_string(),
            output: output.to_string(),
        }
        .into());
    }
    Ok(line)
}

// gitrefs: branch, tag and tracked-ref queries over the git CLI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Scripted runner that answers git invocations with canned output.

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Mutex, PoisonError};

use super::{GitRequest, GitRunner};
use crate::error::{CommandError, RefsResult};

#[derive(Debug, Clone)]
enum StubResponse {
    Stdout(String),
    Exit { code: i32, stderr: String },
}

/// [`GitRunner`] that replays scripted responses keyed by argument list.
///
/// Responses queued for the same arguments are consumed in order; the last
/// one stays and answers every further call. Every request is recorded.
///
/// ```
/// use gitrefs::git::backend::{GitRequest, GitRunner, StubRunner};
///
/// let runner = StubRunner::new().respond(&["remote"], "origin\nupstream\n");
/// let out = runner.run(&GitRequest::new(["remote"], ".")).unwrap();
/// assert_eq!(out, "origin\nupstream\n");
/// assert_eq!(runner.calls(), vec![vec!["remote".to_string()]]);
/// ```
#[derive(Debug, Default)]
pub struct StubRunner {
    responses: Mutex<BTreeMap<Vec<String>, VecDeque<StubResponse>>>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl StubRunner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response with the given stdout.
    #[must_use]
    pub fn respond(self, args: &[&str], stdout: &str) -> Self {
        self.push(args, StubResponse::Stdout(stdout.to_string()))
    }

    /// Queue a non-zero exit.
    #[must_use]
    pub fn fail(self, args: &[&str], code: i32, stderr: &str) -> Self {
        self.push(
            args,
            StubResponse::Exit {
                code,
                stderr: stderr.to_string(),
            },
        )
    }

    /// Argument lists of every request seen so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of requests seen with exactly these arguments.
    #[must_use]
    pub fn call_count(&self, args: &[&str]) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.iter().map(String::as_str).eq(args.iter().copied()))
            .count()
    }

    fn push(self, args: &[&str], response: StubResponse) -> Self {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(args.iter().map(ToString::to_string).collect())
            .or_default()
            .push_back(response);
        self
    }
}

impl GitRunner for StubRunner {
    fn run(&self, request: &GitRequest) -> RefsResult<String> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.args().to_vec());

        let response = {
            let mut responses = self
                .responses
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            responses.get_mut(request.args()).and_then(|queue| {
                if queue.len() > 1 {
                    queue.pop_front()
                } else {
                    queue.front().cloned()
                }
            })
        };

        match response {
            Some(StubResponse::Stdout(stdout)) => Ok(stdout),
            Some(StubResponse::Exit { code, stderr }) => Err(CommandError::NonZeroExit {
                command: request.to_string(),
                code: Some(code),
                stderr,
            }
            .into()),
            None => Err(CommandError::NonZeroExit {
                command: request.to_string(),
                code: Some(128),
                stderr: format!("no stubbed response for '{request}'"),
            }
            .into()),
        }
    }
}

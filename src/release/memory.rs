//! In-memory VersionControl that records calls

use super::VersionControl;
use crate::error::ToolError;
use std::sync::Mutex;

/// A recorded version-control operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VcsCall {
    Diff,
    Commit(String),
    PullRebase,
    Push(String),
    CreateBranch(String),
    Checkout(String),
    OpenReviewRequest {
        head: String,
        base: String,
        title: String,
    },
}

/// VersionControl double for tests and dry runs
#[derive(Debug, Default)]
pub struct InMemoryVcs {
    calls: Mutex<Vec<VcsCall>>,
    failing: Vec<&'static str>,
}

impl InMemoryVcs {
    /// Create a recorder where every operation succeeds
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the named operation fail (builder pattern)
    pub fn failing_on(mut self, operation: &'static str) -> Self {
        self.failing.push(operation);
        self
    }

    /// Operations performed so far, in order
    pub fn calls(&self) -> Vec<VcsCall> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    fn record(&self, operation: &'static str, call: VcsCall) -> Result<String, ToolError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
        if self.failing.contains(&operation) {
            return Err(ToolError::command_failed(operation, "simulated failure"));
        }
        Ok(String::new())
    }
}

impl VersionControl for InMemoryVcs {
    fn diff(&self) -> Result<String, ToolError> {
        self.record("diff", VcsCall::Diff)
    }

    fn commit(&self, message: &str) -> Result<String, ToolError> {
        self.record("commit", VcsCall::Commit(message.to_string()))
    }

    fn pull_rebase(&self) -> Result<String, ToolError> {
        self.record("pull_rebase", VcsCall::PullRebase)
    }

    fn push(&self, branch: &str) -> Result<String, ToolError> {
        self.record("push", VcsCall::Push(branch.to_string()))
    }

    fn create_branch(&self, branch: &str) -> Result<String, ToolError> {
        self.record("create_branch", VcsCall::CreateBranch(branch.to_string()))
    }

    fn checkout_branch(&self, branch: &str) -> Result<String, ToolError> {
        self.record("checkout", VcsCall::Checkout(branch.to_string()))
    }

    fn open_review_request(
        &self,
        head: &str,
        base: &str,
        title: &str,
        _body: &str,
    ) -> Result<String, ToolError> {
        self.record(
            "open_review_request",
            VcsCall::OpenReviewRequest {
                head: head.to_string(),
                base: base.to_string(),
                title: title.to_string(),
            },
        )?;
        Ok(format!("review/{}", head))
    }
}

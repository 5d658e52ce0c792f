//! Release workflow for applied dependency updates
//!
//! This module provides:
//! - The VersionControl trait over git and the code-hosting CLI
//! - Severity-based routing: direct push or branch plus review request
//! - Commit message, branch name and review title synthesis

mod git;
mod memory;

pub use git::{push_url, GitCli, GitIdentity, TOKEN_ENV};
pub use memory::{InMemoryVcs, VcsCall};

use crate::domain::{OutdatedDependency, Severity};
use crate::error::ToolError;
use chrono::{DateTime, Utc};

/// Branch updates land on unless review is required
pub const DEFAULT_BASE_BRANCH: &str = "master";

/// Operations the release workflow needs from version control
pub trait VersionControl {
    /// Working tree diff
    fn diff(&self) -> Result<String, ToolError>;

    /// Commit all tracked changes
    fn commit(&self, message: &str) -> Result<String, ToolError>;

    /// Rebase the current branch onto its upstream
    fn pull_rebase(&self) -> Result<String, ToolError>;

    /// Push `branch` to the remote
    fn push(&self, branch: &str) -> Result<String, ToolError>;

    /// Create `branch` and check it out
    fn create_branch(&self, branch: &str) -> Result<String, ToolError>;

    /// Check out an existing branch
    fn checkout_branch(&self, branch: &str) -> Result<String, ToolError>;

    /// Open a review request from `head` into `base`; returns its URL or id
    fn open_review_request(
        &self,
        head: &str,
        base: &str,
        title: &str,
        body: &str,
    ) -> Result<String, ToolError>;
}

/// How a change set reaches the base branch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleasePath {
    /// Commit, rebase and push to the base branch
    Direct,
    /// Commit on a new branch and open a review request
    Review,
}

/// What the router will do for a set of applied updates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleasePlan {
    pub chart_name: String,
    pub commit_message: String,
    pub severity: Severity,
    pub path: ReleasePath,
}

impl ReleasePlan {
    /// Classify `results` and pick the release path
    pub fn new(chart_name: &str, results: &[OutdatedDependency], only_pull_requests: bool) -> Self {
        let severity = Severity::aggregate(results.iter().map(OutdatedDependency::severity));
        let path = if only_pull_requests || severity.requires_review() {
            ReleasePath::Review
        } else {
            ReleasePath::Direct
        };
        Self {
            chart_name: chart_name.to_string(),
            commit_message: commit_message(chart_name, results),
            severity,
            path,
        }
    }
}

/// Result of a completed release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseOutcome {
    pub path: ReleasePath,
    /// Branch that was pushed
    pub branch: String,
    /// Review request reference, for the review path
    pub review: Option<String>,
}

/// Drives a VersionControl implementation through the chosen release path
pub struct ReleaseRouter<'a, V: VersionControl + ?Sized> {
    vcs: &'a V,
    base_branch: String,
}

impl<'a, V: VersionControl + ?Sized> ReleaseRouter<'a, V> {
    /// Create a router releasing onto `base_branch`
    pub fn new(vcs: &'a V, base_branch: impl Into<String>) -> Self {
        Self {
            vcs,
            base_branch: base_branch.into(),
        }
    }

    /// Execute `plan`; `now` names the review branch
    pub fn release(&self, plan: &ReleasePlan, now: DateTime<Utc>) -> Result<ReleaseOutcome, ToolError> {
        tracing::info!(
            chart = %plan.chart_name,
            severity = %plan.severity,
            path = ?plan.path,
            "releasing dependency updates"
        );
        match plan.path {
            ReleasePath::Direct => self.release_direct(plan),
            ReleasePath::Review => self.release_review(plan, now),
        }
    }

    fn release_direct(&self, plan: &ReleasePlan) -> Result<ReleaseOutcome, ToolError> {
        self.commit(&plan.commit_message)?;
        log_output(self.vcs.pull_rebase()?);
        log_output(self.vcs.push(&self.base_branch)?);

        Ok(ReleaseOutcome {
            path: ReleasePath::Direct,
            branch: self.base_branch.clone(),
            review: None,
        })
    }

    fn release_review(&self, plan: &ReleasePlan, now: DateTime<Utc>) -> Result<ReleaseOutcome, ToolError> {
        let branch = branch_name(&plan.chart_name, now);
        log_output(self.vcs.create_branch(&branch)?);

        let result = self.publish_branch(plan, &branch);
        let restored = self.vcs.checkout_branch(&self.base_branch);

        match (result, restored) {
            (Ok(review), Ok(_)) => Ok(ReleaseOutcome {
                path: ReleasePath::Review,
                branch,
                review: Some(review),
            }),
            (Ok(_), Err(e)) => Err(e),
            (Err(e), Ok(_)) => Err(e),
            (Err(e), Err(cleanup)) => {
                tracing::warn!("failed to restore branch {}: {}", self.base_branch, cleanup);
                Err(e)
            }
        }
    }

    fn publish_branch(&self, plan: &ReleasePlan, branch: &str) -> Result<String, ToolError> {
        self.commit(&plan.commit_message)?;
        log_output(self.vcs.push(branch)?);

        let review = self.vcs.open_review_request(
            branch,
            &self.base_branch,
            &review_title(&plan.chart_name),
            &plan.commit_message,
        )?;
        tracing::info!("opened review request: {}", review);
        Ok(review)
    }

    fn commit(&self, message: &str) -> Result<(), ToolError> {
        log_output(self.vcs.diff()?);
        log_output(self.vcs.commit(message)?);
        Ok(())
    }
}

fn log_output(output: String) {
    if !output.is_empty() {
        tracing::debug!("{}", output);
    }
}

/// `[<chart>] updated dependency to a@1.2.0, b@2.0.0`
pub fn commit_message(chart_name: &str, results: &[OutdatedDependency]) -> String {
    let updates: Vec<String> = results
        .iter()
        .map(|r| format!("{}@{}", r.dependency.display_name(), r.latest_version))
        .collect();
    format!("[{}] updated dependency to {}", chart_name, updates.join(", "))
}

/// `<chart>-<unix seconds>`
pub fn branch_name(chart_name: &str, now: DateTime<Utc>) -> String {
    format!("{}-{}", chart_name, now.timestamp())
}

/// Title of the review request
pub fn review_title(chart_name: &str) -> String {
    format!("[{}] updating dependencies", chart_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Dependency;
    use chrono::TimeZone;
    use semver::Version;

    fn outdated(name: &str, current: &str, latest: &str) -> OutdatedDependency {
        OutdatedDependency::detect(
            Dependency::new(name, current, "https://charts.example.com"),
            Version::parse(current).unwrap(),
            Version::parse(latest).unwrap(),
        )
        .unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_commit_message_uses_alias() {
        let mut aliased = outdated("redis", "1.0.0", "1.2.0");
        aliased.dependency = aliased.dependency.with_alias("cache");
        let message = commit_message("app", &[aliased, outdated("nginx", "1.0.0", "1.0.1")]);
        assert_eq!(message, "[app] updated dependency to cache@1.2.0, nginx@1.0.1");
    }

    #[test]
    fn test_branch_name_and_title() {
        assert_eq!(branch_name("app", now()), "app-1717243200");
        assert_eq!(review_title("app"), "[app] updating dependencies");
    }

    #[test]
    fn test_plan_patch_only_is_direct() {
        let plan = ReleasePlan::new("app", &[outdated("a", "1.0.0", "1.0.1")], false);
        assert_eq!(plan.severity, Severity::Patch);
        assert_eq!(plan.path, ReleasePath::Direct);
    }

    #[test]
    fn test_plan_minor_goes_to_review() {
        let results = [outdated("a", "1.0.0", "1.0.1"), outdated("b", "1.0.0", "1.1.0")];
        let plan = ReleasePlan::new("app", &results, false);
        assert_eq!(plan.severity, Severity::Minor);
        assert_eq!(plan.path, ReleasePath::Review);
    }

    #[test]
    fn test_plan_forced_review() {
        let plan = ReleasePlan::new("app", &[outdated("a", "1.0.0", "1.0.1")], true);
        assert_eq!(plan.path, ReleasePath::Review);
    }

    #[test]
    fn test_release_direct() {
        let vcs = InMemoryVcs::new();
        let plan = ReleasePlan::new("app", &[outdated("a", "1.0.0", "1.0.1")], false);

        let outcome = ReleaseRouter::new(&vcs, "master").release(&plan, now()).unwrap();

        assert_eq!(outcome.path, ReleasePath::Direct);
        assert_eq!(outcome.branch, "master");
        assert_eq!(
            vcs.calls(),
            vec![
                VcsCall::Diff,
                VcsCall::Commit("[app] updated dependency to a@1.0.1".to_string()),
                VcsCall::PullRebase,
                VcsCall::Push("master".to_string()),
            ]
        );
    }

    #[test]
    fn test_release_review() {
        let vcs = InMemoryVcs::new();
        let plan = ReleasePlan::new("app", &[outdated("a", "1.0.0", "2.0.0")], false);

        let outcome = ReleaseRouter::new(&vcs, "main").release(&plan, now()).unwrap();

        assert_eq!(outcome.branch, "app-1717243200");
        assert!(outcome.review.is_some());
        assert_eq!(
            vcs.calls(),
            vec![
                VcsCall::CreateBranch("app-1717243200".to_string()),
                VcsCall::Diff,
                VcsCall::Commit("[app] updated dependency to a@2.0.0".to_string()),
                VcsCall::Push("app-1717243200".to_string()),
                VcsCall::OpenReviewRequest {
                    head: "app-1717243200".to_string(),
                    base: "main".to_string(),
                    title: "[app] updating dependencies".to_string(),
                },
                VcsCall::Checkout("main".to_string()),
            ]
        );
    }

    #[test]
    fn test_release_review_restores_branch_on_failure() {
        let vcs = InMemoryVcs::new().failing_on("open_review_request");
        let plan = ReleasePlan::new("app", &[outdated("a", "1.0.0", "2.0.0")], false);

        let err = ReleaseRouter::new(&vcs, "master")
            .release(&plan, now())
            .unwrap_err();

        assert!(err.to_string().contains("open_review_request"));
        assert_eq!(vcs.calls().last(), Some(&VcsCall::Checkout("master".to_string())));
    }

    #[test]
    fn test_release_review_first_error_wins() {
        let vcs = InMemoryVcs::new()
            .failing_on("push")
            .failing_on("checkout");
        let plan = ReleasePlan::new("app", &[outdated("a", "1.0.0", "2.0.0")], true);

        let err = ReleaseRouter::new(&vcs, "master")
            .release(&plan, now())
            .unwrap_err();
        assert!(err.to_string().contains("push"));
    }

    #[test]
    fn test_release_review_no_cleanup_if_branch_not_created() {
        let vcs = InMemoryVcs::new().failing_on("create_branch");
        let plan = ReleasePlan::new("app", &[outdated("a", "1.0.0", "2.0.0")], false);

        assert!(ReleaseRouter::new(&vcs, "master").release(&plan, now()).is_err());
        assert_eq!(vcs.calls(), vec![VcsCall::CreateBranch("app-1717243200".to_string())]);
    }
}

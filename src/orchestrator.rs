//! Pipeline orchestration for the list and update commands
//!
//! This module provides:
//! - Workflow coordination: load → filter → sync → resolve → detect
//! - Update application: chart version bump → manifest write → lock refresh
//! - Release routing of the applied change set

use crate::domain::{OutdatedReport, Severity};
use crate::error::AppError;
use crate::manifest::{self, ManifestWriter, WriteResult, DEFAULT_INDENT};
use crate::process::Tool;
use crate::progress::RefreshSpinner;
use crate::registry::{
    remote_repositories, HttpClient, HttpIndexFetcher, IndexCache, IndexFetcher,
    IndexSynchronizer, SyncReport,
};
use crate::release::{ReleaseOutcome, ReleasePath, ReleasePlan, ReleaseRouter, VersionControl};
use crate::resolver::VersionResolver;
use crate::update::{DependencyFilter, OutdatedDetector};
use chrono::Utc;
use semver::Version;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// How updates are applied
#[derive(Debug, Clone)]
pub struct UpdateOptions {
    /// Indent width of the rewritten requirements.yaml
    pub indent: usize,
    /// Chart version bump, if any
    pub increment: Option<Severity>,
    /// Regenerate requirements.lock through helm
    pub sync_lock: bool,
}

impl Default for UpdateOptions {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT,
            increment: None,
            sync_lock: false,
        }
    }
}

/// Where and how applied updates are released
pub struct ReleaseOptions<'a> {
    pub vcs: &'a dyn VersionControl,
    /// Route every change set through review
    pub only_pull_requests: bool,
    /// Branch updates land on
    pub base_branch: String,
}

/// Everything an update run did
#[derive(Debug)]
pub struct UpdateOutcome {
    pub report: OutdatedReport,
    /// New chart version, when it was bumped
    pub chart_version: Option<Version>,
    /// Manifest write result, when anything was outdated
    pub write: Option<WriteResult>,
    /// Release result, when a release was requested
    pub release: Option<ReleaseOutcome>,
}

/// Orchestrator for the outdated detection and update workflow
pub struct Orchestrator {
    cache: IndexCache,
    fetcher: Arc<dyn IndexFetcher>,
    show_progress: bool,
}

impl Orchestrator {
    /// Create an orchestrator fetching over HTTP into `cache`
    pub fn new(cache: IndexCache) -> Result<Self, AppError> {
        let client = HttpClient::new()?;
        Ok(Self::with_fetcher(cache, Arc::new(HttpIndexFetcher::new(client))))
    }

    /// Create an orchestrator with a custom fetcher (for testing)
    pub fn with_fetcher(cache: IndexCache, fetcher: Arc<dyn IndexFetcher>) -> Self {
        Self {
            cache,
            fetcher,
            show_progress: false,
        }
    }

    /// Show a spinner during index refresh (builder pattern)
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Index cache in use
    pub fn cache(&self) -> &IndexCache {
        &self.cache
    }

    /// Find the outdated dependencies of a chart.
    ///
    /// A chart without requirements.yaml yields an empty report.
    pub async fn outdated(
        &self,
        chart_path: &Path,
        filter: &DependencyFilter,
    ) -> Result<OutdatedReport, AppError> {
        let dependencies = match manifest::load_dependencies(chart_path) {
            Ok(dependencies) => dependencies,
            Err(e) if e.is_not_found() => {
                tracing::debug!(chart = %chart_path.display(), "chart has no requirements");
                return Ok(OutdatedReport::no_requirements(chart_path));
            }
            Err(e) => return Err(e.into()),
        };

        let dependencies = filter.apply(dependencies);
        self.sync_indexes(&remote_repositories(&dependencies)).await;

        let resolver = VersionResolver::new(self.cache.clone());
        let detection = OutdatedDetector::new(&resolver).detect(&dependencies);

        Ok(OutdatedReport {
            chart_path: chart_path.to_path_buf(),
            outdated: detection.outdated,
            skipped: detection.skipped,
            has_requirements: true,
        })
    }

    async fn sync_indexes(&self, repositories: &[String]) -> SyncReport {
        if repositories.is_empty() {
            return SyncReport::default();
        }

        let spinner = RefreshSpinner::start(repositories, self.show_progress);
        let synchronizer = IndexSynchronizer::new(Arc::clone(&self.fetcher), self.cache.clone());
        let report = synchronizer.sync(repositories).await;
        spinner.finish();

        tracing::debug!(
            refreshed = report.refreshed.len(),
            failed = report.failed.len(),
            "repository indexes refreshed"
        );
        report
    }

    /// Apply the outdated set of `report` to the chart on disk, then release it
    /// when `release` is given.
    pub fn apply(
        &self,
        report: OutdatedReport,
        options: &UpdateOptions,
        release: Option<&ReleaseOptions<'_>>,
    ) -> Result<UpdateOutcome, AppError> {
        let mut outcome = UpdateOutcome {
            report,
            chart_version: None,
            write: None,
            release: None,
        };
        if !outcome.report.has_outdated() {
            return Ok(outcome);
        }
        let chart_path: PathBuf = outcome.report.chart_path.clone();

        let chart_name = match release {
            Some(_) => Some(manifest::chart_name(&chart_path)?),
            None => None,
        };

        if let Some(severity) = options.increment {
            let version = manifest::increment_chart_version(&chart_path, severity, options.indent)?;
            tracing::info!(chart = %chart_path.display(), version = %version, "chart version updated");
            outcome.chart_version = Some(version);
        }

        let write = ManifestWriter::new(options.indent).apply(&chart_path, &outcome.report.outdated)?;
        outcome.write = Some(write);

        if options.sync_lock {
            manifest::sync_lock(&Tool::new("helm"), &chart_path)?;
        }

        if let (Some(release), Some(chart_name)) = (release, chart_name) {
            let plan = ReleasePlan::new(&chart_name, &outcome.report.outdated, release.only_pull_requests);
            let router = ReleaseRouter::new(release.vcs, release.base_branch.as_str());
            outcome.release = Some(router.release(&plan, Utc::now())?);
        }

        Ok(outcome)
    }

    /// Detect and apply in one step
    pub async fn update(
        &self,
        chart_path: &Path,
        filter: &DependencyFilter,
        options: &UpdateOptions,
        release: Option<&ReleaseOptions<'_>>,
    ) -> Result<UpdateOutcome, AppError> {
        let report = self.outdated(chart_path, filter).await?;
        self.apply(report, options, release)
    }
}

/// Returns true if the plan for `report` would need the review tool
pub fn needs_review(report: &OutdatedReport, only_pull_requests: bool) -> bool {
    ReleasePlan::new("", &report.outdated, only_pull_requests).path == ReleasePath::Review
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RegistryError;
    use crate::manifest::{ChartMetadata, Requirements, METADATA_FILENAME, REQUIREMENTS_FILENAME};
    use crate::release::{InMemoryVcs, VcsCall};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    const REPO_A: &str = "https://repo-a.example.com";

    struct StaticFetcher {
        indexes: HashMap<String, String>,
    }

    #[async_trait]
    impl IndexFetcher for StaticFetcher {
        async fn fetch_index(&self, repository: &str) -> Result<String, RegistryError> {
            self.indexes
                .get(repository)
                .cloned()
                .ok_or_else(|| RegistryError::network_error(repository, "HTTP 404 Not Found"))
        }
    }

    struct Fixture {
        _cache: TempDir,
        chart: TempDir,
        orchestrator: Orchestrator,
    }

    fn fixture(requirements: &str, index: &str) -> Fixture {
        let cache = TempDir::new().unwrap();
        let chart = TempDir::new().unwrap();
        fs::write(chart.path().join(METADATA_FILENAME), "name: app\nversion: 0.1.0\n").unwrap();
        fs::write(chart.path().join(REQUIREMENTS_FILENAME), requirements).unwrap();

        let fetcher = StaticFetcher {
            indexes: HashMap::from([(REPO_A.to_string(), index.to_string())]),
        };
        let orchestrator = Orchestrator::with_fetcher(IndexCache::new(cache.path()), Arc::new(fetcher));
        Fixture {
            _cache: cache,
            chart,
            orchestrator,
        }
    }

    fn redis_nginx() -> Fixture {
        fixture(
            &format!(
                "dependencies:\n- name: redis\n  version: 1.0.0\n  repository: {REPO_A}\n- name: nginx\n  version: 2.0.0\n  repository: {REPO_A}\n"
            ),
            "entries:\n  redis:\n    - version: 1.2.0\n  nginx:\n    - version: 2.0.0\n",
        )
    }

    #[tokio::test]
    async fn test_outdated_end_to_end() {
        let f = redis_nginx();
        let report = f
            .orchestrator
            .outdated(f.chart.path(), &DependencyFilter::new())
            .await
            .unwrap();

        assert!(report.has_requirements);
        assert_eq!(report.outdated.len(), 1);
        assert_eq!(report.outdated[0].name(), "redis");
        assert_eq!(report.outdated[0].latest_version, Version::new(1, 2, 0));
    }

    #[tokio::test]
    async fn test_outdated_without_requirements() {
        let f = redis_nginx();
        fs::remove_file(f.chart.path().join(REQUIREMENTS_FILENAME)).unwrap();
        let report = f
            .orchestrator
            .outdated(f.chart.path(), &DependencyFilter::new())
            .await
            .unwrap();
        assert!(!report.has_requirements);
        assert!(!report.has_outdated());
    }

    #[tokio::test]
    async fn test_filter_excludes_dependency() {
        let f = redis_nginx();
        let filter = DependencyFilter::new().with_dependency_names(vec!["nginx".to_string()]);
        let report = f.orchestrator.outdated(f.chart.path(), &filter).await.unwrap();
        assert!(report.outdated.is_empty());
    }

    #[tokio::test]
    async fn test_update_writes_and_bumps() {
        let f = redis_nginx();
        let options = UpdateOptions {
            increment: Some(Severity::Patch),
            ..UpdateOptions::default()
        };
        let outcome = f
            .orchestrator
            .update(f.chart.path(), &DependencyFilter::new(), &options, None)
            .await
            .unwrap();

        assert_eq!(outcome.chart_version, Some(Version::new(0, 1, 1)));
        assert!(outcome.write.unwrap().file_modified);

        let reqs = Requirements::load(f.chart.path()).unwrap();
        let names: Vec<_> = reqs.dependencies.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["nginx", "redis"]);
        assert_eq!(reqs.dependencies[1].version, "1.2.0");
        assert_eq!(ChartMetadata::load(f.chart.path()).unwrap().version, "0.1.1");
    }

    #[tokio::test]
    async fn test_update_leaves_filtered_out_entries() {
        let f = fixture(
            &format!(
                "dependencies:\n- name: redis\n  version: 1.0.0\n  repository: {REPO_A}\n- name: nginx\n  version: 1.0.0\n  repository: {REPO_A}\n"
            ),
            "entries:\n  redis:\n    - version: 1.2.0\n  nginx:\n    - version: 2.0.0\n",
        );
        let filter = DependencyFilter::new().with_dependency_names(vec!["redis".to_string()]);
        f.orchestrator
            .update(f.chart.path(), &filter, &UpdateOptions::default(), None)
            .await
            .unwrap();

        let reqs = Requirements::load(f.chart.path()).unwrap();
        assert_eq!(reqs.dependencies[0].name, "nginx");
        assert_eq!(reqs.dependencies[0].version, "1.0.0");
        assert_eq!(reqs.dependencies[1].version, "1.2.0");
    }

    #[tokio::test]
    async fn test_update_nothing_outdated_touches_nothing() {
        let f = fixture(
            &format!("dependencies:\n- name: nginx\n  version: 2.0.0\n  repository: {REPO_A}\n"),
            "entries:\n  nginx:\n    - version: 2.0.0\n",
        );
        let options = UpdateOptions {
            increment: Some(Severity::Patch),
            ..UpdateOptions::default()
        };
        let outcome = f
            .orchestrator
            .update(f.chart.path(), &DependencyFilter::new(), &options, None)
            .await
            .unwrap();
        assert!(outcome.write.is_none());
        assert!(outcome.chart_version.is_none());
        assert_eq!(ChartMetadata::load(f.chart.path()).unwrap().version, "0.1.0");
    }

    #[tokio::test]
    async fn test_update_releases_minor_through_review() {
        let f = redis_nginx();
        let vcs = InMemoryVcs::new();
        let options = UpdateOptions {
            increment: Some(Severity::Patch),
            ..UpdateOptions::default()
        };
        let release = ReleaseOptions {
            vcs: &vcs,
            only_pull_requests: false,
            base_branch: "master".to_string(),
        };

        let outcome = f
            .orchestrator
            .update(f.chart.path(), &DependencyFilter::new(), &options, Some(&release))
            .await
            .unwrap();

        let release = outcome.release.unwrap();
        assert_eq!(release.path, ReleasePath::Review);
        assert!(release.branch.starts_with("app-"));
        assert!(vcs
            .calls()
            .contains(&VcsCall::Commit("[app] updated dependency to redis@1.2.0".to_string())));
        assert_eq!(vcs.calls().last(), Some(&VcsCall::Checkout("master".to_string())));
    }

    #[tokio::test]
    async fn test_release_failure_keeps_written_manifest() {
        let f = fixture(
            &format!("dependencies:\n- name: redis\n  version: 1.0.0\n  repository: {REPO_A}\n"),
            "entries:\n  redis:\n    - version: 1.0.1\n",
        );
        let vcs = InMemoryVcs::new().failing_on("push");
        let release = ReleaseOptions {
            vcs: &vcs,
            only_pull_requests: false,
            base_branch: "master".to_string(),
        };
        let result = f
            .orchestrator
            .update(f.chart.path(), &DependencyFilter::new(), &UpdateOptions::default(), Some(&release))
            .await;

        assert!(result.is_err());
        assert!(!vcs.calls().iter().any(|c| matches!(c, VcsCall::CreateBranch(_))));
        let reqs = Requirements::load(f.chart.path()).unwrap();
        assert_eq!(reqs.dependencies[0].version, "1.0.1");
    }

    #[test]
    fn test_needs_review() {
        let report = OutdatedReport::no_requirements("/x");
        assert!(!needs_review(&report, false));
        assert!(needs_review(&report, true));
    }
}

//! Concurrent repository index refresh

use crate::domain::Dependency;
use crate::error::RegistryError;
use crate::registry::{IndexCache, IndexFetcher};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

/// Outcome of a synchronization pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Repositories whose index was downloaded and cached
    pub refreshed: Vec<String>,
    /// Repositories that failed, with the error message
    pub failed: Vec<(String, String)>,
}

impl SyncReport {
    /// Returns true if every repository was refreshed
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Refreshes cached indexes, one task per repository
pub struct IndexSynchronizer {
    fetcher: Arc<dyn IndexFetcher>,
    cache: IndexCache,
}

impl IndexSynchronizer {
    /// Create a new synchronizer
    pub fn new(fetcher: Arc<dyn IndexFetcher>, cache: IndexCache) -> Self {
        Self { fetcher, cache }
    }

    /// Cache the synchronizer writes to
    pub fn cache(&self) -> &IndexCache {
        &self.cache
    }

    /// Refresh every repository concurrently and wait for all of them.
    ///
    /// Failures are logged and reported; they never cancel other refreshes.
    /// Report entries keep the input order.
    pub async fn sync(&self, repositories: &[String]) -> SyncReport {
        let mut tasks = JoinSet::new();

        for (position, repository) in repositories.iter().enumerate() {
            let fetcher = Arc::clone(&self.fetcher);
            let cache = self.cache.clone();
            let repo = repository.clone();
            tasks.spawn(async move {
                let outcome = refresh(fetcher.as_ref(), &cache, &repo).await;
                (position, outcome)
            });
        }

        let mut outcomes: Vec<Option<Result<(), String>>> = vec![None; repositories.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((position, outcome)) => outcomes[position] = Some(outcome),
                Err(e) => tracing::warn!("index refresh task failed: {}", e),
            }
        }

        let mut report = SyncReport::default();
        for (repo, outcome) in repositories.iter().zip(outcomes) {
            match outcome {
                Some(Ok(())) => report.refreshed.push(repo.clone()),
                Some(Err(message)) => report.failed.push((repo.clone(), message)),
                None => report.failed.push((repo.clone(), "refresh task aborted".to_string())),
            }
        }
        report
    }
}

async fn refresh(fetcher: &dyn IndexFetcher, cache: &IndexCache, repository: &str) -> Result<(), String> {
    let result: Result<(), RegistryError> = async {
        let body = fetcher.fetch_index(repository).await?;
        cache.store(repository, &body)?;
        Ok(())
    }
    .await;

    match result {
        Ok(()) => {
            tracing::info!(repository, "successfully got an update from the chart repository");
            Ok(())
        }
        Err(e) => {
            tracing::warn!(repository, "unable to get an update from the chart repository: {}", e);
            if let Some(age) = cache.age(repository) {
                tracing::warn!(
                    repository,
                    path = %cache.index_path(repository).display(),
                    "using cached index last refreshed {} ago",
                    format_age(age)
                );
            }
            Err(e.to_string())
        }
    }
}

/// Distinct remote repositories in first-seen order
pub fn remote_repositories(dependencies: &[Dependency]) -> Vec<String> {
    let mut repositories: Vec<String> = Vec::new();
    for dep in dependencies {
        if dep.is_local() || dep.repository.trim().is_empty() {
            continue;
        }
        if !repositories.contains(&dep.repository) {
            repositories.push(dep.repository.clone());
        }
    }
    repositories
}

fn format_age(age: Duration) -> String {
    let age = chrono::Duration::from_std(age).unwrap_or_else(|_| chrono::Duration::zero());
    if age.num_days() > 0 {
        format!("{}d {}h", age.num_days(), age.num_hours() % 24)
    } else if age.num_hours() > 0 {
        format!("{}h {}m", age.num_hours(), age.num_minutes() % 60)
    } else {
        format!("{}m", age.num_minutes())
    }
}

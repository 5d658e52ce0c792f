//! Chart repository access
//!
//! This module provides:
//! - HTTP client shared foundation
//! - Helm repository index documents and the local index cache
//! - The IndexFetcher seam with its HTTP implementation
//! - Concurrent index synchronization

mod cache;
mod client;
mod index;
mod sync;

pub use cache::{normalize_repo_name, IndexCache, CACHE_DIR_ENV};
pub use client::HttpClient;
pub use index::{ChartEntry, Lookup, RepositoryIndex};
pub use sync::{remote_repositories, IndexSynchronizer, SyncReport};

use crate::error::RegistryError;
use async_trait::async_trait;

/// Trait for downloading repository indexes
#[async_trait]
pub trait IndexFetcher: Send + Sync {
    /// Fetch the raw index document of `repository`
    async fn fetch_index(&self, repository: &str) -> Result<String, RegistryError>;
}

/// Fetches `<repository>/index.yaml` over HTTP
#[derive(Clone)]
pub struct HttpIndexFetcher {
    client: HttpClient,
}

impl HttpIndexFetcher {
    /// Create a new fetcher
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// Index URL of a repository
    fn build_url(&self, repository: &str) -> Result<String, RegistryError> {
        let base = repository.trim().trim_end_matches('/');
        if !(base.starts_with("https://") || base.starts_with("http://")) {
            return Err(RegistryError::InvalidUrl {
                repository: repository.to_string(),
                message: "only http and https repositories are supported".to_string(),
            });
        }
        Ok(format!("{}/index.yaml", base))
    }
}

#[async_trait]
impl IndexFetcher for HttpIndexFetcher {
    async fn fetch_index(&self, repository: &str) -> Result<String, RegistryError> {
        let url = self.build_url(repository)?;
        let body = self.client.get_text(&url, repository).await?;

        RepositoryIndex::parse(&body)
            .map_err(|e| RegistryError::invalid_response(repository, e.to_string()))?;
        Ok(body)
    }
}

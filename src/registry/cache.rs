//! Local repository index cache
//!
//! Index files live in the Helm repository cache, one file per repository,
//! named after the normalized repository URL.

use crate::error::{RegistryError, ResolveError};
use crate::registry::index::RepositoryIndex;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

/// Environment variable overriding the cache location
pub const CACHE_DIR_ENV: &str = "HELM_REPOSITORY_CACHE";

/// Cache directory holding `<name>-index.yaml` files
#[derive(Debug, Clone)]
pub struct IndexCache {
    dir: PathBuf,
}

impl IndexCache {
    /// Create a cache rooted at `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Cache at `$HELM_REPOSITORY_CACHE`, else `<user cache dir>/helm/repository`
    pub fn from_env() -> Self {
        let dir = std::env::var_os(CACHE_DIR_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                dirs::cache_dir()
                    .unwrap_or_else(std::env::temp_dir)
                    .join("helm")
                    .join("repository")
            });
        Self::new(dir)
    }

    /// Index file path for a repository URL
    pub fn index_path(&self, repository: &str) -> PathBuf {
        self.dir
            .join(format!("{}-index.yaml", normalize_repo_name(repository)))
    }

    /// Load the cached index of `repository`
    pub fn load(&self, repository: &str) -> Result<RepositoryIndex, ResolveError> {
        let path = self.index_path(repository);
        let content = fs::read_to_string(&path).map_err(|_| ResolveError::IndexMissing {
            repository: repository.to_string(),
            path: path.clone(),
        })?;
        RepositoryIndex::parse(&content).map_err(|e| ResolveError::IndexParse {
            path,
            message: e.to_string(),
        })
    }

    /// Store a downloaded index, replacing any previous copy
    pub fn store(&self, repository: &str, content: &str) -> Result<PathBuf, RegistryError> {
        let path = self.index_path(repository);
        let cache_write = |source| RegistryError::CacheWrite {
            path: path.clone(),
            source,
        };

        fs::create_dir_all(&self.dir).map_err(cache_write)?;
        let mut temp = tempfile::NamedTempFile::new_in(&self.dir).map_err(cache_write)?;
        temp.write_all(content.as_bytes()).map_err(cache_write)?;
        temp.persist(&path).map_err(|e| cache_write(e.error))?;
        Ok(path)
    }

    /// Time since the cached index was last written, if it exists
    pub fn age(&self, repository: &str) -> Option<Duration> {
        let modified = fs::metadata(self.index_path(repository))
            .and_then(|m| m.modified())
            .ok()?;
        SystemTime::now().duration_since(modified).ok()
    }
}

/// Cache key for a repository URL.
///
/// `https://` and a trailing `/` are dropped, then `/` and `.` become `-`.
pub fn normalize_repo_name(repository: &str) -> String {
    let name = repository.strip_prefix("https://").unwrap_or(repository);
    let name = name.strip_suffix('/').unwrap_or(name);
    name.replace(['/', '.'], "-")
}

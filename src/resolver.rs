//! Latest version resolution
//!
//! Local (`file://`) dependencies report the version in the referenced
//! chart's own Chart.yaml. Remote dependencies are looked up in the cached
//! repository index.

use crate::domain::Dependency;
use crate::error::ResolveError;
use crate::manifest::ChartMetadata;
use crate::registry::{IndexCache, Lookup};
use semver::Version;

/// Resolves the latest available version of a dependency
#[derive(Debug, Clone)]
pub struct VersionResolver {
    cache: IndexCache,
}

impl VersionResolver {
    /// Create a resolver reading indexes from `cache`
    pub fn new(cache: IndexCache) -> Self {
        Self { cache }
    }

    /// Latest version of `dependency`
    pub fn resolve(&self, dependency: &Dependency) -> Result<Version, ResolveError> {
        match dependency.local_path() {
            Some(path) => {
                let local_error = |source| ResolveError::LocalChart {
                    name: dependency.name.clone(),
                    source: Box::new(source),
                };
                let metadata = ChartMetadata::load(&path).map_err(local_error)?;
                metadata.semver(&path).map_err(local_error)
            }
            None => self.resolve_remote(dependency),
        }
    }

    fn resolve_remote(&self, dependency: &Dependency) -> Result<Version, ResolveError> {
        let index = self.cache.load(&dependency.repository)?;
        match index.latest_stable(&dependency.name) {
            Lookup::Found(version) => Ok(version),
            Lookup::NotListed => Err(ResolveError::chart_not_found(
                &dependency.name,
                &dependency.repository,
            )),
            Lookup::NoStableVersion => Err(ResolveError::NoVersionAvailable {
                name: dependency.name.clone(),
                repository: dependency.repository.clone(),
            }),
        }
    }
}

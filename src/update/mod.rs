//! Outdated dependency detection
//!
//! This module provides:
//! - Dependency filter configuration from CLI args
//! - The detector that compares pinned and latest versions

mod filter;

pub use filter::DependencyFilter;

use crate::domain::{
    parse_version, sort_by_name, Dependency, OutdatedDependency, SkipReason, SkippedDependency,
};
use crate::resolver::VersionResolver;

/// Result of checking a set of dependencies
#[derive(Debug, Clone, Default)]
pub struct Detection {
    /// Dependencies with a newer version available, sorted by name
    pub outdated: Vec<OutdatedDependency>,
    /// Dependencies that could not be checked
    pub skipped: Vec<SkippedDependency>,
}

/// Compares pinned versions against the latest resolvable ones
pub struct OutdatedDetector<'a> {
    resolver: &'a VersionResolver,
}

impl<'a> OutdatedDetector<'a> {
    /// Create a new OutdatedDetector
    pub fn new(resolver: &'a VersionResolver) -> Self {
        Self { resolver }
    }

    /// Check one dependency
    pub fn check(&self, dependency: &Dependency) -> Result<Option<OutdatedDependency>, SkipReason> {
        let current = parse_version(&dependency.version)
            .map_err(|e| SkipReason::InvalidVersion(format!("{}: {}", dependency.version, e)))?;
        let latest = self
            .resolver
            .resolve(dependency)
            .map_err(|e| SkipReason::ResolutionFailed(e.to_string()))?;
        Ok(OutdatedDependency::detect(dependency.clone(), current, latest))
    }

    /// Check every dependency; failures are logged and skipped
    pub fn detect(&self, dependencies: &[Dependency]) -> Detection {
        let mut detection = Detection::default();

        for dependency in dependencies {
            match self.check(dependency) {
                Ok(Some(outdated)) => {
                    tracing::debug!("{} is outdated", outdated);
                    detection.outdated.push(outdated);
                }
                Ok(None) => tracing::debug!(dependency = %dependency, "up to date"),
                Err(reason) => {
                    tracing::debug!(dependency = %dependency, "skipping: {}", reason);
                    detection.skipped.push(SkippedDependency {
                        dependency: dependency.clone(),
                        reason,
                    });
                }
            }
        }

        sort_by_name(&mut detection.outdated);
        detection
    }
}

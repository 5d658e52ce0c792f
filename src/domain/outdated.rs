//! Outdated detection result types

use super::{Dependency, Severity};
use semver::Version;
use std::fmt;

/// Reason why a dependency was left out of the outdated set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The pinned version is not valid semver
    InvalidVersion(String),
    /// The latest version could not be determined
    ResolutionFailed(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::InvalidVersion(msg) => write!(f, "invalid version: {}", msg),
            SkipReason::ResolutionFailed(msg) => write!(f, "resolution failed: {}", msg),
        }
    }
}

/// A dependency that could not be evaluated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedDependency {
    pub dependency: Dependency,
    pub reason: SkipReason,
}

/// A dependency whose repository offers a newer version than the pinned one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutdatedDependency {
    /// The dependency as loaded from the manifest
    pub dependency: Dependency,
    /// Parsed pinned version
    pub current_version: Version,
    /// Latest available version
    pub latest_version: Version,
}

impl OutdatedDependency {
    /// Returns an entry only if `latest` is strictly newer than `current`
    pub fn detect(dependency: Dependency, current: Version, latest: Version) -> Option<Self> {
        (latest > current).then_some(Self {
            dependency,
            current_version: current,
            latest_version: latest,
        })
    }

    /// Returns the chart name
    pub fn name(&self) -> &str {
        &self.dependency.name
    }

    /// Severity of the pending change
    pub fn severity(&self) -> Severity {
        Severity::between(&self.current_version, &self.latest_version)
    }
}

impl fmt::Display for OutdatedDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} → {}",
            self.dependency.display_name(),
            self.current_version,
            self.latest_version
        )
    }
}

/// Sort results ascending by chart name (ordinal, stable)
pub fn sort_by_name(results: &mut [OutdatedDependency]) {
    results.sort_by(|a, b| a.dependency.name.cmp(&b.dependency.name));
}

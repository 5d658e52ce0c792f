//! Outdated report for a single chart

use super::{OutdatedDependency, Severity, SkippedDependency};
use std::path::PathBuf;

/// Everything the detector learned about a chart's dependencies
#[derive(Debug, Clone, Default)]
pub struct OutdatedReport {
    /// Chart directory
    pub chart_path: PathBuf,
    /// Outdated dependencies, sorted by name
    pub outdated: Vec<OutdatedDependency>,
    /// Dependencies that could not be evaluated
    pub skipped: Vec<SkippedDependency>,
    /// False when the chart has no requirements file at all
    pub has_requirements: bool,
}

impl OutdatedReport {
    /// Creates an empty report for a chart without requirements
    pub fn no_requirements(chart_path: impl Into<PathBuf>) -> Self {
        Self {
            chart_path: chart_path.into(),
            ..Self::default()
        }
    }

    /// Returns true if at least one dependency is outdated
    pub fn has_outdated(&self) -> bool {
        !self.outdated.is_empty()
    }

    /// Maximum severity across all outdated dependencies
    pub fn max_severity(&self) -> Severity {
        Severity::aggregate(self.outdated.iter().map(OutdatedDependency::severity))
    }
}

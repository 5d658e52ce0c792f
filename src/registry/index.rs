//! Helm repository index documents
//!
//! Only the parts needed for version lookup are modeled:
//!
//! ```yaml
//! apiVersion: v1
//! entries:
//!   redis:
//!     - version: 1.2.0
//!       urls: [...]
//! ```

use crate::domain::parse_version;
use semver::Version;
use serde::Deserialize;
use std::collections::HashMap;

/// A repository index: chart name to published versions
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RepositoryIndex {
    #[serde(default, rename = "apiVersion")]
    pub api_version: Option<String>,
    #[serde(default)]
    pub entries: HashMap<String, Vec<ChartEntry>>,
}

/// One published chart version
#[derive(Debug, Clone, Deserialize)]
pub struct ChartEntry {
    #[serde(default)]
    pub version: Option<serde_yaml::Value>,
}

impl ChartEntry {
    fn version_string(&self) -> Option<String> {
        match self.version.as_ref()? {
            serde_yaml::Value::String(s) => Some(s.clone()),
            serde_yaml::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// Outcome of an unconstrained lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// Highest stable version
    Found(Version),
    /// The index has no entries for the chart
    NotListed,
    /// Entries exist but none is a stable semver version
    NoStableVersion,
}

impl RepositoryIndex {
    /// Parse an index document
    pub fn parse(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// Returns true if the index lists `chart`
    pub fn contains(&self, chart: &str) -> bool {
        self.entries.get(chart).is_some_and(|e| !e.is_empty())
    }

    /// Highest stable version of `chart`.
    ///
    /// Pre-releases and unparseable versions are ignored, as with an
    /// unconstrained `*` query.
    pub fn latest_stable(&self, chart: &str) -> Lookup {
        let Some(entries) = self.entries.get(chart).filter(|e| !e.is_empty()) else {
            return Lookup::NotListed;
        };

        entries
            .iter()
            .filter_map(ChartEntry::version_string)
            .filter_map(|raw| parse_version(&raw).ok())
            .filter(|v| v.pre.is_empty())
            .max()
            .map_or(Lookup::NoStableVersion, Lookup::Found)
    }
}

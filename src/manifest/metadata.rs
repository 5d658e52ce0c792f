//! Chart.yaml loading and version bumps

use crate::domain::{parse_version, Severity};
use crate::error::ManifestError;
use crate::manifest::yaml::to_yaml_with_indent;
use crate::manifest::{read_chart_file, write_atomic, METADATA_FILENAME};
use semver::Version;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Chart metadata; only the fields this tool reads are typed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartMetadata {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl ChartMetadata {
    /// Path of Chart.yaml inside a chart
    pub fn path(chart_path: &Path) -> PathBuf {
        chart_path.join(METADATA_FILENAME)
    }

    /// Load Chart.yaml from a chart directory
    pub fn load(chart_path: &Path) -> Result<Self, ManifestError> {
        let path = Self::path(chart_path);
        let content = read_chart_file(&path)?;
        let metadata: Self = serde_yaml::from_str(&content)
            .map_err(|e| ManifestError::parse_error(&path, e.to_string()))?;
        Ok(metadata)
    }

    /// Parsed chart version
    pub fn semver(&self, chart_path: &Path) -> Result<Version, ManifestError> {
        let path = Self::path(chart_path);
        if self.version.trim().is_empty() {
            return Err(ManifestError::MissingField {
                path,
                field: "version",
            });
        }
        parse_version(&self.version).map_err(|e| ManifestError::InvalidChartVersion {
            path,
            version: self.version.clone(),
            message: e.to_string(),
        })
    }
}

/// Name of the chart at `chart_path`
pub fn chart_name(chart_path: &Path) -> Result<String, ManifestError> {
    let metadata = ChartMetadata::load(chart_path)?;
    if metadata.name.trim().is_empty() {
        return Err(ManifestError::MissingField {
            path: ChartMetadata::path(chart_path),
            field: "name",
        });
    }
    Ok(metadata.name)
}

/// Bump the chart's own version by `severity` and rewrite Chart.yaml.
///
/// Returns the version now on disk. `Severity::None` leaves the file untouched.
/// A rewritten Chart.yaml is re-emitted from its parsed values: keys come out
/// sorted, `indent` applies to nested sequences, and comments are dropped.
pub fn increment_chart_version(
    chart_path: &Path,
    severity: Severity,
    indent: usize,
) -> Result<Version, ManifestError> {
    let mut metadata = ChartMetadata::load(chart_path)?;
    let current = metadata.semver(chart_path)?;
    if severity == Severity::None {
        return Ok(current);
    }

    let next = severity.bump(&current);
    metadata.version = next.to_string();

    let path = ChartMetadata::path(chart_path);
    let content = to_yaml_with_indent(&metadata, indent)
        .map_err(|e| ManifestError::parse_error(&path, e.to_string()))?;
    write_atomic(&path, &content)?;

    tracing::debug!(chart = %chart_path.display(), from = %current, to = %next, "incremented chart version");
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn chart(content: &str) -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(METADATA_FILENAME), content).unwrap();
        dir
    }

    #[test]
    fn test_load_metadata() {
        let dir = chart("apiVersion: v1\nname: app\nversion: 0.3.1\ndescription: demo\n");
        let metadata = ChartMetadata::load(dir.path()).unwrap();
        assert_eq!(metadata.name, "app");
        assert_eq!(metadata.version, "0.3.1");
        assert!(metadata.extra.contains_key("apiVersion"));
    }

    #[test]
    fn test_load_missing_metadata() {
        let dir = TempDir::new().unwrap();
        let err = ChartMetadata::load(dir.path()).unwrap_err();
        assert!(matches!(err, ManifestError::ReadError { .. }));
    }

    #[test]
    fn test_chart_name_missing() {
        let dir = chart("version: 1.0.0\n");
        let err = chart_name(dir.path()).unwrap_err();
        assert!(matches!(err, ManifestError::MissingField { field: "name", .. }));
    }

    #[test]
    fn test_increment_patch() {
        let dir = chart("apiVersion: v1\nname: app\nversion: 0.3.1\n");
        let next = increment_chart_version(dir.path(), Severity::Patch, 4).unwrap();
        assert_eq!(next.to_string(), "0.3.2");

        let content = fs::read_to_string(dir.path().join(METADATA_FILENAME)).unwrap();
        assert_eq!(content, "apiVersion: v1\nname: app\nversion: 0.3.2\n");
    }

    #[test]
    fn test_increment_sorts_keys_and_drops_comments() {
        let dir = chart("version: 0.1.0\n# owned by platform\nname: app # chart\napiVersion: v1\n");
        increment_chart_version(dir.path(), Severity::Patch, 4).unwrap();

        let content = fs::read_to_string(dir.path().join(METADATA_FILENAME)).unwrap();
        assert_eq!(content, "apiVersion: v1\nname: app\nversion: 0.1.1\n");
    }

    #[test]
    fn test_increment_major_clears_prerelease() {
        let dir = chart("name: app\nversion: 1.4.2-rc.1+build.5\n");
        let next = increment_chart_version(dir.path(), Severity::Major, 4).unwrap();
        assert_eq!(next.to_string(), "2.0.0");
    }

    #[test]
    fn test_increment_shorter_version_is_rewritten() {
        let dir = chart("name: app\nversion: 10.20.30\ndescription: a long line that used to leave stale bytes\n");
        increment_chart_version(dir.path(), Severity::Minor, 4).unwrap();
        let reloaded = ChartMetadata::load(dir.path()).unwrap();
        assert_eq!(reloaded.version, "10.21.0");
        assert_eq!(
            reloaded.extra.get("description"),
            Some(&serde_json::Value::String(
                "a long line that used to leave stale bytes".to_string()
            ))
        );
    }

    #[test]
    fn test_increment_none_leaves_file() {
        let original = "name: app\nversion: v1.2\n";
        let dir = chart(original);
        let version = increment_chart_version(dir.path(), Severity::None, 4).unwrap();
        assert_eq!(version.to_string(), "1.2.0");
        let content = fs::read_to_string(dir.path().join(METADATA_FILENAME)).unwrap();
        assert_eq!(content, original);
    }

    #[test]
    fn test_increment_invalid_version() {
        let dir = chart("name: app\nversion: latest\n");
        let err = increment_chart_version(dir.path(), Severity::Patch, 4).unwrap_err();
        assert!(matches!(err, ManifestError::InvalidChartVersion { .. }));
    }
}

//! requirements.yaml parsing and dependency loading

use crate::domain::{absolutize_locator, Dependency};
use crate::error::ManifestError;
use crate::manifest::yaml::to_yaml_with_indent;
use crate::manifest::{read_chart_file, REQUIREMENTS_FILENAME};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// One dependency record as stored on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementEntry {
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub version: String,
    #[serde(default)]
    pub repository: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(
        default,
        rename = "import-values",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub import_values: Vec<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Keys this tool does not know about, carried through unchanged
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl RequirementEntry {
    /// Convert into a domain dependency, anchoring local locators at `chart_path`
    pub fn to_dependency(&self, chart_path: &Path) -> Dependency {
        Dependency {
            name: self.name.clone(),
            version: self.version.clone(),
            repository: absolutize_locator(chart_path, &self.repository),
            alias: self.alias.clone(),
        }
    }
}

/// The requirements.yaml document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Requirements {
    #[serde(default)]
    pub dependencies: Vec<RequirementEntry>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Requirements {
    /// Path of requirements.yaml inside a chart
    pub fn path(chart_path: &Path) -> PathBuf {
        chart_path.join(REQUIREMENTS_FILENAME)
    }

    /// Load requirements.yaml exactly as written.
    ///
    /// Returns `ManifestError::NotFound` when the chart has no requirements file.
    pub fn load(chart_path: &Path) -> Result<Self, ManifestError> {
        let path = Self::path(chart_path);
        if !path.is_file() {
            return Err(ManifestError::not_found(chart_path));
        }
        let content = read_chart_file(&path)?;
        Self::parse(&content, &path)
    }

    /// Parse requirements from YAML content
    pub fn parse(content: &str, path: &Path) -> Result<Self, ManifestError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| ManifestError::parse_error(path, e.to_string()))
    }

    /// Sort entries by chart name; ties keep their original order
    pub fn sort_alphabetically(&mut self) {
        self.dependencies.sort_by(|a, b| a.name.cmp(&b.name));
    }

    /// Encode as YAML with the given indent width
    pub fn to_yaml(&self, indent: usize, path: &Path) -> Result<String, ManifestError> {
        to_yaml_with_indent(self, indent).map_err(|e| ManifestError::parse_error(path, e.to_string()))
    }
}

/// Load the dependencies a chart declares, with local locators made absolute
pub fn load_dependencies(chart_path: &Path) -> Result<Vec<Dependency>, ManifestError> {
    let requirements = Requirements::load(chart_path)?;
    let dependencies = requirements
        .dependencies
        .iter()
        .map(|entry| entry.to_dependency(chart_path))
        .collect();
    Ok(dependencies)
}

/// Accepts unquoted numeric versions such as `version: 1.2`
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Null => Ok(String::new()),
        other => Err(D::Error::custom(format!("expected a version string, found {}", other))),
    }
}

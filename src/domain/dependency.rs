//! Chart dependency as declared in requirements.yaml

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Repository locator prefix marking a dependency on a chart on disk
pub const FILE_SCHEME: &str = "file://";

/// A chart dependency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// Chart name
    pub name: String,
    /// Pinned version as written in the manifest
    pub version: String,
    /// Repository URL or `file://` locator
    pub repository: String,
    /// Optional display alias
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl Dependency {
    /// Creates a new dependency
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        repository: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            repository: repository.into(),
            alias: None,
        }
    }

    /// Sets the alias (builder pattern)
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Returns true if the dependency points at a chart on disk
    pub fn is_local(&self) -> bool {
        is_local_locator(&self.repository)
    }

    /// Path of the referenced chart for local dependencies
    pub fn local_path(&self) -> Option<PathBuf> {
        self.repository.strip_prefix(FILE_SCHEME).map(PathBuf::from)
    }

    /// Alias if set, chart name otherwise
    pub fn display_name(&self) -> &str {
        match self.alias.as_deref() {
            Some(alias) if !alias.is_empty() => alias,
            _ => &self.name,
        }
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{} [{}]", self.name, self.version, self.repository)
    }
}

/// Returns true if the repository locator uses the `file://` scheme
pub fn is_local_locator(repository: &str) -> bool {
    repository.starts_with(FILE_SCHEME)
}

/// Rewrites a relative `file://` locator so it is anchored at the chart directory.
///
/// Remote locators and already absolute local paths are returned unchanged.
pub fn absolutize_locator(chart_path: &Path, repository: &str) -> String {
    let Some(relative) = repository.strip_prefix(FILE_SCHEME) else {
        return repository.to_string();
    };
    let relative = Path::new(relative);
    if relative.is_absolute() {
        return repository.to_string();
    }
    let joined = clean_path(&chart_path.join(relative));
    format!("{}{}", FILE_SCHEME, joined.display())
}

/// Lexically resolves `.` and `..` components
fn clean_path(path: &Path) -> PathBuf {
    use std::path::Component;

    let mut cleaned = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !cleaned.pop() {
                    cleaned.push("..");
                }
            }
            other => cleaned.push(other.as_os_str()),
        }
    }
    cleaned
}

//! Manifest file writing and update operations
//!
//! This module provides:
//! - ManifestWriter for applying latest versions to requirements.yaml
//! - Deterministic output (entries sorted by name, keys sorted, fixed indent)
//! - Atomic replacement of chart files

use crate::domain::{absolutize_locator, OutdatedDependency};
use crate::error::ManifestError;
use crate::manifest::requirements::Requirements;
use crate::manifest::yaml::DEFAULT_INDENT;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Writer for requirements.yaml that applies latest versions
#[derive(Debug, Clone, Copy)]
pub struct ManifestWriter {
    /// Indent width of the emitted YAML
    indent: usize,
}

/// Result of applying updates to a manifest file
#[derive(Debug)]
pub struct WriteResult {
    /// Path to the manifest file
    pub path: PathBuf,
    /// Number of manifest entries whose version was replaced
    pub updates_applied: usize,
    /// Results that matched no manifest entry
    pub unmatched: Vec<String>,
    /// Whether the file content changed
    pub file_modified: bool,
}

impl WriteResult {
    fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            updates_applied: 0,
            unmatched: Vec::new(),
            file_modified: false,
        }
    }

    /// Returns true if any entry was updated
    pub fn has_updates(&self) -> bool {
        self.updates_applied > 0
    }
}

impl Default for ManifestWriter {
    fn default() -> Self {
        Self::new(DEFAULT_INDENT)
    }
}

impl ManifestWriter {
    /// Create a new ManifestWriter
    pub fn new(indent: usize) -> Self {
        Self { indent }
    }

    /// Rewrite requirements.yaml so every matching entry pins its latest version.
    ///
    /// The manifest is reloaded from disk, so entries outside the caller's filter
    /// keep their versions. Entries match on name and repository, where the
    /// on-disk repository is compared after local locators are made absolute.
    pub fn apply(
        &self,
        chart_path: &Path,
        results: &[OutdatedDependency],
    ) -> Result<WriteResult, ManifestError> {
        let path = Requirements::path(chart_path);
        let mut result = WriteResult::new(&path);

        let original = super::read_chart_file(&path)?;
        let mut requirements = Requirements::parse(&original, &path)?;

        for outdated in results {
            let latest = outdated.latest_version.to_string();
            let mut matched = false;
            for entry in requirements.dependencies.iter_mut() {
                if entry.name != outdated.dependency.name {
                    continue;
                }
                if absolutize_locator(chart_path, &entry.repository) != outdated.dependency.repository {
                    continue;
                }
                entry.version = latest.clone();
                matched = true;
                result.updates_applied += 1;
            }
            if !matched {
                tracing::warn!(
                    dependency = %outdated.dependency,
                    "no matching entry in {}",
                    path.display()
                );
                result.unmatched.push(outdated.name().to_string());
            }
        }

        requirements.sort_alphabetically();
        let content = requirements.to_yaml(self.indent, &path)?;

        if content != original {
            write_atomic(&path, &content)?;
            result.file_modified = true;
        }

        tracing::debug!(
            path = %path.display(),
            updated = result.updates_applied,
            modified = result.file_modified,
            "applied dependency updates"
        );
        Ok(result)
    }
}

/// Read a chart file to a string
pub fn read_chart_file(path: &Path) -> Result<String, ManifestError> {
    fs::read_to_string(path).map_err(|e| ManifestError::read_error(path, e))
}

/// Replace `path` with `content` through a sibling temporary file
pub fn write_atomic(path: &Path, content: &str) -> Result<(), ManifestError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = tempfile::NamedTempFile::new_in(dir).map_err(|e| ManifestError::write_error(path, e))?;
    temp.write_all(content.as_bytes())
        .and_then(|_| temp.as_file().sync_all())
        .map_err(|e| ManifestError::write_error(path, e))?;

    if let Ok(meta) = fs::metadata(path) {
        if let Err(e) = fs::set_permissions(temp.path(), meta.permissions()) {
            tracing::warn!(path = %path.display(), "failed to keep file permissions: {}", e);
        }
    }

    temp.persist(path)
        .map_err(|e| ManifestError::write_error(path, e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Dependency;
    use crate::manifest::REQUIREMENTS_FILENAME;
    use semver::Version;
    use tempfile::TempDir;

    const REPO_A: &str = "https://repo-a.example.com";
    const REPO_B: &str = "https://repo-b.example.com";

    fn chart(content: &str) -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(REQUIREMENTS_FILENAME), content).unwrap();
        dir
    }

    fn outdated(name: &str, current: &str, latest: &str, repo: &str) -> OutdatedDependency {
        OutdatedDependency::detect(
            Dependency::new(name, current, repo),
            Version::parse(current).unwrap(),
            Version::parse(latest).unwrap(),
        )
        .unwrap()
    }

    fn read(dir: &TempDir) -> String {
        fs::read_to_string(dir.path().join(REQUIREMENTS_FILENAME)).unwrap()
    }

    #[test]
    fn test_apply_updates_and_sorts() {
        let dir = chart(&format!(
            "dependencies:\n- name: redis\n  version: 1.0.0\n  repository: {REPO_A}\n- name: nginx\n  version: 2.0.0\n  repository: {REPO_A}\n"
        ));
        let result = ManifestWriter::new(4)
            .apply(dir.path(), &[outdated("redis", "1.0.0", "1.2.0", REPO_A)])
            .unwrap();

        assert_eq!(result.updates_applied, 1);
        assert!(result.file_modified);
        assert_eq!(
            read(&dir),
            format!(
                "dependencies:\n    - name: nginx\n      repository: {REPO_A}\n      version: 2.0.0\n    - name: redis\n      repository: {REPO_A}\n      version: 1.2.0\n"
            )
        );
    }

    #[test]
    fn test_apply_is_idempotent() {
        let dir = chart(&format!(
            "dependencies:\n- name: b\n  version: 1.0.0\n  repository: {REPO_A}\n- name: a\n  version: 1.0.0\n  repository: {REPO_A}\n"
        ));
        let results = [outdated("b", "1.0.0", "2.0.0", REPO_A)];
        let writer = ManifestWriter::default();

        writer.apply(dir.path(), &results).unwrap();
        let first = read(&dir);
        let second_result = writer.apply(dir.path(), &results).unwrap();
        let second = read(&dir);

        assert_eq!(first, second);
        assert!(!second_result.file_modified);
    }

    #[test]
    fn test_apply_matches_repository() {
        let dir = chart(&format!(
            "dependencies:\n- name: redis\n  version: 1.0.0\n  repository: {REPO_A}\n  alias: cache-a\n- name: redis\n  version: 1.0.0\n  repository: {REPO_B}\n  alias: cache-b\n"
        ));
        ManifestWriter::new(2)
            .apply(dir.path(), &[outdated("redis", "1.0.0", "3.0.0", REPO_B)])
            .unwrap();

        let reqs = Requirements::load(dir.path()).unwrap();
        assert_eq!(reqs.dependencies[0].version, "1.0.0");
        assert_eq!(reqs.dependencies[1].version, "3.0.0");
    }

    #[test]
    fn test_apply_keeps_relative_local_locators() {
        let dir = chart("dependencies:\n- name: common\n  version: 0.1.0\n  repository: file://../common\n");
        let absolute = absolutize_locator(dir.path(), "file://../common");
        let result = ManifestWriter::default()
            .apply(dir.path(), &[outdated("common", "0.1.0", "0.2.0", &absolute)])
            .unwrap();

        assert_eq!(result.updates_applied, 1);
        let reqs = Requirements::load(dir.path()).unwrap();
        assert_eq!(reqs.dependencies[0].repository, "file://../common");
        assert_eq!(reqs.dependencies[0].version, "0.2.0");
    }

    #[test]
    fn test_apply_preserves_extra_fields() {
        let dir = chart(&format!(
            "dependencies:\n- name: a\n  version: 1.0.0\n  repository: {REPO_A}\n  condition: a.enabled\n  import-values:\n  - child: x\n    parent: y\n  x-note: keep\n"
        ));
        ManifestWriter::default()
            .apply(dir.path(), &[outdated("a", "1.0.0", "1.0.1", REPO_A)])
            .unwrap();

        let reqs = Requirements::load(dir.path()).unwrap();
        let entry = &reqs.dependencies[0];
        assert_eq!(entry.condition.as_deref(), Some("a.enabled"));
        assert_eq!(entry.import_values.len(), 1);
        assert!(entry.extra.contains_key("x-note"));
    }

    #[test]
    fn test_apply_reports_unmatched() {
        let dir = chart(&format!(
            "dependencies:\n- name: a\n  version: 1.0.0\n  repository: {REPO_A}\n"
        ));
        let result = ManifestWriter::default()
            .apply(dir.path(), &[outdated("missing", "1.0.0", "2.0.0", REPO_A)])
            .unwrap();
        assert_eq!(result.unmatched, vec!["missing"]);
        assert!(!result.has_updates());
    }

    #[test]
    fn test_apply_missing_manifest() {
        let dir = TempDir::new().unwrap();
        let err = ManifestWriter::default().apply(dir.path(), &[]).unwrap_err();
        assert!(matches!(err, ManifestError::ReadError { .. }));
    }

    #[test]
    fn test_write_atomic_replaces_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("file.yaml");
        fs::write(&path, "a very long original content\n").unwrap();
        write_atomic(&path, "short\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "short\n");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_write_atomic_keeps_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Chart.yaml");
        fs::write(&path, "name: app\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();

        write_atomic(&path, "name: app\nversion: 0.1.1\n").unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o640);
    }
}

//! Severity of a version change

use semver::{BuildMetadata, Prerelease, Version};
use std::fmt;
use std::str::FromStr;

/// Which semver segment a change touches, ordered None < Patch < Minor < Major
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Severity {
    /// Versions are equal in all numeric segments
    #[default]
    None,
    /// Patch segment changed
    Patch,
    /// Minor segment changed (features)
    Minor,
    /// Major segment changed (breaking)
    Major,
}

impl Severity {
    /// Classify the change from `old` to `new`
    pub fn between(old: &Version, new: &Version) -> Self {
        if new.major > old.major {
            Severity::Major
        } else if new.minor > old.minor {
            Severity::Minor
        } else if new.patch > old.patch {
            Severity::Patch
        } else {
            Severity::None
        }
    }

    /// Maximum severity of a set of changes; `None` when empty
    pub fn aggregate(changes: impl IntoIterator<Item = Severity>) -> Self {
        changes.into_iter().max().unwrap_or_default()
    }

    /// Returns true if a change of this severity should go through review
    pub fn requires_review(self) -> bool {
        self >= Severity::Minor
    }

    /// Increment `version` by this severity.
    ///
    /// Patch on a pre-release only drops the pre-release (`1.2.3-rc.1` → `1.2.3`).
    pub fn bump(self, version: &Version) -> Version {
        let mut next = version.clone();
        match self {
            Severity::None => return next,
            Severity::Patch => {
                if version.pre.is_empty() {
                    next.patch += 1;
                }
            }
            Severity::Minor => {
                next.minor += 1;
                next.patch = 0;
            }
            Severity::Major => {
                next.major += 1;
                next.minor = 0;
                next.patch = 0;
            }
        }
        next.pre = Prerelease::EMPTY;
        next.build = BuildMetadata::EMPTY;
        next
    }

    /// Get the plain label
    pub fn label(self) -> &'static str {
        match self {
            Severity::None => "none",
            Severity::Patch => "patch",
            Severity::Minor => "minor",
            Severity::Major => "major",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Severity::None),
            "patch" => Ok(Severity::Patch),
            "minor" => Ok(Severity::Minor),
            "major" => Ok(Severity::Major),
            other => Err(format!(
                "invalid severity '{}': expected 'patch', 'minor', 'major' or 'none'",
                other
            )),
        }
    }
}

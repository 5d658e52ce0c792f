//! Semantic version parsing
//!
//! Chart versions are semver, but manifests in the wild often carry a
//! leading `v` or drop trailing segments (`1.2`). Both are accepted and
//! normalized; anything else is rejected.

use semver::Version;

/// Parse a chart version string
pub fn parse_version(raw: &str) -> Result<Version, semver::Error> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix('v').unwrap_or(trimmed);

    match Version::parse(trimmed) {
        Ok(version) => Ok(version),
        Err(err) => {
            let core_end = trimmed.find(['-', '+']).unwrap_or(trimmed.len());
            let (core, rest) = trimmed.split_at(core_end);
            let segments: Vec<&str> = core.split('.').collect();

            let numeric = segments
                .iter()
                .all(|s| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()));
            if !numeric || segments.len() >= 3 {
                return Err(err);
            }

            let padded = format!("{}{}{}", core, ".0".repeat(3 - segments.len()), rest);
            Version::parse(&padded).map_err(|_| err)
        }
    }
}

//! Chart file loading and writing
//!
//! This module provides functionality to:
//! - Load declared dependencies from requirements.yaml
//! - Read and bump the chart version in Chart.yaml
//! - Rewrite requirements.yaml with deterministic ordering and indentation
//! - Refresh requirements.lock through helm

mod lock;
mod metadata;
mod requirements;
mod writer;
pub mod yaml;

pub use lock::sync_lock;
pub use metadata::{chart_name, increment_chart_version, ChartMetadata};
pub use requirements::{load_dependencies, RequirementEntry, Requirements};
pub use writer::{read_chart_file, write_atomic, ManifestWriter, WriteResult};
pub use yaml::DEFAULT_INDENT;

/// Dependency manifest inside a chart directory
pub const REQUIREMENTS_FILENAME: &str = "requirements.yaml";

/// Chart metadata inside a chart directory
pub const METADATA_FILENAME: &str = "Chart.yaml";

//! Core domain models
//!
//! This module contains the fundamental types used throughout the application:
//! - Chart dependencies and repository locators
//! - Version parsing and change severity
//! - Outdated detection results and the per-chart report

mod dependency;
mod outdated;
mod severity;
mod summary;
mod version;

pub use dependency::{absolutize_locator, is_local_locator, Dependency, FILE_SCHEME};
pub use outdated::{sort_by_name, OutdatedDependency, SkipReason, SkippedDependency};
pub use severity::Severity;
pub use summary::OutdatedReport;
pub use version::parse_version;

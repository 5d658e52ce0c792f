//! Output formatting for outdated reports
//!
//! This module provides:
//! - Text output for human-readable display
//! - Headings shared by the list and update commands

mod text;

pub use text::TextFormatter;

/// Printed when no dependency is outdated
pub const NOTHING_OUTDATED: &str = "All charts up to date.";

/// Default maximum column width of the report table
pub const DEFAULT_MAX_COLUMN_WIDTH: usize = 60;

/// Heading printed above the report table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heading {
    /// `list` command
    Outdated,
    /// `update` command
    Updating,
}

impl Heading {
    /// Heading text
    pub fn text(self) -> &'static str {
        match self {
            Heading::Outdated => "The following dependencies are outdated:",
            Heading::Updating => "Updating the following dependencies to their latest version:",
        }
    }
}

//! Text output formatter for human-readable display
//!
//! This module provides:
//! - The outdated dependency table (ALIAS, VERSION, LATEST_VERSION, REPOSITORY)
//! - Column width capping with truncation
//! - Severity coloring of the latest version
//! - Skipped dependency display with reasons

use crate::domain::{OutdatedDependency, Severity, SkippedDependency};
use crate::output::{Heading, NOTHING_OUTDATED};
use colored::Colorize;
use std::io::Write;

const HEADER: [&str; 4] = ["ALIAS", "VERSION", "LATEST_VERSION", "REPOSITORY"];
const COLUMN_GAP: &str = "  ";
const ELLIPSIS: &str = "...";

/// Text formatter for the outdated report
pub struct TextFormatter {
    /// Maximum width of any column
    max_column_width: usize,
    /// Whether to use colors
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter with color option
    pub fn with_color(max_column_width: usize, color: bool) -> Self {
        Self {
            max_column_width,
            color,
        }
    }

    /// Write the report table, or the up-to-date notice when `results` is empty
    pub fn format_outdated(
        &self,
        results: &[OutdatedDependency],
        heading: Heading,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        if results.is_empty() {
            return writeln!(writer, "{}", NOTHING_OUTDATED);
        }

        let rows: Vec<[String; 4]> = results
            .iter()
            .map(|r| {
                [
                    r.dependency.display_name().to_string(),
                    r.dependency.version.clone(),
                    r.latest_version.to_string(),
                    r.dependency.repository.clone(),
                ]
            })
            .collect();
        let widths = self.column_widths(&rows);

        if self.color {
            writeln!(writer, "{}", heading.text().bold())?;
        } else {
            writeln!(writer, "{}", heading.text())?;
        }

        let header = HEADER.map(String::from);
        writeln!(writer, "{}", self.render_row(&header, &widths, None))?;
        for (row, result) in rows.iter().zip(results) {
            writeln!(
                writer,
                "{}",
                self.render_row(row, &widths, Some(result.severity()))
            )?;
        }
        Ok(())
    }

    /// Write the dependencies that could not be checked
    pub fn format_skipped(
        &self,
        skipped: &[SkippedDependency],
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        if skipped.is_empty() {
            return Ok(());
        }

        let label = "Skipped:";
        if self.color {
            writeln!(writer, "{}", label.dimmed())?;
        } else {
            writeln!(writer, "{}", label)?;
        }
        let name_len = skipped
            .iter()
            .map(|s| s.dependency.display_name().len())
            .max()
            .unwrap_or(0);
        for skip in skipped {
            let line = format!(
                "  {:width$} ({})",
                skip.dependency.display_name(),
                skip.reason,
                width = name_len
            );
            if self.color {
                writeln!(writer, "{}", line.dimmed())?;
            } else {
                writeln!(writer, "{}", line)?;
            }
        }
        Ok(())
    }

    fn column_widths(&self, rows: &[[String; 4]]) -> [usize; 4] {
        let mut widths = HEADER.map(|h| h.chars().count());
        for row in rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }
        widths.map(|w| w.min(self.max_column_width.max(1)))
    }

    fn render_row(&self, row: &[String; 4], widths: &[usize; 4], severity: Option<Severity>) -> String {
        let mut cells = Vec::with_capacity(row.len());
        for (index, (cell, width)) in row.iter().zip(widths).enumerate() {
            let text = truncate(cell, *width);
            let last = index == row.len() - 1;
            let padded = if last {
                text
            } else {
                format!("{:width$}", text, width = width)
            };
            cells.push(match severity {
                Some(severity) if index == 2 && self.color => colored_by_severity(&padded, severity),
                _ => padded,
            });
        }
        cells.join(COLUMN_GAP)
    }
}

fn colored_by_severity(text: &str, severity: Severity) -> String {
    match severity {
        Severity::Major => text.red().bold().to_string(),
        Severity::Minor => text.yellow().to_string(),
        Severity::Patch => text.green().to_string(),
        Severity::None => text.to_string(),
    }
}

/// Cut `text` to `width` characters, marking the cut with an ellipsis
fn truncate(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len <= width {
        return text.to_string();
    }
    if width <= ELLIPSIS.len() {
        return text.chars().take(width).collect();
    }
    let kept: String = text.chars().take(width - ELLIPSIS.len()).collect();
    format!("{}{}", kept, ELLIPSIS)
}

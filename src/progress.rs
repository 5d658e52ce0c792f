//! Spinner shown on stderr while repository indexes refresh.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const TICK_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// Spinner for one index refresh round; cleared on `finish` or drop
pub struct RefreshSpinner {
    bar: Option<ProgressBar>,
}

impl RefreshSpinner {
    /// Start spinning for `repositories` unless disabled or there is nothing to refresh
    pub fn start(repositories: &[String], enabled: bool) -> Self {
        if !enabled || repositories.is_empty() {
            return Self { bar: None };
        }

        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_chars(TICK_CHARS)
            .template("{spinner:.cyan} {msg}")
        {
            bar.set_style(style);
        }
        bar.set_message(refresh_message(repositories.len()));
        bar.enable_steady_tick(Duration::from_millis(80));
        Self { bar: Some(bar) }
    }

    pub fn is_active(&self) -> bool {
        self.bar.is_some()
    }

    pub fn finish(mut self) {
        self.clear();
    }

    fn clear(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

impl Drop for RefreshSpinner {
    fn drop(&mut self) {
        self.clear();
    }
}

fn refresh_message(count: usize) -> String {
    let noun = if count == 1 { "repository" } else { "repositories" };
    format!("Refreshing {} chart {}...", count, noun)
}

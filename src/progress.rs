//! Spinner shown while the Gradle release feed is fetched

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner for feed requests, cleared when dropped
pub struct Progress {
    /// Disabled in quiet and JSON mode
    enabled: bool,
    bar: Option<ProgressBar>,
}

impl Progress {
    pub fn new(enabled: bool) -> Self {
        Self { enabled, bar: None }
    }

    pub fn disabled() -> Self {
        Self::new(false)
    }

    /// Start spinning for a request to `feed`
    pub fn fetching(&mut self, feed: &str) {
        if !self.enabled {
            return;
        }

        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.cyan} {msg} {elapsed:.dim}")
        {
            spinner.set_style(style);
        }
        spinner.set_message(format!("Fetching Gradle releases from {}", feed));
        spinner.enable_steady_tick(Duration::from_millis(80));
        self.bar = Some(spinner);
    }

    pub fn is_active(&self) -> bool {
        self.bar.is_some()
    }

    /// Stop and clear the spinner
    pub fn finish(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

impl Drop for Progress {
    fn drop(&mut self) {
        self.finish();
    }
}

//! Spinner feedback while the workflow waits on the repository host

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner shown during remote calls; a no-op under `--quiet`
pub struct Progress {
    enabled: bool,
    bar: Option<ProgressBar>,
}

impl Progress {
    pub fn new(enabled: bool) -> Self {
        Self { enabled, bar: None }
    }

    /// Replace the current spinner with one showing `message`
    pub fn spinner(&mut self, message: &str) {
        if !self.enabled {
            return;
        }
        self.finish_and_clear();

        let style = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        let bar = ProgressBar::new_spinner().with_style(style);
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));
        self.bar = Some(bar);
    }

    /// Remove the spinner from the terminal
    pub fn finish_and_clear(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

impl Drop for Progress {
    fn drop(&mut self) {
        self.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_never_draws() {
        let mut progress = Progress::new(false);
        progress.spinner("Downloading package.json");
        assert!(progress.bar.is_none());
    }

    #[test]
    fn test_spinner_replaced_then_cleared() {
        let mut progress = Progress::new(true);
        progress.spinner("Creating branch");
        progress.spinner("Opening pull request");
        assert!(progress.bar.is_some());
        progress.finish_and_clear();
        assert!(progress.bar.is_none());
    }
}

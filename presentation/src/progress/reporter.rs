//! Progress reporting while a provider is thinking

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use juke_domain::{ModelName, ProviderKind};
use std::time::Duration;

/// Spinner shown while a song request is outstanding
pub struct ProgressReporter {
    bar: ProgressBar,
}

impl ProgressReporter {
    /// Start spinning. A hidden reporter draws nothing.
    pub fn start(visible: bool, provider: ProviderKind, model: &ModelName) -> Self {
        let bar = if visible {
            ProgressBar::new_spinner()
        } else {
            ProgressBar::hidden()
        };
        bar.set_style(Self::spinner_style());
        bar.set_prefix(provider.to_string());
        bar.set_message(format!("asking {} for songs...", model));
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    pub fn finish(self) {
        self.bar.finish_and_clear();
    }

    pub fn cancelled(self) {
        self.bar
            .finish_with_message(format!("{}", "cancelled".yellow()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_reporter_finishes() {
        let reporter = ProgressReporter::start(false, ProviderKind::Groq, &ModelName::default());
        reporter.finish();
    }
}

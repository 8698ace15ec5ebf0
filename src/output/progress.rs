//! Spinner shown on stderr while data is being gathered

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::cli::OutputFormat;

/// Start a spinner in pretty mode. Other formats get `None` so stdout/stderr
/// stay clean for scripts.
pub fn spinner(format: OutputFormat, message: &str) -> Option<ProgressBar> {
    if format != OutputFormat::Pretty {
        return None;
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    Some(spinner)
}

/// Update the message of an optional spinner
pub fn set_message(spinner: &Option<ProgressBar>, message: &str) {
    if let Some(spinner) = spinner {
        spinner.set_message(message.to_string());
    }
}

/// Clear an optional spinner before printing results
pub fn finish(spinner: Option<ProgressBar>) {
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
}

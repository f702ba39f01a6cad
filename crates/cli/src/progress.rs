//! Spinners for long-running steps

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::output::is_quiet;

/// Create a spinner; hidden in quiet mode
pub fn spinner(message: &str) -> ProgressBar {
    if is_quiet() {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
        .template("{spinner:.blue} {msg} {elapsed:.dim}")
    {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Stop a spinner and clear its line
pub fn finish(pb: &ProgressBar) {
    pb.finish_and_clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_lifecycle() {
        let pb = spinner("Building...");
        pb.set_message("Packaging...");
        finish(&pb);
        assert!(pb.is_finished());
    }
}

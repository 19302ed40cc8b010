//! Progress indicators
//!
//! A spinner for the blocking delete in `clean`. Hidden when stderr is not a
//! terminal or output is quiet.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

/// Create a spinner for indeterminate progress
pub fn spinner(message: &str, visible: bool) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if !visible {
        pb.set_draw_target(ProgressDrawTarget::hidden());
        return pb;
    }
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
        .template("{spinner:.blue} {msg}")
    {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Clear the spinner line
pub fn finish(pb: &ProgressBar) {
    pb.finish_and_clear();
}

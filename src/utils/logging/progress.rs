//! Progress reporting for the pipeline run
//!
//! Spinners come from the indicatif crate. They draw to stderr and stay hidden
//! when stderr is not a terminal.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Template for the pipeline spinner
pub const SPINNER_TEMPLATE: &str = "{spinner:.green} {elapsed_precise} {msg}";

/// Create a spinner for operations without a known length
///
/// # Arguments
/// * `message` - Optional message to display with the spinner
#[must_use]
pub fn create_spinner(message: Option<&str>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    match ProgressStyle::default_spinner().template(SPINNER_TEMPLATE) {
        Ok(style) => pb.set_style(style),
        Err(e) => log::debug!("Falling back to default spinner style: {e}"),
    }

    if let Some(msg) = message {
        pb.set_message(msg.to_string());
    }

    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Create a spinner that never draws, for library callers and tests
#[must_use]
pub fn create_hidden_spinner() -> ProgressBar {
    ProgressBar::hidden()
}

/// Finish a spinner and clear it from display
pub fn finish_and_clear(pb: &ProgressBar) {
    pb.finish_and_clear();
}

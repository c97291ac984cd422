//! Logging utilities
//!
//! Standard log lines for pipeline stages.

use std::path::Path;
use std::time::Duration;

/// Log the start of an operation on a file
///
/// # Arguments
/// * `operation` - Description of the operation
/// * `path` - Path of the file being operated on
pub fn log_operation_start(operation: &str, path: &Path) {
    log::info!("{} {}", operation, path.display());
}

/// Log the completion of an operation on a file
///
/// # Arguments
/// * `operation` - Past-tense description of the operation
/// * `path` - Path of the file that was operated on
/// * `rows` - Number of rows processed
/// * `elapsed` - Optional elapsed time
pub fn log_operation_complete(
    operation: &str,
    path: &Path,
    rows: usize,
    elapsed: Option<Duration>,
) {
    match elapsed {
        Some(duration) => log::info!(
            "Successfully {} {} rows at {} in {:?}",
            operation,
            rows,
            path.display(),
            duration
        ),
        None => log::info!("Successfully {} {} rows at {}", operation, rows, path.display()),
    }
}

/// Log the outcome of a transform stage
pub fn log_stage(stage: &str, rows_in: usize, rows_out: usize) {
    if rows_in == rows_out {
        log::info!("{stage}: {rows_out} rows");
    } else {
        log::info!(
            "{stage}: {rows_out} rows ({} dropped)",
            rows_in.saturating_sub(rows_out)
        );
    }
}

/// Log a warning, optionally tied to a path
pub fn log_warning(message: &str, path: Option<&Path>) {
    if let Some(path) = path {
        log::warn!("{}: {}", message, path.display());
    } else {
        log::warn!("{message}");
    }
}

//! Logging utilities for log output and progress tracking

pub mod log;
pub mod progress;

pub use log::{log_operation_complete, log_operation_start, log_stage, log_warning};
pub use progress::{create_hidden_spinner, create_spinner, finish_and_clear};

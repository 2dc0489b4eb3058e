//! Top-level error for a scan run.

use super::{ConfigError, ReportError, StateError};

/// Errors that abort a scan run and move the driver to `Failed`.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("State error: {0}")]
    State(#[from] StateError),

    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    #[error("Entry discovery failed: {0}")]
    Discovery(String),
}

impl ScanError {
    /// Stable short code for log lines and tests.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::State(_) => "state",
            Self::Report(_) => "report",
            Self::Discovery(_) => "discovery",
        }
    }
}

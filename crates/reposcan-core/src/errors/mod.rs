//! Error handling for RepoScan.
//! One error enum per subsystem, aggregated by [`ScanError`].

pub mod config_error;
pub mod entry_error;
pub mod report_error;
pub mod scan_error;
pub mod state_error;

pub use config_error::ConfigError;
pub use entry_error::EntryError;
pub use report_error::ReportError;
pub use scan_error::ScanError;
pub use state_error::StateError;

//! RepoScan CLI: command-line frontend for the repository scanner.
//!
//! Flag parsing and configuration wiring only. Scanning lives in `reposcan-core`.
pub mod app;
pub mod args;

pub use app::run;
pub use args::{ScanArgs, ScanTypeArg};

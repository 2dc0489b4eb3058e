//! Configuration: the repository config file and the per-run scan config.

pub mod repo_config;
pub mod scan_config;

pub use repo_config::{ContentTypeConfig, RepoConfig, RepoOverrides, DEFAULT_SECTION};
pub use scan_config::ScanConfig;

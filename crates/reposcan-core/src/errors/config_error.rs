//! Configuration errors. Always fatal: they abort a run before scanning.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("working path {} does not exist or is not a directory", .0.display())]
    WorkingPathMissing(PathBuf),

    #[error("working path {} is not writable: {source}", .path.display())]
    WorkingPathUnwritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("repository path {} does not exist or is not a directory", .0.display())]
    RepoPathMissing(PathBuf),

    #[error("cannot read config file {}: {source}", .path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML in {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("config section `{0}` not found")]
    SectionNotFound(String),

    #[error("no content type selected (use --scan_entry_data or --content_type)")]
    NoContentType,

    #[error("content type `{0}` is not configured")]
    UnknownContentType(String),

    #[error("invalid value for {field}: {message}")]
    ValidationFailed { field: String, message: String },
}

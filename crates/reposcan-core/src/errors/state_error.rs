//! Scan state persistence errors. Always fatal.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// An incremental scan needs a prior state file.
    #[error("no prior scan state at {} (run a full scan first)", .0.display())]
    MissingState(PathBuf),

    #[error("scan state {} is corrupt: {message}", .path.display())]
    CorruptState { path: PathBuf, message: String },

    #[error("scan state I/O on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

//! Per-entry processing errors.
//!
//! These never abort a run: the driver marks the entry `failed`, appends it
//! to the failure list, and moves on.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum EntryError {
    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{id}: missing or empty header row")]
    MissingHeader { id: String },

    #[error("{id}: duplicate attribute `{name}`")]
    DuplicateAttribute { id: String, name: String },

    #[error("{id}: malformed record: {message}")]
    Malformed { id: String, message: String },

    /// Free-form rejection for processors other than the built-in ones.
    #[error("{id}: {message}")]
    Rejected { id: String, message: String },
}

impl EntryError {
    pub fn rejected(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Rejected {
            id: id.into(),
            message: message.into(),
        }
    }
}

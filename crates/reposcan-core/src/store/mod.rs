//! Scan state persistence.
//!
//! The state file is pretty-printed JSON carrying a format version. Loads
//! distinguish "absent" (fine for a full scan, fatal for an incremental one)
//! from "present but unreadable" (always fatal). Saves are atomic.
pub mod atomic;

use self::atomic::StagedFile;
use crate::errors::StateError;
use crate::model::{ScanState, ScanType, STATE_FORMAT_VERSION};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Load the scan state stored at `path`.
///
/// - file present and valid: the stored state.
/// - file present but undecodable, or an unknown format version: `CorruptState`.
/// - file absent and `scan_type == Full`: an empty state with no working path bound.
/// - file absent and `scan_type == Incr`: `MissingState`.
pub fn load(path: &Path, scan_type: ScanType) -> Result<ScanState, StateError> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return match scan_type {
                ScanType::Full => {
                    debug!("No scan state at {}, starting empty", path.display());
                    Ok(ScanState::new(ScanType::Full, PathBuf::new()))
                }
                ScanType::Incr => Err(StateError::MissingState(path.to_path_buf())),
            };
        }
        Err(source) => {
            return Err(StateError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let state: ScanState = serde_json::from_reader(BufReader::new(file)).map_err(|err| {
        if err.is_io() {
            StateError::Io {
                path: path.to_path_buf(),
                source: err.into(),
            }
        } else {
            StateError::CorruptState {
                path: path.to_path_buf(),
                message: err.to_string(),
            }
        }
    })?;

    if state.version != STATE_FORMAT_VERSION {
        return Err(StateError::CorruptState {
            path: path.to_path_buf(),
            message: format!(
                "unsupported state version {} (expected {STATE_FORMAT_VERSION})",
                state.version
            ),
        });
    }

    info!(
        "Loaded scan state from {} ({} entries)",
        path.display(),
        state.len()
    );
    Ok(state)
}

/// Stage `state` next to `path`. Commit the result to replace the file.
pub fn stage(state: &ScanState, path: &Path) -> Result<StagedFile, StateError> {
    atomic::stage_json(path, state).map_err(|source| StateError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Atomically overwrite `path` with `state`.
pub fn save(state: &ScanState, path: &Path) -> Result<(), StateError> {
    atomic::write_json_atomic(path, state).map_err(|source| StateError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(
        "Saved scan state to {} ({} entries)",
        path.display(),
        state.len()
    );
    Ok(())
}

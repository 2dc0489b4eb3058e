//! Data model for scan state.
//!
//! Re-exports the entry and state types plus formatting helpers.
pub mod format;
pub mod scan_entry;
pub mod scan_state;

pub use scan_entry::{AttributeStats, Candidate, EntryData, EntryStatus, ScanEntry, ValueKind};
pub use scan_state::{ScanState, ScanType, STATE_FORMAT_VERSION};

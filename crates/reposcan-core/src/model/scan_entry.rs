//! A single repository entry tracked across scans.
//!
//! Entries are keyed by a string identifier that is unique within a scan.
//! They are created on first discovery, updated when re-processed, and never
//! deleted: entries that disappear from the repository are only flagged
//! `stale`.
use chrono::{DateTime, Utc};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Processing status of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Discovered but never processed (e.g. beyond the file limit).
    Unscanned,
    Scanned,
    Failed,
}

impl EntryStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Unscanned => "unscanned",
            Self::Scanned => "scanned",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Inferred kind of an attribute's values.
///
/// Ordered from narrowest to widest so that combining two kinds is `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Integer,
    Float,
    Text,
}

impl ValueKind {
    /// The narrowest kind able to represent values of both `self` and `other`.
    #[inline]
    pub fn widen(self, other: ValueKind) -> ValueKind {
        self.max(other)
    }
}

/// Width/precision statistics for one attribute of one entry.
///
/// Widths are in characters. Precision is the number of fractional digits
/// and is only meaningful for `Float`; other kinds report zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeStats {
    pub kind: ValueKind,
    pub min_width: usize,
    pub max_width: usize,
    pub min_precision: usize,
    pub max_precision: usize,
    /// Number of observed (non-missing) values.
    pub value_count: u64,
}

impl AttributeStats {
    /// Start statistics from the first observed value.
    pub fn first(kind: ValueKind, width: usize, precision: usize) -> Self {
        Self {
            kind,
            min_width: width,
            max_width: width,
            min_precision: precision,
            max_precision: precision,
            value_count: 1,
        }
    }

    /// Fold another observed value into the statistics.
    pub fn observe(&mut self, kind: ValueKind, width: usize, precision: usize) {
        self.kind = self.kind.widen(kind);
        self.min_width = self.min_width.min(width);
        self.max_width = self.max_width.max(width);
        self.min_precision = self.min_precision.min(precision);
        self.max_precision = self.max_precision.max(precision);
        self.value_count += 1;
    }

    /// Zero the precision range unless the attribute ended up as `Float`.
    pub fn finalize(&mut self) {
        if self.kind != ValueKind::Float {
            self.min_precision = 0;
            self.max_precision = 0;
        }
    }
}

/// Everything a successful processing pass learned about an entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryData {
    /// Number of data rows read.
    pub row_count: u64,
    /// Observed attributes only; attributes with no values are omitted.
    pub attributes: BTreeMap<CompactString, AttributeStats>,
}

/// A candidate entry produced by discovery, before it is processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub id: String,
    pub path: PathBuf,
    /// Source modification time, used to detect changes on incremental runs.
    pub modified: Option<DateTime<Utc>>,
}

impl Candidate {
    pub fn new(id: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            modified: None,
        }
    }

    pub fn with_modified(mut self, modified: DateTime<Utc>) -> Self {
        self.modified = Some(modified);
        self
    }
}

/// A repository entry as persisted in the scan state.
///
/// Invariant: `data` is `Some` exactly when `status == Scanned`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanEntry {
    pub id: String,
    /// Source location of the entry.
    pub path: PathBuf,
    pub status: EntryStatus,
    /// When the entry was last processed (successfully or not).
    pub last_scanned: Option<DateTime<Utc>>,
    /// Source modification time observed when the entry was last processed.
    pub source_modified: Option<DateTime<Utc>>,
    /// `true` if the entry was not found by the most recent discovery.
    #[serde(default)]
    pub stale: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<EntryData>,
}

impl ScanEntry {
    /// Create an unscanned entry from a freshly discovered candidate.
    pub fn new_unscanned(candidate: &Candidate) -> Self {
        Self {
            id: candidate.id.clone(),
            path: candidate.path.clone(),
            status: EntryStatus::Unscanned,
            last_scanned: None,
            source_modified: None,
            stale: false,
            data: None,
        }
    }
}

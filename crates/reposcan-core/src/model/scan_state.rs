//! The persisted scan state: every known entry plus run metadata.
//!
//! Entries live in a `BTreeMap` keyed by identifier, so iteration order and
//! the serialized form are both stable across runs. The state is an explicit
//! value: the driver loads it, mutates it in memory, and hands it back.
use super::scan_entry::{Candidate, EntryData, EntryStatus, ScanEntry};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;

/// On-disk format version. Bump when `ScanState` changes incompatibly.
pub const STATE_FORMAT_VERSION: u32 = 1;

/// Full or incremental scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanType {
    Full,
    Incr,
}

impl ScanType {
    pub fn label(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Incr => "incr",
        }
    }
}

impl fmt::Display for ScanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// All known entries plus the scan-type marker and working-path reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanState {
    pub version: u32,
    /// Type of the run that created this state. Incremental runs keep it.
    pub scan_type: ScanType,
    pub working_path: PathBuf,
    pub entries: BTreeMap<String, ScanEntry>,
}

impl ScanState {
    /// Create an empty state.
    pub fn new(scan_type: ScanType, working_path: PathBuf) -> Self {
        Self {
            version: STATE_FORMAT_VERSION,
            scan_type,
            working_path,
            entries: BTreeMap::new(),
        }
    }

    #[inline]
    pub fn get(&self, id: &str) -> Option<&ScanEntry> {
        self.entries.get(id)
    }

    pub fn status_of(&self, id: &str) -> Option<EntryStatus> {
        self.entries.get(id).map(|e| e.status)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert an `Unscanned` entry for a candidate seen for the first time.
    ///
    /// Returns `true` if the entry was new.
    pub fn register(&mut self, candidate: &Candidate) -> bool {
        if self.entries.contains_key(&candidate.id) {
            return false;
        }
        self.entries
            .insert(candidate.id.clone(), ScanEntry::new_unscanned(candidate));
        true
    }

    /// Whether an incremental run must (re)process this candidate.
    ///
    /// New and never-processed entries are always processed. Known entries
    /// are re-processed only when the source modification time changed;
    /// failed entries are not retried otherwise.
    pub fn needs_scan(&self, candidate: &Candidate) -> bool {
        match self.entries.get(&candidate.id) {
            None => true,
            Some(entry) if entry.status == EntryStatus::Unscanned => true,
            Some(entry) => entry.source_modified != candidate.modified,
        }
    }

    /// Record a successful processing pass.
    pub fn record_scanned(&mut self, candidate: &Candidate, data: EntryData, at: DateTime<Utc>) {
        let entry = self.entry_mut(candidate);
        entry.status = EntryStatus::Scanned;
        entry.data = Some(data);
        entry.last_scanned = Some(at);
        entry.source_modified = candidate.modified;
    }

    /// Record a failed processing pass. Any data from an earlier success is dropped.
    pub fn record_failed(&mut self, candidate: &Candidate, at: DateTime<Utc>) {
        let entry = self.entry_mut(candidate);
        entry.status = EntryStatus::Failed;
        entry.data = None;
        entry.last_scanned = Some(at);
        entry.source_modified = candidate.modified;
    }

    fn entry_mut(&mut self, candidate: &Candidate) -> &mut ScanEntry {
        let entry = self
            .entries
            .entry(candidate.id.clone())
            .or_insert_with(|| ScanEntry::new_unscanned(candidate));
        entry.path = candidate.path.clone();
        entry.stale = false;
        entry
    }

    /// Flag every entry whose identifier is not in `seen` as stale, and
    /// clear the flag on the rest. Returns the number of stale entries.
    pub fn mark_stale(&mut self, seen: &BTreeSet<&str>) -> usize {
        let mut stale = 0;
        for (id, entry) in self.entries.iter_mut() {
            entry.stale = !seen.contains(id.as_str());
            if entry.stale {
                stale += 1;
            }
        }
        stale
    }

    /// Iterate over successfully scanned entries with their data, in identifier order.
    pub fn scanned(&self) -> impl Iterator<Item = (&ScanEntry, &EntryData)> {
        self.entries
            .values()
            .filter_map(|e| match (&e.status, &e.data) {
                (EntryStatus::Scanned, Some(data)) => Some((e, data)),
                _ => None,
            })
    }

    /// Count entries with the given status.
    pub fn count_status(&self, status: EntryStatus) -> usize {
        self.entries.values().filter(|e| e.status == status).count()
    }
}

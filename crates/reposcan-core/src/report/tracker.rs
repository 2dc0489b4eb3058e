//! Per-entry coverage and type-map trackers.
//!
//! Both are an ordered `entry id -> descriptor` map that is staged as JSON
//! once scanning has finished and committed together with the other outputs.
//! `BTreeMap` keys give a stable ordering so reports diff cleanly between runs.
use crate::errors::ReportError;
use crate::model::{AttributeStats, EntryData, ValueKind};
use crate::store::atomic::{stage_json, StagedFile};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Observed attributes of one entry, with the number of values seen for each.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoverageDescriptor(pub BTreeMap<CompactString, u64>);

impl From<&EntryData> for CoverageDescriptor {
    fn from(data: &EntryData) -> Self {
        Self(
            data.attributes
                .iter()
                .map(|(name, stats)| (name.clone(), stats.value_count))
                .collect(),
        )
    }
}

/// Inferred type of one attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeType {
    pub kind: ValueKind,
    pub min_width: usize,
    pub max_width: usize,
    pub min_precision: usize,
    pub max_precision: usize,
}

impl From<&AttributeStats> for AttributeType {
    fn from(stats: &AttributeStats) -> Self {
        Self {
            kind: stats.kind,
            min_width: stats.min_width,
            max_width: stats.max_width,
            min_precision: stats.min_precision,
            max_precision: stats.max_precision,
        }
    }
}

/// Inferred attribute types of one entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeDescriptor(pub BTreeMap<CompactString, AttributeType>);

impl From<&EntryData> for TypeDescriptor {
    fn from(data: &EntryData) -> Self {
        Self(
            data.attributes
                .iter()
                .map(|(name, stats)| (name.clone(), AttributeType::from(stats)))
                .collect(),
        )
    }
}

/// Ordered mapping from entry identifier to a descriptor.
#[derive(Debug, Clone)]
pub struct RecordTracker<D> {
    records: BTreeMap<String, D>,
}

pub type CoverageTracker = RecordTracker<CoverageDescriptor>;
pub type TypeMapTracker = RecordTracker<TypeDescriptor>;

impl<D> Default for RecordTracker<D> {
    fn default() -> Self {
        Self {
            records: BTreeMap::new(),
        }
    }
}

impl<D: Serialize> RecordTracker<D> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the descriptor for `entry_id`, returning the previous one.
    pub fn record(&mut self, entry_id: &str, descriptor: D) -> Option<D> {
        self.records.insert(entry_id.to_owned(), descriptor)
    }

    /// Drop the descriptor for an entry that is no longer scanned.
    pub fn remove(&mut self, entry_id: &str) -> Option<D> {
        self.records.remove(entry_id)
    }

    pub fn get(&self, entry_id: &str) -> Option<&D> {
        self.records.get(entry_id)
    }

    pub fn contains(&self, entry_id: &str) -> bool {
        self.records.contains_key(entry_id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Serialize the full mapping as sorted, pretty-printed JSON into a
    /// staged file next to `path`. Nothing replaces `path` until the result
    /// is committed.
    pub fn flush(&self, path: &Path) -> Result<StagedFile, ReportError> {
        let staged = stage_json(path, &self.records).map_err(|e| ReportError::write(path, e))?;
        debug!("Staged {} records for {}", self.records.len(), path.display());
        Ok(staged)
    }
}

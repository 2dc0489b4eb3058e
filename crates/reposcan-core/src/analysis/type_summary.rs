//! Repository-wide type summary: one row per attribute, merged across every
//! scanned entry.
use crate::model::{ScanState, ValueKind};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Merged type information for one attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSummary {
    pub kind: ValueKind,
    pub min_width: usize,
    pub max_width: usize,
    pub min_precision: usize,
    pub max_precision: usize,
    /// Number of entries in which the attribute was observed.
    pub count: u64,
}

/// Merge per-entry attribute statistics across all scanned entries.
///
/// Kinds widen (`integer < float < text`); width and precision ranges take
/// the overall min/max. Precision is reported as zero unless the merged kind
/// is `Float`.
pub fn summarize_types(state: &ScanState) -> BTreeMap<CompactString, TypeSummary> {
    let mut out: BTreeMap<CompactString, TypeSummary> = BTreeMap::new();

    for (_, data) in state.scanned() {
        for (name, stats) in &data.attributes {
            out.entry(name.clone())
                .and_modify(|s| {
                    s.kind = s.kind.widen(stats.kind);
                    s.min_width = s.min_width.min(stats.min_width);
                    s.max_width = s.max_width.max(stats.max_width);
                    s.min_precision = s.min_precision.min(stats.min_precision);
                    s.max_precision = s.max_precision.max(stats.max_precision);
                    s.count += 1;
                })
                .or_insert(TypeSummary {
                    kind: stats.kind,
                    min_width: stats.min_width,
                    max_width: stats.max_width,
                    min_precision: stats.min_precision,
                    max_precision: stats.max_precision,
                    count: 1,
                });
        }
    }

    for s in out.values_mut() {
        if s.kind != ValueKind::Float {
            s.min_precision = 0;
            s.max_precision = 0;
        }
    }
    out
}

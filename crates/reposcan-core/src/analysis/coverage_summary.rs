//! Repository-wide coverage summary: for each attribute, how many entries
//! contain it and which ones.
use crate::model::ScanState;
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageSummary {
    pub count: u64,
    /// Entry identifiers, in identifier order.
    pub instances: Vec<String>,
}

pub fn summarize_coverage(state: &ScanState) -> BTreeMap<CompactString, CoverageSummary> {
    let mut out: BTreeMap<CompactString, CoverageSummary> = BTreeMap::new();
    for (entry, data) in state.scanned() {
        for name in data.attributes.keys() {
            let s = out.entry(name.clone()).or_default();
            s.count += 1;
            s.instances.push(entry.id.clone());
        }
    }
    out
}

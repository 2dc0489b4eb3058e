//! Per-entry processing.
//!
//! [`EntryProcessor`] turns one candidate into [`EntryData`] or an
//! [`EntryError`]. The built-in [`TabularProcessor`] reads delimited text
//! with a header row and gathers width, precision, and kind statistics for
//! every attribute (column).
use crate::analysis::{classify_value, fractional_precision, is_missing, value_width};
use crate::config::repo_config::DEFAULT_DELIMITER;
use crate::errors::EntryError;
use crate::model::{AttributeStats, Candidate, EntryData};
use compact_str::CompactString;
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;

/// Processes a single candidate entry.
pub trait EntryProcessor {
    fn process(&self, candidate: &Candidate) -> Result<EntryData, EntryError>;
}

/// Scans delimited-text tables (CSV by default).
#[derive(Debug, Clone, Copy)]
pub struct TabularProcessor {
    delimiter: u8,
}

impl Default for TabularProcessor {
    fn default() -> Self {
        Self::with_delimiter(DEFAULT_DELIMITER)
    }
}

impl TabularProcessor {
    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }
}

impl EntryProcessor for TabularProcessor {
    fn process(&self, candidate: &Candidate) -> Result<EntryData, EntryError> {
        let file = File::open(&candidate.path).map_err(|source| EntryError::Read {
            path: candidate.path.clone(),
            source,
        })?;

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(false)
            .trim(csv::Trim::All)
            .from_reader(BufReader::new(file));

        let malformed = |err: csv::Error| EntryError::Malformed {
            id: candidate.id.clone(),
            message: err.to_string(),
        };

        let headers: Vec<CompactString> = reader
            .headers()
            .map_err(&malformed)?
            .iter()
            .map(CompactString::new)
            .collect();
        if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
            return Err(EntryError::MissingHeader {
                id: candidate.id.clone(),
            });
        }
        let mut seen = HashSet::with_capacity(headers.len());
        for h in &headers {
            if !seen.insert(h.as_str()) {
                return Err(EntryError::DuplicateAttribute {
                    id: candidate.id.clone(),
                    name: h.to_string(),
                });
            }
        }

        // Per-column accumulators, indexed like `headers`.
        let mut columns: Vec<Option<AttributeStats>> = vec![None; headers.len()];
        let mut row_count: u64 = 0;

        for record in reader.records() {
            let record = record.map_err(&malformed)?;
            row_count += 1;
            for (slot, value) in columns.iter_mut().zip(record.iter()) {
                if is_missing(value) {
                    continue;
                }
                let kind = classify_value(value);
                let width = value_width(value);
                let precision = fractional_precision(value);
                match slot {
                    Some(stats) => stats.observe(kind, width, precision),
                    None => *slot = Some(AttributeStats::first(kind, width, precision)),
                }
            }
        }

        let attributes = headers
            .into_iter()
            .zip(columns)
            .filter_map(|(name, stats)| {
                let mut stats = stats?;
                stats.finalize();
                Some((name, stats))
            })
            .collect();

        Ok(EntryData {
            row_count,
            attributes,
        })
    }
}

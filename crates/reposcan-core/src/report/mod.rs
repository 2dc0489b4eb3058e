//! Scan outputs: coverage and type-map trackers, the failure list, the
//! input path list, and JSON summary files.
pub mod failure_list;
pub mod path_list;
pub mod tracker;

pub use failure_list::FailureListWriter;
pub use path_list::write_path_list;
pub use tracker::{
    AttributeType, CoverageDescriptor, CoverageTracker, RecordTracker, TypeDescriptor,
    TypeMapTracker,
};

use crate::errors::ReportError;
use crate::store::atomic::{stage_json, StagedFile};
use serde::Serialize;
use std::path::Path;

/// Stage any serializable report as pretty JSON, ready to commit over `path`.
pub fn stage_json_report<T: Serialize + ?Sized>(
    path: &Path,
    value: &T,
) -> Result<StagedFile, ReportError> {
    stage_json(path, value).map_err(|e| ReportError::write(path, e))
}

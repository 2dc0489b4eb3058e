//! Per-run driver configuration: scan type and every input/output path.

use crate::errors::ConfigError;
use crate::model::ScanType;
use std::path::{Path, PathBuf};

pub const DEFAULT_STATE_FILE: &str = "scan-data.json";
pub const DEFAULT_COVERAGE_FILE: &str = "scan-data-coverage.json";
pub const DEFAULT_TYPE_MAP_FILE: &str = "scan-data-type.json";
pub const DEFAULT_FAILURE_LIST_FILE: &str = "failed-list.txt";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    pub scan_type: ScanType,
    /// Scratch/output directory. Must exist and be writable.
    pub working_path: PathBuf,
    pub state_path: PathBuf,
    pub coverage_path: PathBuf,
    pub type_map_path: PathBuf,
    pub failure_list_path: PathBuf,
    /// Optional list of the paths selected for processing in a run.
    pub input_list_path: Option<PathBuf>,
    pub type_summary_path: Option<PathBuf>,
    pub coverage_summary_path: Option<PathBuf>,
    /// Maximum number of candidates to process per run.
    pub file_limit: Option<usize>,
}

impl ScanConfig {
    /// Configuration with every output placed in `working_path` under its default name.
    pub fn new(scan_type: ScanType, working_path: impl Into<PathBuf>) -> Self {
        let working_path = working_path.into();
        Self {
            scan_type,
            state_path: working_path.join(DEFAULT_STATE_FILE),
            coverage_path: working_path.join(DEFAULT_COVERAGE_FILE),
            type_map_path: working_path.join(DEFAULT_TYPE_MAP_FILE),
            failure_list_path: working_path.join(DEFAULT_FAILURE_LIST_FILE),
            working_path,
            input_list_path: None,
            type_summary_path: None,
            coverage_summary_path: None,
            file_limit: None,
        }
    }

    /// Check values that do not depend on the filesystem.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.file_limit == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "file_limit".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        let mut outputs: Vec<(&str, &Path)> = vec![
            ("scan_data_file_path", self.state_path.as_path()),
            ("coverage_file_path", self.coverage_path.as_path()),
            ("type_map_file_path", self.type_map_path.as_path()),
            ("fail_file_list_path", self.failure_list_path.as_path()),
        ];
        let optional = [
            ("input_file_list_path", &self.input_list_path),
            ("type_summary_file_path", &self.type_summary_path),
            ("coverage_summary_file_path", &self.coverage_summary_path),
        ];
        for (field, path) in optional {
            if let Some(path) = path {
                outputs.push((field, path.as_path()));
            }
        }
        for (i, (field, path)) in outputs.iter().enumerate() {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::ValidationFailed {
                    field: (*field).to_string(),
                    message: "must not be empty".to_string(),
                });
            }
            if let Some((other, _)) = outputs[..i].iter().find(|(_, p)| p == path) {
                return Err(ConfigError::ValidationFailed {
                    field: (*field).to_string(),
                    message: format!("same file as {other}"),
                });
            }
        }
        Ok(())
    }
}

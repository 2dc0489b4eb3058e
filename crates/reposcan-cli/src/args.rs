//! Command-line flags for `RepoScanExec`.
//!
//! Flag spellings are fixed by existing job scripts, hence the mix of
//! `--scanType` and snake_case long names.
use clap::{Parser, ValueEnum};
use reposcan_core::config::{RepoOverrides, ScanConfig, DEFAULT_SECTION};
use reposcan_core::errors::ConfigError;
use reposcan_core::model::ScanType;
use std::path::PathBuf;

/// Content type selected by `--scan_entry_data`.
pub const ENTRY_DATA_CONTENT_TYPE: &str = "entry_data";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScanTypeArg {
    Full,
    Incr,
}

impl From<ScanTypeArg> for ScanType {
    fn from(arg: ScanTypeArg) -> Self {
        match arg {
            ScanTypeArg::Full => ScanType::Full,
            ScanTypeArg::Incr => ScanType::Incr,
        }
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "RepoScanExec")]
#[command(about = "Scan a repository and collect per-entry coverage and type data")]
#[command(version)]
pub struct ScanArgs {
    /// Resolve repository paths under the configured mock top path.
    #[arg(long)]
    pub mock: bool,

    #[arg(long = "scanType", value_enum)]
    pub scan_type: ScanTypeArg,

    /// Scan the `entry_data` content type.
    #[arg(long = "scan_entry_data")]
    pub scan_entry_data: bool,

    /// Scan a named content type from the configuration file.
    #[arg(long = "content_type", value_name = "NAME")]
    pub content_type: Option<String>,

    /// Scratch and output directory.
    #[arg(long = "working_path", value_name = "PATH")]
    pub working_path: PathBuf,

    #[arg(long = "scan_data_file_path", value_name = "PATH")]
    pub scan_data_file_path: Option<PathBuf>,

    #[arg(long = "coverage_file_path", value_name = "PATH")]
    pub coverage_file_path: Option<PathBuf>,

    #[arg(long = "type_map_file_path", value_name = "PATH")]
    pub type_map_file_path: Option<PathBuf>,

    #[arg(long = "fail_file_list_path", value_name = "PATH")]
    pub fail_file_list_path: Option<PathBuf>,

    /// TOML configuration file.
    #[arg(long = "config_path", value_name = "PATH")]
    pub config_path: Option<PathBuf>,

    /// Section of the configuration file to use.
    #[arg(long = "config_name", value_name = "NAME", default_value = DEFAULT_SECTION)]
    pub config_name: String,

    /// Override the configured repository root.
    #[arg(long = "repo_path", value_name = "PATH")]
    pub repo_path: Option<PathBuf>,

    /// Maximum number of entries to process in this run.
    #[arg(long = "file_limit", value_name = "N")]
    pub file_limit: Option<usize>,

    /// Write the paths selected for processing, one per line.
    #[arg(long = "input_file_list_path", value_name = "PATH")]
    pub input_file_list_path: Option<PathBuf>,

    #[arg(long = "type_summary_file_path", value_name = "PATH")]
    pub type_summary_file_path: Option<PathBuf>,

    #[arg(long = "coverage_summary_file_path", value_name = "PATH")]
    pub coverage_summary_file_path: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

impl ScanArgs {
    /// The single content type selected on the command line.
    pub fn content_type(&self) -> Result<String, ConfigError> {
        match (self.scan_entry_data, &self.content_type) {
            (true, None) => Ok(ENTRY_DATA_CONTENT_TYPE.to_string()),
            (false, Some(name)) => Ok(name.clone()),
            (true, Some(name)) if name == ENTRY_DATA_CONTENT_TYPE => Ok(name.clone()),
            (true, Some(name)) => Err(ConfigError::ValidationFailed {
                field: "content_type".to_string(),
                message: format!(
                    "--scan_entry_data and --content_type {name} select different content types"
                ),
            }),
            (false, None) => Err(ConfigError::NoContentType),
        }
    }

    pub fn overrides(&self) -> RepoOverrides {
        RepoOverrides {
            mock: self.mock,
            repo_path: self.repo_path.clone(),
            file_limit: self.file_limit,
        }
    }

    /// Driver configuration: defaults under the working path, replaced by
    /// any explicit output path.
    pub fn scan_config(&self, file_limit: Option<usize>) -> ScanConfig {
        let mut config = ScanConfig::new(self.scan_type.into(), &self.working_path);
        if let Some(p) = &self.scan_data_file_path {
            config.state_path = p.clone();
        }
        if let Some(p) = &self.coverage_file_path {
            config.coverage_path = p.clone();
        }
        if let Some(p) = &self.type_map_file_path {
            config.type_map_path = p.clone();
        }
        if let Some(p) = &self.fail_file_list_path {
            config.failure_list_path = p.clone();
        }
        config.input_list_path = self.input_file_list_path.clone();
        config.type_summary_path = self.type_summary_file_path.clone();
        config.coverage_summary_path = self.coverage_summary_file_path.clone();
        config.file_limit = file_limit;
        config
    }
}

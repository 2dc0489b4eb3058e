//! Repository configuration file (TOML) with named sections.
//!
//! ```toml
//! [DEFAULT]
//! mock_top_path = "fixtures"
//! file_limit = 100
//!
//! [DEFAULT.content.entry_data]
//! repo_path = "MOCK_ENTRY_REPO"
//! extensions = ["csv", "tsv"]
//!
//! [production]
//! delimiter = "\t"
//! ```
//!
//! Resolution order (highest priority first):
//! 1. CLI overrides
//! 2. The selected section
//! 3. `[DEFAULT]`
//! 4. Compiled defaults
//!
//! Unknown keys are ignored.
use crate::errors::ConfigError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_SECTION: &str = "DEFAULT";
pub const DEFAULT_EXTENSIONS: [&str; 1] = ["csv"];
pub const DEFAULT_DELIMITER: u8 = b',';

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct SectionConfig {
    mock_top_path: Option<PathBuf>,
    file_limit: Option<usize>,
    delimiter: Option<String>,
    content: BTreeMap<String, ContentSection>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ContentSection {
    repo_path: Option<PathBuf>,
    extensions: Option<Vec<String>>,
}

/// Values supplied on the command line; they beat anything in the file.
#[derive(Debug, Clone, Default)]
pub struct RepoOverrides {
    /// Resolve configured repository paths under the mock top path.
    pub mock: bool,
    pub repo_path: Option<PathBuf>,
    pub file_limit: Option<usize>,
}

/// Fully resolved settings for one content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentTypeConfig {
    pub name: String,
    pub repo_path: PathBuf,
    /// Lowercased, without leading dots.
    pub extensions: Vec<String>,
    pub delimiter: u8,
    pub file_limit: Option<usize>,
}

/// A parsed configuration file bound to one section.
#[derive(Debug, Clone)]
pub struct RepoConfig {
    /// Directory of the config file; default mock top path.
    base_dir: PathBuf,
    section_name: String,
    sections: BTreeMap<String, SectionConfig>,
}

impl RepoConfig {
    /// No config file: everything comes from overrides and compiled defaults.
    pub fn empty() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            section_name: DEFAULT_SECTION.to_string(),
            sections: BTreeMap::new(),
        }
    }

    /// Read and parse `path`, selecting `section`.
    pub fn load(path: &Path, section: &str) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::parse(&text, &path.display().to_string(), section)?;
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            config.base_dir = dir.to_path_buf();
        }
        debug!("Loaded config {} section `{section}`", path.display());
        Ok(config)
    }

    /// Parse configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str, section: &str) -> Result<Self, ConfigError> {
        Self::parse(toml_str, "<string>", section)
    }

    fn parse(text: &str, origin: &str, section: &str) -> Result<Self, ConfigError> {
        let sections: BTreeMap<String, SectionConfig> =
            toml::from_str(text).map_err(|e| ConfigError::ParseError {
                path: origin.to_string(),
                message: e.to_string(),
            })?;
        if section != DEFAULT_SECTION && !sections.contains_key(section) {
            return Err(ConfigError::SectionNotFound(section.to_string()));
        }
        Ok(Self {
            base_dir: PathBuf::from("."),
            section_name: section.to_string(),
            sections,
        })
    }

    pub fn section_name(&self) -> &str {
        &self.section_name
    }

    /// Look a value up in the selected section, then `[DEFAULT]`.
    fn lookup<T>(&self, get: impl Fn(&SectionConfig) -> Option<T>) -> Option<T> {
        self.sections
            .get(&self.section_name)
            .and_then(&get)
            .or_else(|| self.sections.get(DEFAULT_SECTION).and_then(&get))
    }

    fn lookup_content<T>(
        &self,
        content_type: &str,
        get: impl Fn(&ContentSection) -> Option<T>,
    ) -> Option<T> {
        self.lookup(|s| s.content.get(content_type).and_then(&get))
    }

    fn knows_content_type(&self, content_type: &str) -> bool {
        [self.section_name.as_str(), DEFAULT_SECTION]
            .iter()
            .filter_map(|name| self.sections.get(*name))
            .any(|s| s.content.contains_key(content_type))
    }

    /// Resolve the settings for `content_type`.
    pub fn resolve(
        &self,
        content_type: &str,
        overrides: &RepoOverrides,
    ) -> Result<ContentTypeConfig, ConfigError> {
        let repo_path = match &overrides.repo_path {
            Some(path) => path.clone(),
            None => {
                if !self.knows_content_type(content_type) {
                    return Err(ConfigError::UnknownContentType(content_type.to_string()));
                }
                let configured = self
                    .lookup_content(content_type, |c| c.repo_path.clone())
                    .ok_or_else(|| ConfigError::ValidationFailed {
                        field: format!("content.{content_type}.repo_path"),
                        message: "not configured".to_string(),
                    })?;
                if overrides.mock && configured.is_relative() {
                    self.mock_top_path().join(configured)
                } else {
                    configured
                }
            }
        };

        let extensions = self
            .lookup_content(content_type, |c| c.extensions.clone())
            .unwrap_or_else(|| DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect())
            .into_iter()
            .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
            .filter(|e| !e.is_empty())
            .collect::<Vec<_>>();
        if extensions.is_empty() {
            return Err(ConfigError::ValidationFailed {
                field: format!("content.{content_type}.extensions"),
                message: "must list at least one extension".to_string(),
            });
        }

        let delimiter = match self.lookup(|s| s.delimiter.clone()) {
            Some(d) => parse_delimiter(&d)?,
            None => DEFAULT_DELIMITER,
        };

        let file_limit = overrides
            .file_limit
            .or_else(|| self.lookup(|s| s.file_limit));

        Ok(ContentTypeConfig {
            name: content_type.to_string(),
            repo_path,
            extensions,
            delimiter,
            file_limit,
        })
    }

    /// Configured mock top path, relative to the config file's directory,
    /// defaulting to that directory itself.
    fn mock_top_path(&self) -> PathBuf {
        match self.lookup(|s| s.mock_top_path.clone()) {
            Some(p) if p.is_absolute() => p,
            Some(p) => self.base_dir.join(p),
            None => self.base_dir.clone(),
        }
    }
}

fn parse_delimiter(raw: &str) -> Result<u8, ConfigError> {
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() => Ok(c as u8),
        _ => Err(ConfigError::ValidationFailed {
            field: "delimiter".to_string(),
            message: format!("expected a single ASCII character, got {raw:?}"),
        }),
    }
}

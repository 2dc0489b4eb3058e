//! Entry discovery.
//!
//! [`EntrySource`] is the seam through which the driver learns which
//! repository entries exist. [`DirectorySource`] is the built-in
//! implementation: a `jwalk` parallel directory walk over the repository
//! root that keeps regular files with a configured extension.
//!
//! The walk itself runs on a rayon pool, but its output is collected and
//! sorted by identifier before the driver sees it, so scanning stays
//! sequential and deterministic.
use crate::errors::{ConfigError, ScanError};
use crate::model::Candidate;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Supplies candidate entries to the driver.
pub trait EntrySource {
    /// Check the source is usable. Called while the driver validates its
    /// configuration, before any state is loaded.
    fn validate(&self) -> Result<(), ScanError> {
        Ok(())
    }

    /// Discover all candidate entries.
    fn discover(&self) -> Result<Vec<Candidate>, ScanError>;
}

/// Discovers files under a repository root by extension.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
    /// Lowercased extensions without the leading dot.
    extensions: Vec<String>,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>, extensions: Vec<String>) -> Self {
        Self {
            root: root.into(),
            extensions: extensions
                .into_iter()
                .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
        }
    }

    fn matches_extension(&self, path: &Path) -> bool {
        match path.extension() {
            Some(ext) => {
                let ext = ext.to_string_lossy();
                self.extensions.iter().any(|e| ext.eq_ignore_ascii_case(e))
            }
            None => false,
        }
    }
}

impl EntrySource for DirectorySource {
    fn validate(&self) -> Result<(), ScanError> {
        if !self.root.is_dir() {
            return Err(ConfigError::RepoPathMissing(self.root.clone()).into());
        }
        Ok(())
    }

    fn discover(&self) -> Result<Vec<Candidate>, ScanError> {
        self.validate()?;

        let mut candidates = Vec::new();
        let mut error_count: u64 = 0;

        let walker = jwalk::WalkDir::new(&self.root)
            .skip_hidden(false)
            .follow_links(false)
            .parallelism(jwalk::Parallelism::RayonNewPool(num_cpus::get()));

        for entry_result in walker {
            let entry = match entry_result {
                Ok(e) => e,
                Err(err) if err.path() == Some(self.root.as_path()) => {
                    return Err(ScanError::Discovery(format!(
                        "cannot read repository root {}: {err}",
                        self.root.display()
                    )));
                }
                Err(err) => {
                    // Typically access-denied on a subdirectory; the rest of
                    // the repository is still worth scanning.
                    error_count += 1;
                    let at = err
                        .path()
                        .map(|p| p.display().to_string())
                        .unwrap_or_default();
                    warn!("Skipping unreadable path {at}: {err}");
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if !self.matches_extension(&path) {
                continue;
            }

            let Some(id) = entry_id(&self.root, &path) else {
                warn!("Skipping {}: name cannot be used as an entry id", path.display());
                continue;
            };
            // Stat outside the walker; a vanished file simply has no mtime.
            let modified = std::fs::metadata(&path)
                .and_then(|m| m.modified())
                .ok()
                .map(DateTime::<Utc>::from);

            candidates.push(Candidate { id, path, modified });
        }

        candidates.sort_by(|a, b| a.id.cmp(&b.id));
        debug!(
            "Discovered {} candidates under {} ({} walk errors)",
            candidates.len(),
            self.root.display(),
            error_count
        );
        Ok(candidates)
    }
}

/// Identifier of a file: its path relative to the root, `/`-separated.
///
/// `None` for the root itself, for names that are not valid UTF-8, and for
/// names containing a line break. Ids are written one per line to the
/// failure and input lists and must stay unique.
fn entry_id(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts = rel
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<Vec<&str>>>()?;
    let has_break = |p: &&str| p.contains(|ch: char| ch == '\n' || ch == '\r');
    if parts.is_empty() || parts.iter().any(has_break) {
        return None;
    }
    Some(parts.join("/"))
}

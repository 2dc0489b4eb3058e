//! Plain-text list of entries that failed processing, one identifier per line.
//!
//! The file handle is owned by the writer. `finish` flushes and reports
//! errors; if the writer is dropped early (a fatal error elsewhere in the
//! run) `Drop` still flushes whatever was appended.
use crate::errors::ReportError;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub struct FailureListWriter {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
    count: usize,
}

impl FailureListWriter {
    /// Create (truncating) the failure list at `path`.
    pub fn create(path: &Path) -> Result<Self, ReportError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| ReportError::write(path, e))?;
        }
        let file = File::create(path).map_err(|e| ReportError::write(path, e))?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: Some(BufWriter::new(file)),
            count: 0,
        })
    }

    /// Append one identifier.
    pub fn append(&mut self, entry_id: &str) -> Result<(), ReportError> {
        let Some(writer) = self.writer.as_mut() else {
            return Ok(());
        };
        writeln!(writer, "{entry_id}").map_err(|e| ReportError::write(&self.path, e))?;
        self.count += 1;
        Ok(())
    }

    /// Flush and close the list, returning the number of identifiers written.
    pub fn finish(mut self) -> Result<usize, ReportError> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush().map_err(|e| ReportError::write(&self.path, e))?;
            writer
                .get_ref()
                .sync_all()
                .map_err(|e| ReportError::write(&self.path, e))?;
        }
        debug!("Wrote {} failed entries to {}", self.count, self.path.display());
        Ok(self.count)
    }
}

impl Drop for FailureListWriter {
    fn drop(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            if let Err(err) = writer.flush() {
                warn!("Failed to flush {}: {err}", self.path.display());
            }
        }
    }
}

//! Crash-safe file replacement.
//!
//! Content is written to a temporary file in the destination directory,
//! flushed and synced, then renamed over the destination. Readers see either
//! the old file or the complete new one, never a truncated mix.
//!
//! [`stage`] splits the two steps so several outputs can be fully written
//! before any of them replaces its destination.
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Fully written, synced content waiting to replace its destination.
///
/// Dropping a staged file without committing removes the temporary file.
#[derive(Debug)]
#[must_use = "staged content is discarded unless committed"]
pub struct StagedFile {
    target: PathBuf,
    tmp: NamedTempFile,
}

impl StagedFile {
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Rename the staged content over the destination.
    pub fn commit(self) -> io::Result<()> {
        self.tmp.persist(&self.target).map_err(|e| e.error)?;
        Ok(())
    }
}

/// Write whatever `write` produces next to `path` without touching `path`.
///
/// Missing parent directories are created. A destination that is an
/// existing directory is rejected up front.
pub fn stage<F>(path: &Path, write: F) -> io::Result<StagedFile>
where
    F: FnOnce(&mut dyn Write) -> io::Result<()>,
{
    if path.is_dir() {
        return Err(io::Error::new(io::ErrorKind::Other, "is a directory"));
    }
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut tmp = tempfile::Builder::new()
        .prefix(".reposcan-")
        .suffix(".tmp")
        .tempfile_in(parent)?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        write(&mut writer)?;
        writer.flush()?;
    }
    tmp.as_file().sync_all()?;
    Ok(StagedFile {
        target: path.to_path_buf(),
        tmp,
    })
}

/// Stage `value` as pretty-printed JSON followed by a newline.
pub fn stage_json<T: serde::Serialize + ?Sized>(path: &Path, value: &T) -> io::Result<StagedFile> {
    stage(path, |w| {
        serde_json::to_writer_pretty(&mut *w, value)?;
        w.write_all(b"\n")
    })
}

/// Atomically replace `path` with whatever `write` produces.
///
/// On error the temporary file is removed and `path` is left untouched.
pub fn write_atomic<F>(path: &Path, write: F) -> io::Result<()>
where
    F: FnOnce(&mut dyn Write) -> io::Result<()>,
{
    stage(path, write)?.commit()
}

/// Atomically write `value` as pretty-printed JSON followed by a newline.
pub fn write_json_atomic<T: serde::Serialize + ?Sized>(path: &Path, value: &T) -> io::Result<()> {
    stage_json(path, value)?.commit()
}

//! Write-permission checks for output directories.
//!
//! Permission bits do not tell the whole story (read-only mounts, ACLs,
//! quota), so the check creates and removes a real scratch file.
use std::io;
use std::path::Path;

/// Verify that files can be created in `dir`.
pub fn check_writable_dir(dir: &Path) -> io::Result<()> {
    let scratch = tempfile::Builder::new()
        .prefix(".reposcan-check-")
        .tempfile_in(dir)?;
    scratch.close()
}

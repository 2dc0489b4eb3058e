//! Plain-text list of the input paths selected for a run, one per line.
use crate::errors::ReportError;
use crate::store::atomic::write_atomic;
use std::path::Path;

/// Write `paths` to `out`, one per line.
pub fn write_path_list<'a, I>(out: &Path, paths: I) -> Result<usize, ReportError>
where
    I: IntoIterator<Item = &'a Path>,
{
    let mut count = 0;
    write_atomic(out, |w| {
        for p in paths {
            writeln!(w, "{}", p.display())?;
            count += 1;
        }
        Ok(())
    })
    .map_err(|e| ReportError::write(out, e))?;
    Ok(count)
}

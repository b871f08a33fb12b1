// crates/geomerge-core/src/loader/common_io.rs
use crate::error::{GeoMergeError, Result};
use std::fs::{self, File, Permissions};
use std::io::{BufReader, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Opens an input file for buffered reading.
pub fn open_stream(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).map_err(|source| GeoMergeError::SourceUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file))
}

/// Replaces `path` with `bytes` in one step.
///
/// Writes to a temporary file in the destination directory and persists it
/// over the target, so readers never observe a half-written artifact. On
/// any failure the temporary file is removed when it drops.
///
/// The temporary file is created owner-only; before the swap it takes the
/// target's current permissions, or `0644` for a new file on Unix.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let fail = |source: std::io::Error| GeoMergeError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(fail)?;
    tmp.write_all(bytes).map_err(fail)?;
    tmp.flush().map_err(fail)?;
    if let Some(perms) = target_permissions(path) {
        tmp.as_file().set_permissions(perms).map_err(fail)?;
    }
    tmp.persist(path).map_err(|e| fail(e.error))?;
    Ok(())
}

fn target_permissions(path: &Path) -> Option<Permissions> {
    match fs::metadata(path) {
        Ok(meta) => Some(meta.permissions()),
        Err(_) => new_file_permissions(),
    }
}

#[cfg(unix)]
fn new_file_permissions() -> Option<Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn new_file_permissions() -> Option<Permissions> {
    None
}

use crate::error::Result;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Replace `path` with `data` through a tempfile in the same directory, so
/// a reader sees either the old file or the new one.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    persist_via_tempfile(path, data, false)
}

/// Like [`atomic_write`], but the file is readable by its owner only.
///
/// The mode is set on the tempfile before the rename, so the secret never
/// exists on disk with wider access.
pub fn atomic_write_private(path: &Path, data: &[u8]) -> Result<()> {
    persist_via_tempfile(path, data, true)
}

fn persist_via_tempfile(path: &Path, data: &[u8], owner_only: bool) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent)?;
            parent
        }
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    #[cfg(unix)]
    if owner_only {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(tmp.path(), std::fs::Permissions::from_mode(0o600))?;
    }
    #[cfg(not(unix))]
    let _ = owner_only;
    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Write a file only if it does not already exist. Returns true if written.
pub fn write_if_missing(path: &Path, data: &[u8]) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    atomic_write(path, data)?;
    Ok(true)
}

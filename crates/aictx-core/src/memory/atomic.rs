//! All-or-nothing file replacement.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{AictxError, AictxResult, ErrorCode};

/// Replace `path` with `contents`.
///
/// The data goes to a temporary file in the same directory, which is then
/// renamed over the target, so readers see either the old or the new file.
/// An existing file's permissions are carried over.
pub fn write_atomic(path: &Path, contents: &str) -> AictxResult<()> {
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| {
        AictxError::io(
            ErrorCode::IoWrite,
            format!("cannot create temporary file in {}", dir.display()),
            e,
        )
    })?;

    tmp.write_all(contents.as_bytes())
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| AictxError::io(ErrorCode::IoWrite, "cannot write temporary file", e))?;

    match std::fs::metadata(path) {
        Ok(meta) => {
            tmp.as_file()
                .set_permissions(meta.permissions())
                .map_err(|e| AictxError::io(ErrorCode::IoWrite, "cannot copy permissions", e))?;
        }
        Err(_) => set_default_permissions(&tmp)?,
    }

    tmp.persist(path).map_err(|e| {
        AictxError::io(
            ErrorCode::IoWrite,
            format!("cannot replace {}", path.display()),
            e.error,
        )
    })?;

    tracing::debug!("Wrote {} ({} bytes)", path.display(), contents.len());
    Ok(())
}

#[cfg(unix)]
fn set_default_permissions(tmp: &NamedTempFile) -> AictxResult<()> {
    use std::os::unix::fs::PermissionsExt;

    tmp.as_file()
        .set_permissions(std::fs::Permissions::from_mode(0o644))
        .map_err(|e| AictxError::io(ErrorCode::IoWrite, "cannot set permissions", e))
}

#[cfg(not(unix))]
fn set_default_permissions(_tmp: &NamedTempFile) -> AictxResult<()> {
    Ok(())
}

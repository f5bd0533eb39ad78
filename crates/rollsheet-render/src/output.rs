//! All-or-nothing file output
//!
//! Bytes go to a temporary file in the destination directory and are
//! renamed over the target only after a successful flush. On any failure
//! the temporary file is removed when it is dropped, so the target is
//! either untouched or complete.
//!
//! A directory we cannot create files in is a [`RenderError::FileWrite`].
//! A read-only or locked target is a [`RenderError::Permission`] and is
//! never replaced.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use rollsheet_core::{AttendanceSheet, RenderError, Renderer};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::ExcelRenderer;

/// Write `bytes` to `path` atomically
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), RenderError> {
    let parent = parent_dir(path);

    if !parent.exists() {
        return Err(RenderError::FileWrite {
            path: path.to_path_buf(),
            reason: format!("directory {} does not exist", parent.display()),
        });
    }
    if !parent.is_dir() {
        return Err(RenderError::FileWrite {
            path: path.to_path_buf(),
            reason: format!("{} is not a directory", parent.display()),
        });
    }
    if path.is_dir() {
        return Err(RenderError::FileWrite {
            path: path.to_path_buf(),
            reason: "destination is a directory".into(),
        });
    }

    // Renaming only needs write access to the directory, so a read-only
    // target has to be refused before the temporary file replaces it.
    if let Ok(metadata) = fs::metadata(path) {
        if metadata.permissions().readonly() {
            return Err(RenderError::Permission {
                path: path.to_path_buf(),
            });
        }
    }

    let mut temp = NamedTempFile::new_in(&parent).map_err(|e| write_error(path, &e))?;
    debug!(temp = %temp.path().display(), "writing temporary file");

    temp.write_all(bytes).map_err(|e| write_error(path, &e))?;
    temp.as_file().sync_all().map_err(|e| write_error(path, &e))?;

    temp.persist(path).map_err(|e| persist_error(path, &e.error))?;

    info!(path = %path.display(), bytes = bytes.len(), "wrote file");
    Ok(())
}

/// Render `sheet` as XLSX and write it to `path`
pub fn write_workbook(
    path: &Path,
    sheet: &AttendanceSheet,
    renderer: &ExcelRenderer,
) -> Result<(), RenderError> {
    let bytes = renderer.render(sheet)?;
    write_atomic(path, &bytes)
}

/// Directory holding `path`; a bare file name lives in the current directory
fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn write_error(path: &Path, error: &io::Error) -> RenderError {
    RenderError::FileWrite {
        path: path.to_path_buf(),
        reason: error.to_string(),
    }
}

/// A denied rename means the target is locked, e.g. open in another program
fn persist_error(path: &Path, error: &io::Error) -> RenderError {
    if error.kind() == io::ErrorKind::PermissionDenied {
        RenderError::Permission {
            path: path.to_path_buf(),
        }
    } else {
        write_error(path, error)
    }
}

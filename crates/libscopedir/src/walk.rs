use std::{
    fs, io,
    path::{Path, PathBuf},
};

use tracing::{debug, error};

use crate::error::{Result, ScopeDirError};

/// How a removal walk responds to an entry it cannot delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FailureMode {
    /// Log the failure, record the path, and keep walking.
    Continue,
    /// Abort the walk immediately with a `Deletion` error.
    Abort,
}

/// Remove the subtree rooted at `root` in post-order: every child of a
/// directory is fully processed before the directory itself, so no attempt is
/// ever made to delete a non-empty directory. With `keep_root` the root
/// directory survives and only its descendants are removed.
///
/// A missing root is a no-op, not an error. Returns the paths that could not
/// be removed; in `FailureMode::Abort` the list is always empty because the
/// first failure surfaces as an error instead.
pub(crate) fn remove_tree(root: &Path, mode: FailureMode, keep_root: bool) -> Result<Vec<PathBuf>> {
    let mut failed = Vec::new();
    if !root.exists() {
        debug!("Nothing to remove, {} does not exist", root.display());
        return Ok(failed);
    }
    remove_dir(root, mode, keep_root, &mut failed)?;
    Ok(failed)
}

/// Remove the contents of `dir`, then `dir` itself unless `keep` is set.
fn remove_dir(dir: &Path, mode: FailureMode, keep: bool, failed: &mut Vec<PathBuf>) -> Result<()> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        // An unreadable directory cannot be emptied, so record it and skip
        // the rmdir below rather than reporting the same path twice.
        Err(err) => return note_failure(dir, err, mode, failed),
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                note_failure(dir, err, mode, failed)?;
                continue;
            }
        };
        let path = entry.path();
        let is_dir = match entry.file_type() {
            Ok(file_type) => file_type.is_dir(),
            Err(err) => {
                note_failure(&path, err, mode, failed)?;
                continue;
            }
        };
        if is_dir {
            remove_dir(&path, mode, false, failed)?;
        } else {
            // Symlinks are removed as entries; their targets are untouched.
            match fs::remove_file(&path) {
                Ok(()) => debug!("File {} removed", path.display()),
                Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                Err(err) => note_failure(&path, err, mode, failed)?,
            }
        }
    }

    if !keep {
        match fs::remove_dir(dir) {
            Ok(()) => debug!("Dir {} removed", dir.display()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => note_failure(dir, err, mode, failed)?,
        }
    }
    Ok(())
}

/// Record or surface a removal failure depending on the walk's failure mode.
fn note_failure(
    path: &Path,
    err: io::Error,
    mode: FailureMode,
    failed: &mut Vec<PathBuf>,
) -> Result<()> {
    match mode {
        FailureMode::Continue => {
            error!("Failed to delete {}: {}", path.display(), err);
            failed.push(path.to_path_buf());
            Ok(())
        }
        FailureMode::Abort => Err(ScopeDirError::Deletion {
            path: path.to_path_buf(),
            source: err,
        }),
    }
}

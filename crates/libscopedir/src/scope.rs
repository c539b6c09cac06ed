use std::{
    fmt,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::{
    error::{Result, ScopeDirError},
    exit::{self, ExitRegistry},
    walk::{self, FailureMode},
};

/// Handle to a uniquely named directory under the system temp area.
///
/// The handle is a plain value over the directory's path: it compares and
/// hashes by path, stays valid after the directory has been removed, and
/// every removal operation treats an already-missing path as a no-op. The
/// directory on disk is only ever removed by an explicit removal call or by a
/// registered exit-cleanup hook; dropping the handle leaves the directory in
/// place.
///
/// Callers serialize mutating calls on a single handle; the type takes no
/// in-memory locks of its own.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScopedDir {
    /// Absolute path of the managed directory, fixed at construction.
    path: PathBuf,
}

impl ScopedDir {
    /// Create a new uniquely named directory whose name starts with `prefix`
    /// inside the system temporary directory.
    pub fn create(prefix: &str) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(prefix)
            .tempdir()
            .map_err(|source| ScopeDirError::Creation { source })?;
        // Take ownership of the path; lifecycle is explicit, not drop-driven.
        let path = dir.keep();
        debug!("Temp directory created: {}", path.display());
        Ok(Self { path })
    }

    /// Like [`create`](Self::create), and additionally register best-effort
    /// removal of the directory with the global exit registry.
    ///
    /// A refused registration (registry already fired) is logged and does not
    /// fail construction.
    pub fn create_with_exit_cleanup(prefix: &str) -> Result<Self> {
        let scoped = Self::create(prefix)?;
        scoped.delete_on_exit();
        debug!("Temp directory {} delete on exit set", scoped.path.display());
        Ok(scoped)
    }

    /// The root path of the managed directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Register best-effort removal of this directory with the global exit
    /// registry. Best-effort: a refusal is logged, never surfaced.
    pub fn delete_on_exit(&self) {
        self.register_cleanup(exit::registry());
    }

    /// Register best-effort removal of this directory with `registry`.
    pub(crate) fn register_cleanup(&self, registry: &ExitRegistry) {
        let handle = self.clone();
        let registered = registry.register(move || {
            handle.remove();
        });
        if registered.is_none() {
            debug!("Exit cleanup for {} not registered", self.path.display());
        }
    }

    /// Remove the directory and everything below it, best-effort.
    ///
    /// The walk visits the subtree in post-order and keeps going past
    /// individual failures, removing as much as it can; failures are logged
    /// and returned as the list of paths left behind. An empty list means the
    /// root is gone. A missing root is a no-op.
    pub fn remove(&self) -> Vec<PathBuf> {
        remove_best_effort(&self.path, false)
    }

    /// Remove the directory and everything below it, aborting on the first
    /// failure.
    ///
    /// Entries removed before the abort point stay removed; nothing is rolled
    /// back. A missing root is a no-op.
    pub fn remove_strict(&self) -> Result<()> {
        walk::remove_tree(&self.path, FailureMode::Abort, false).map(|_| ())
    }

    /// Remove every descendant but keep the root directory itself, for reuse
    /// of the directory. Best-effort, like [`remove`](Self::remove).
    pub fn remove_contents(&self) -> Vec<PathBuf> {
        remove_best_effort(&self.path, true)
    }
}

impl fmt::Display for ScopedDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScopedDir({})", self.path.display())
    }
}

/// Best-effort removal shared by [`ScopedDir::remove`] and
/// [`ScopedDir::remove_contents`]: the walk itself never errors in
/// `Continue` mode, so unwrap the infallible result here.
fn remove_best_effort(root: &Path, keep_root: bool) -> Vec<PathBuf> {
    match walk::remove_tree(root, FailureMode::Continue, keep_root) {
        Ok(failed) => failed,
        // Unreachable: Continue mode records failures instead of erroring.
        Err(err) => {
            tracing::error!("Recursive removal of {} failed: {err}", root.display());
            Vec::new()
        }
    }
}

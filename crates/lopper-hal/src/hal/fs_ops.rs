//! Filesystem operations used by the workflow.

use crate::HalResult;
use std::fs::File;
use std::path::Path;

pub trait FsOps {
    /// Create `path` and any missing parents. Succeeds if it already exists.
    fn create_dir_all(&self, path: &Path) -> HalResult<()>;

    /// Copy a single file, overwriting `dst`. Parent directories of `dst` are not created.
    fn copy_file(&self, src: &Path, dst: &Path) -> HalResult<u64>;

    /// Open `path` for appending, creating it if missing.
    fn open_append(&self, path: &Path) -> HalResult<File>;

    /// Recursively remove a directory tree.
    fn remove_dir_all(&self, path: &Path) -> HalResult<()>;
}

//! Advisory `.lock` sidecar serialising writers of one file.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::error::{Result, SaveIdError};

/// Exclusive advisory lock held until drop.
#[derive(Debug)]
pub(crate) struct WriteLock {
    file: File,
    path: PathBuf,
}

impl WriteLock {
    /// Blocks until the sidecar lock for `target` is held.
    pub(crate) fn acquire(target: &Path) -> Result<Self> {
        let mut name = target.as_os_str().to_owned();
        name.push(".lock");
        let path = PathBuf::from(name);
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;
        file.lock_exclusive()
            .map_err(|err| SaveIdError::Lock(format!("{}: {err}", path.display())))?;
        tracing::trace!(lock = %path.display(), "write lock acquired");
        Ok(Self { file, path })
    }
}

impl Drop for WriteLock {
    fn drop(&mut self) {
        if let Err(err) = FileExt::unlock(&self.file) {
            tracing::warn!(lock = %self.path.display(), error = %err, "write lock release failed");
        }
    }
}

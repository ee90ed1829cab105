//! Persisted manual overrides: detected key → canonical id.
//!
//! Keys are whatever the resolver detected (a canonical id, or an
//! [`crate::UnresolvedGroupKey`] string) and are never parsed. The table only
//! grows through explicit confirmation; re-confirming a key overwrites it.
//!
//! Resolvers read an immutable [`MappingSnapshot`]. A confirmation batch
//! rewrites the whole file atomically and publishes a new snapshot with a
//! higher generation; resolvers holding the old one keep using it until they
//! are rebuilt.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::constants::MANUAL_MAPPINGS_FILE;
use crate::error::{Result, SaveIdError};
use crate::io::atomic::write_json_atomic;
use crate::io::lock::WriteLock;

/// Immutable view of the override table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingSnapshot {
    entries: BTreeMap<String, String>,
    generation: u64,
}

impl MappingSnapshot {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Snapshot over `entries` at generation 0; handy for tests and one-off runs.
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(key, id)| (key.into(), id.into()))
                .collect(),
            generation: 0,
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bumped on every successful confirm batch or reload.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, id)| (key.as_str(), id.as_str()))
    }
}

/// Non-fatal problem reading the override table; resolution continues with
/// an empty table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingWarning {
    pub path: PathBuf,
    pub reason: String,
}

impl fmt::Display for MappingWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "manual mappings at {} ignored: {}",
            self.path.display(),
            self.reason
        )
    }
}

/// Owner of the override file. Writers in other processes are tolerated: each
/// batch re-reads the file under the write lock before merging.
#[derive(Debug)]
pub struct ManualMappingStore {
    path: PathBuf,
    snapshot: Arc<MappingSnapshot>,
}

impl ManualMappingStore {
    /// Opens the table at `path`. A missing file is an empty table; an
    /// unreadable or corrupted one is an empty table plus a warning.
    #[must_use]
    pub fn open(path: &Path) -> (Self, Option<MappingWarning>) {
        let (entries, warning) = read_table(path);
        let store = Self {
            path: path.to_path_buf(),
            snapshot: Arc::new(MappingSnapshot {
                entries,
                generation: 0,
            }),
        };
        (store, warning)
    }

    /// Opens `manual_mappings.json` inside `dir`.
    #[must_use]
    pub fn in_dir(dir: &Path) -> (Self, Option<MappingWarning>) {
        Self::open(&dir.join(MANUAL_MAPPINGS_FILE))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn snapshot(&self) -> Arc<MappingSnapshot> {
        Arc::clone(&self.snapshot)
    }

    /// Merges `entries` (later entries win) and rewrites the whole file.
    ///
    /// Keys are stored exactly as given, since they are compared byte for byte
    /// with what the resolver detects; ids are trimmed. Nothing is published
    /// unless the write succeeds. Blank keys or ids are dropped; an empty batch
    /// leaves the file untouched.
    pub fn confirm_batch<I, K, V>(&mut self, entries: I) -> Result<Arc<MappingSnapshot>>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut batch = Vec::new();
        for (key, id) in entries {
            let key: String = key.into();
            let id: String = id.into();
            let id = id.trim();
            if key.trim().is_empty() || id.is_empty() {
                tracing::warn!(key = %key, id, "blank manual mapping dropped");
                continue;
            }
            batch.push((key, id.to_string()));
        }
        if batch.is_empty() {
            return Ok(self.snapshot());
        }
        let applied = batch.len();

        let merged = {
            let _lock = WriteLock::acquire(&self.path)?;
            // Another writer may have saved since this store last read the file.
            let mut merged = match read_table(&self.path) {
                (entries, None) => entries,
                (_, Some(_)) => self.snapshot.entries.clone(),
            };
            merged.extend(batch);
            write_json_atomic(&self.path, &merged).map_err(|err| SaveIdError::MappingWrite {
                path: self.path.clone(),
                reason: err.to_string(),
            })?;
            merged
        };

        self.snapshot = Arc::new(MappingSnapshot {
            entries: merged,
            generation: self.snapshot.generation + 1,
        });
        tracing::info!(
            path = %self.path.display(),
            mappings.applied = applied,
            mappings.total = self.snapshot.len(),
            mappings.generation = self.snapshot.generation,
            "manual mappings saved"
        );
        Ok(self.snapshot())
    }

    /// Re-reads the file and publishes it as a new snapshot generation.
    pub fn reload(&mut self) -> (Arc<MappingSnapshot>, Option<MappingWarning>) {
        let (entries, warning) = read_table(&self.path);
        self.snapshot = Arc::new(MappingSnapshot {
            entries,
            generation: self.snapshot.generation + 1,
        });
        (self.snapshot(), warning)
    }
}

fn read_table(path: &Path) -> (BTreeMap<String, String>, Option<MappingWarning>) {
    let warn = |reason: String| {
        tracing::warn!(path = %path.display(), reason = %reason, "manual mappings ignored");
        Some(MappingWarning {
            path: path.to_path_buf(),
            reason,
        })
    };
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == ErrorKind::NotFound => return (BTreeMap::new(), None),
        Err(err) => return (BTreeMap::new(), warn(err.to_string())),
    };
    match serde_json::from_slice::<BTreeMap<String, String>>(&bytes) {
        Ok(entries) => {
            tracing::debug!(path = %path.display(), mappings.total = entries.len(), "manual mappings loaded");
            (entries, None)
        }
        Err(err) => (BTreeMap::new(), warn(err.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_empty_without_warning() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (store, warning) = ManualMappingStore::in_dir(dir.path());
        assert!(warning.is_none());
        assert!(store.snapshot().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn corrupted_file_fails_soft() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(MANUAL_MAPPINGS_FILE);
        fs::write(&path, "{\"T-1201N\": ").expect("write");
        let (store, warning) = ManualMappingStore::open(&path);
        let warning = warning.expect("warning");
        assert_eq!(warning.path, path);
        assert!(warning.to_string().contains("ignored"));
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn confirm_batch_persists_and_bumps_generation() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (mut store, _) = ManualMappingStore::in_dir(dir.path());
        let before = store.snapshot();

        let after = store
            .confirm_batch([("T-1201N", "T-1201X"), ("GID028", "T-1201N"), ("T-1201N", "T-1201Y")])
            .expect("confirm");
        assert_eq!(after.generation(), 1);
        assert_eq!(after.get("T-1201N"), Some("T-1201Y"));
        assert_eq!(before.get("T-1201N"), None);

        let (reopened, warning) = ManualMappingStore::in_dir(dir.path());
        assert!(warning.is_none());
        assert_eq!(reopened.snapshot().len(), 2);
        assert_eq!(reopened.snapshot().get("GID028"), Some("T-1201N"));
    }

    #[test]
    fn empty_batch_and_blank_entries_skip_the_write() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (mut store, _) = ManualMappingStore::in_dir(dir.path());
        let snapshot = store
            .confirm_batch([(" ", "T-1201N"), ("GID028", "")])
            .expect("confirm");
        assert_eq!(snapshot.generation(), 0);
        assert!(!store.path().exists());
    }

    #[test]
    fn keys_are_stored_verbatim() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (mut store, _) = ManualMappingStore::in_dir(dir.path());
        let key = "unresolved_Misc _/saves/Misc ";
        store.confirm_batch([(key, " HDR-0178 ")]).expect("confirm");

        let (reopened, _) = ManualMappingStore::in_dir(dir.path());
        assert_eq!(reopened.snapshot().get(key), Some("HDR-0178"));
        assert_eq!(reopened.snapshot().get(key.trim_end()), None);
    }

    #[test]
    fn concurrent_writers_keep_each_others_entries() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (mut first, _) = ManualMappingStore::in_dir(dir.path());
        let (mut second, _) = ManualMappingStore::in_dir(dir.path());

        first.confirm_batch([("T-1201N", "T-1201X")]).expect("first");
        let snapshot = second.confirm_batch([("HDR-0178", "MK-51059")]).expect("second");
        assert_eq!(snapshot.get("T-1201N"), Some("T-1201X"));

        let (reopened, _) = ManualMappingStore::in_dir(dir.path());
        assert_eq!(reopened.snapshot().len(), 2);
    }

    #[test]
    fn reload_picks_up_external_edits() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (mut store, _) = ManualMappingStore::in_dir(dir.path());
        fs::write(store.path(), r#"{"unresolved_Misc_/saves/Misc": "HDR-0178"}"#).expect("write");
        let (snapshot, warning) = store.reload();
        assert!(warning.is_none());
        assert_eq!(snapshot.generation(), 1);
        assert_eq!(snapshot.get("unresolved_Misc_/saves/Misc"), Some("HDR-0178"));
    }
}

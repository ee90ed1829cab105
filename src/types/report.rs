//! Tree scan reports: every save found, grouped by resolved id.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::detection::{DetectionResult, GameId, UnresolvedGroupKey};

/// One save file found during a tree scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannedFile {
    pub path: PathBuf,
    /// Path relative to the scan root.
    pub relative_path: PathBuf,
    /// Folder the file sits in.
    pub folder: PathBuf,
    pub file_name: String,
    pub size_bytes: u64,
    pub detection: DetectionResult,
}

/// Folder whose saves could not be identified, reconciled as one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnresolvedGroup {
    pub key: UnresolvedGroupKey,
    pub folder_name: String,
    pub folder: PathBuf,
    pub relative_folder: PathBuf,
    /// Indexes into [`ScanReport::files`].
    pub files: Vec<usize>,
}

/// Result of scanning a source tree.
///
/// `files` is sorted lexicographically by path so anything keyed on scan order
/// (sequence numbers, display) is reproducible across runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanReport {
    pub root: PathBuf,
    pub files: Vec<ScannedFile>,
    /// Resolved id (canonical id or group key) → indexes into `files`.
    pub by_id: BTreeMap<String, Vec<usize>>,
    /// Groups still unresolved after applying manual overrides, in key order.
    pub unresolved: Vec<UnresolvedGroup>,
    /// Entries the walker could not read.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl ScanReport {
    /// Number of distinct canonical ids matched.
    #[must_use]
    pub fn matched_games(&self) -> usize {
        self.by_id
            .values()
            .filter(|indexes| {
                indexes
                    .first()
                    .is_some_and(|&idx| self.files[idx].detection.id.is_known())
            })
            .count()
    }

    #[must_use]
    pub fn unmatched_groups(&self) -> usize {
        self.unresolved.len()
    }

    #[must_use]
    pub fn unmatched_files(&self) -> usize {
        self.unresolved.iter().map(|group| group.files.len()).sum()
    }

    /// Files resolved to `id`, in path order.
    pub fn files_for<'a>(&'a self, id: &GameId) -> impl Iterator<Item = &'a ScannedFile> + 'a {
        self.by_id
            .get(id.as_str())
            .into_iter()
            .flatten()
            .map(|&idx| &self.files[idx])
    }
}

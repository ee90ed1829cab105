//! Destination planning for the canonical-id keyed output layout.
//!
//! The output side stores saves as `<root>/Dreamcast/<id>/<id>-<n>.<ext>`, so
//! every file needs a real canonical id. Planning refuses a batch containing
//! any unknown or unresolved file; copying the planned entries is left to
//! the caller.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_SAVE_EXTENSION, EXPORT_PLATFORM_DIR};
use crate::error::{Result, SaveIdError};
use crate::types::{ScanReport, ScannedFile};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportEntry {
    pub source: PathBuf,
    pub canonical_id: String,
    /// 1-based slot among this id's files.
    pub sequence: u32,
    pub destination: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportPlan {
    pub output_root: PathBuf,
    pub entries: Vec<ExportEntry>,
}

impl ExportPlan {
    /// Plans destinations for `files` under `output_root`.
    ///
    /// Files are taken in path order so numbering is reproducible. Numbers
    /// whose destination already exists on disk are skipped.
    pub fn build<'a, I>(files: I, output_root: &Path) -> Result<Self>
    where
        I: IntoIterator<Item = &'a ScannedFile>,
    {
        let mut files: Vec<&ScannedFile> = files.into_iter().collect();

        let unresolved: Vec<&ScannedFile> = files
            .iter()
            .copied()
            .filter(|file| !file.detection.id.is_known())
            .collect();
        if let Some(first) = unresolved.first() {
            return Err(SaveIdError::UnresolvedFiles {
                count: unresolved.len(),
                sample: first.path.display().to_string(),
            });
        }

        files.sort_by(|a, b| a.path.cmp(&b.path));
        files.dedup_by(|a, b| a.path == b.path);

        let platform_dir = output_root.join(EXPORT_PLATFORM_DIR);
        let mut next: HashMap<&str, u32> = HashMap::new();
        let mut entries = Vec::with_capacity(files.len());
        for file in files {
            let Some(id) = file.detection.id.known() else {
                continue;
            };
            let extension = file
                .path
                .extension()
                .map(|ext| ext.to_string_lossy().to_lowercase())
                .filter(|ext| !ext.is_empty())
                .unwrap_or_else(|| DEFAULT_SAVE_EXTENSION.to_string());
            let game_dir = platform_dir.join(id);
            let counter = next.entry(id).or_insert(1);
            let mut destination = game_dir.join(format!("{id}-{counter}.{extension}"));
            while destination.exists() {
                *counter += 1;
                destination = game_dir.join(format!("{id}-{counter}.{extension}"));
            }
            entries.push(ExportEntry {
                source: file.path.clone(),
                canonical_id: id.to_string(),
                sequence: *counter,
                destination,
            });
            *counter += 1;
        }

        tracing::debug!(
            output_root = %output_root.display(),
            entries = entries.len(),
            "export plan built"
        );
        Ok(Self {
            output_root: output_root.to_path_buf(),
            entries,
        })
    }

    /// Plans every file of a scan.
    pub fn from_report(report: &ScanReport, output_root: &Path) -> Result<Self> {
        Self::build(&report.files, output_root)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

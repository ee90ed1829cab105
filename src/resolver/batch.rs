//! Whole-tree scans: find every save under a root, resolve it, and group what
//! stays unresolved by folder.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;
use walkdir::WalkDir;

use super::Resolver;
use crate::error::{Result, SaveIdError};
use crate::reader::MetadataHints;
use crate::types::{
    DetectionResult, GameId, ScanReport, ScannedFile, UnresolvedGroup, UnresolvedGroupKey,
};

struct Candidate {
    path: PathBuf,
    size_bytes: u64,
}

impl Resolver {
    /// Scans `root` recursively for save files and resolves each one.
    ///
    /// Files come back sorted by path. Unresolved files are keyed by an
    /// [`UnresolvedGroupKey`] for their folder, and a confirmed override for
    /// that key resolves the whole folder.
    pub fn scan_tree(&self, root: &Path) -> Result<ScanReport> {
        if !root.is_dir() {
            return Err(SaveIdError::NotADirectory {
                path: root.to_path_buf(),
            });
        }

        let mut warnings = Vec::new();
        let mut candidates = Vec::new();
        let walker = WalkDir::new(root)
            .follow_links(self.options().follow_links)
            .sort_by_file_name();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!(error = %err, "scan entry skipped");
                    warnings.push(err.to_string());
                    continue;
                }
            };
            if !entry.file_type().is_file()
                || !self
                    .options()
                    .is_save_file(&entry.file_name().to_string_lossy())
            {
                continue;
            }
            let size_bytes = entry.metadata().map(|meta| meta.len()).unwrap_or_default();
            candidates.push(Candidate {
                path: entry.into_path(),
                size_bytes,
            });
        }
        candidates.sort_by(|a, b| a.path.cmp(&b.path));
        tracing::debug!(root = %root.display(), files = candidates.len(), "save files discovered");

        let detections = self.resolve_all(&candidates);

        let mut report = ScanReport {
            root: root.to_path_buf(),
            warnings,
            ..ScanReport::default()
        };
        let mut groups: BTreeMap<UnresolvedGroupKey, UnresolvedGroup> = BTreeMap::new();

        for (candidate, detection) in candidates.into_iter().zip(detections) {
            let folder = candidate
                .path
                .parent()
                .map_or_else(|| root.to_path_buf(), Path::to_path_buf);
            let detection = if detection.id == GameId::Unknown {
                self.group_unresolved(root, &folder, &mut groups, report.files.len())
            } else {
                detection
            };

            let idx = report.files.len();
            report
                .by_id
                .entry(detection.id.as_str().to_string())
                .or_default()
                .push(idx);
            report.files.push(ScannedFile {
                relative_path: relative(root, &candidate.path),
                file_name: candidate
                    .path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                folder,
                path: candidate.path,
                size_bytes: candidate.size_bytes,
                detection,
            });
        }
        report.unresolved = groups.into_values().collect();

        tracing::info!(
            root = %root.display(),
            files = report.files.len(),
            matched_games = report.matched_games(),
            unmatched_files = report.unmatched_files(),
            unmatched_groups = report.unmatched_groups(),
            "tree scan finished"
        );
        Ok(report)
    }

    /// Group key detection for an unknown file in `folder`; records the file
    /// in its group unless an override resolves the group.
    fn group_unresolved(
        &self,
        root: &Path,
        folder: &Path,
        groups: &mut BTreeMap<UnresolvedGroupKey, UnresolvedGroup>,
        file_idx: usize,
    ) -> DetectionResult {
        let key = UnresolvedGroupKey::for_folder(folder);
        if let Some(confirmed) = self.resolve_group(&key) {
            return confirmed;
        }
        groups
            .entry(key.clone())
            .or_insert_with(|| UnresolvedGroup {
                key: key.clone(),
                folder_name: folder
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                folder: folder.to_path_buf(),
                relative_folder: relative(root, folder),
                files: Vec::new(),
            })
            .files
            .push(file_idx);
        DetectionResult {
            id: GameId::Unresolved(key),
            ..DetectionResult::unknown()
        }
    }

    /// Resolves every candidate; side files are read once per folder.
    fn resolve_all(&self, candidates: &[Candidate]) -> Vec<DetectionResult> {
        let folder_hints: HashMap<&Path, OnceCell<MetadataHints>> = candidates
            .iter()
            .map(|candidate| (folder_of(candidate), OnceCell::new()))
            .collect();
        let resolve_one = |candidate: &Candidate| {
            let folder = folder_of(candidate);
            let file_name = candidate
                .path
                .file_name()
                .map(|name| name.to_string_lossy())
                .unwrap_or_default();
            match folder_hints.get(folder) {
                Some(hints) => self.resolve_with_hints(folder, &file_name, hints),
                None => self.resolve(folder, &file_name),
            }
        };

        #[cfg(feature = "parallel")]
        {
            if self.options().parallel {
                use rayon::prelude::*;
                return candidates.par_iter().map(resolve_one).collect();
            }
        }

        candidates.iter().map(resolve_one).collect()
    }
}

fn folder_of(candidate: &Candidate) -> &Path {
    candidate.path.parent().unwrap_or(Path::new(""))
}

fn relative(root: &Path, path: &Path) -> PathBuf {
    path.strip_prefix(root).unwrap_or(path).to_path_buf()
}

//! Batch reconciliation of unresolved folders.
//!
//! A session walks the unresolved groups of one [`ScanReport`] in key order.
//! Each group is confirmed against a catalog id or skipped; nothing is written
//! until [`ReconcileSession::finish`] applies every confirmation as one batch.

use std::sync::Arc;

use super::Resolver;
use crate::catalog::CatalogIndex;
use crate::error::{Result, SaveIdError};
use crate::mappings::{ManualMappingStore, MappingSnapshot};
use crate::types::{ScanReport, UnresolvedGroup, UnresolvedGroupKey};

#[derive(Debug)]
pub struct ReconcileSession {
    catalog: Arc<CatalogIndex>,
    groups: Vec<UnresolvedGroup>,
    cursor: usize,
    confirmed: Vec<(UnresolvedGroupKey, String)>,
    skipped: Vec<UnresolvedGroupKey>,
}

/// What a finished session applied.
#[derive(Debug, Clone)]
pub struct ReconcileOutcome {
    pub confirmed: usize,
    pub skipped: usize,
    /// Snapshot after the batch; unchanged when nothing was confirmed.
    pub snapshot: Arc<MappingSnapshot>,
}

impl ReconcileSession {
    #[must_use]
    pub fn new(report: &ScanReport, catalog: Arc<CatalogIndex>) -> Self {
        Self {
            catalog,
            groups: report.unresolved.clone(),
            cursor: 0,
            confirmed: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Group awaiting a decision.
    #[must_use]
    pub fn current(&self) -> Option<&UnresolvedGroup> {
        self.groups.get(self.cursor)
    }

    /// 1-based position of the current group and the total, for progress display.
    #[must_use]
    pub fn progress(&self) -> (usize, usize) {
        ((self.cursor + 1).min(self.groups.len()), self.groups.len())
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.groups.len().saturating_sub(self.cursor)
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.cursor >= self.groups.len()
    }

    /// Search text for the current group: its folder name with anything but
    /// ASCII letters, digits and whitespace blanked out.
    #[must_use]
    pub fn suggested_query(&self) -> Option<String> {
        let group = self.current()?;
        let blanked: String = group
            .folder_name
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c.is_whitespace() {
                    c
                } else {
                    ' '
                }
            })
            .collect();
        Some(blanked.split_whitespace().collect::<Vec<_>>().join(" "))
    }

    /// Maps the current group to `canonical_id` and moves on.
    pub fn confirm(&mut self, canonical_id: &str) -> Result<()> {
        let Some(group) = self.groups.get(self.cursor) else {
            return Err(SaveIdError::ReconcileFinished);
        };
        let id = canonical_id.trim();
        if !self.catalog.contains(id) {
            return Err(SaveIdError::UnknownCanonicalId { id: id.to_string() });
        }
        tracing::debug!(key = %group.key, id, "group confirmed");
        self.confirmed.push((group.key.clone(), id.to_string()));
        self.cursor += 1;
        Ok(())
    }

    pub fn skip(&mut self) -> Result<()> {
        let Some(group) = self.groups.get(self.cursor) else {
            return Err(SaveIdError::ReconcileFinished);
        };
        self.skipped.push(group.key.clone());
        self.cursor += 1;
        Ok(())
    }

    /// Skips every group still pending; returns how many were skipped.
    pub fn skip_all(&mut self) -> usize {
        let pending = self.remaining();
        self.skipped
            .extend(self.groups[self.cursor.min(self.groups.len())..].iter().map(|g| g.key.clone()));
        self.cursor = self.groups.len();
        pending
    }

    #[must_use]
    pub fn confirmations(&self) -> &[(UnresolvedGroupKey, String)] {
        &self.confirmed
    }

    /// Applies every confirmation to `store` in one batch. Pending groups are
    /// left unresolved.
    pub fn finish(self, store: &mut ManualMappingStore) -> Result<ReconcileOutcome> {
        let confirmed = self.confirmed.len();
        let skipped = self.skipped.len() + self.remaining();
        let snapshot = store.confirm_batch(
            self.confirmed
                .into_iter()
                .map(|(key, id)| (key.as_str().to_string(), id)),
        )?;
        tracing::info!(confirmed, skipped, "reconciliation finished");
        Ok(ReconcileOutcome {
            confirmed,
            skipped,
            snapshot,
        })
    }
}

impl Resolver {
    /// Reconciliation session over `report`'s unresolved groups, validated
    /// against this resolver's catalog.
    #[must_use]
    pub fn reconcile(&self, report: &ScanReport) -> ReconcileSession {
        ReconcileSession::new(report, Arc::clone(self.catalog()))
    }
}

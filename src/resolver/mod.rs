//! Save identification: path, filename, metadata files and title matching,
//! tried in that order, with manual overrides as the final authority.
//!
//! A [`Resolver`] owns nothing mutable. It pairs one catalog with one mapping
//! snapshot, so every call is a pure function of those two plus its input and
//! resolvers can be shared freely across threads. Picking up new overrides
//! means building a new resolver with [`Resolver::with_snapshot`] or
//! [`Resolver::reload`].

pub mod batch;
pub mod reconcile;

use std::path::Path;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::catalog::CatalogIndex;
use crate::mappings::{ManualMappingStore, MappingSnapshot};
use crate::reader::{MetadataHints, metadata};
use crate::search::{best_title_match, rank};
use crate::types::{
    CatalogRecord, Confidence, DetectionResult, GameId, ResolverOptions, SearchHit, SearchResponse,
    SourceTag, UnresolvedGroupKey,
};

pub use reconcile::{ReconcileOutcome, ReconcileSession};

#[derive(Debug, Clone)]
pub struct Resolver {
    catalog: Arc<CatalogIndex>,
    mappings: Arc<MappingSnapshot>,
    options: ResolverOptions,
}

impl Resolver {
    #[must_use]
    pub fn new(
        catalog: Arc<CatalogIndex>,
        mappings: Arc<MappingSnapshot>,
        options: ResolverOptions,
    ) -> Self {
        tracing::debug!(
            catalog.fingerprint = catalog.fingerprint(),
            catalog.games = catalog.len(),
            mappings.generation = mappings.generation(),
            mappings.total = mappings.len(),
            "resolver created"
        );
        Self {
            catalog,
            mappings,
            options,
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &Arc<CatalogIndex> {
        &self.catalog
    }

    #[must_use]
    pub fn mappings(&self) -> &Arc<MappingSnapshot> {
        &self.mappings
    }

    #[must_use]
    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// Same catalog and options over a different override snapshot.
    #[must_use]
    pub fn with_snapshot(&self, mappings: Arc<MappingSnapshot>) -> Self {
        Self::new(Arc::clone(&self.catalog), mappings, self.options.clone())
    }

    #[must_use]
    pub fn with_catalog(&self, catalog: Arc<CatalogIndex>) -> Self {
        Self::new(catalog, Arc::clone(&self.mappings), self.options.clone())
    }

    /// Resolver over the store's current snapshot.
    #[must_use]
    pub fn reload(&self, store: &ManualMappingStore) -> Self {
        self.with_snapshot(store.snapshot())
    }

    /// Identifies the save `file_name` found in `folder`.
    #[must_use]
    pub fn resolve(&self, folder: &Path, file_name: &str) -> DetectionResult {
        self.resolve_with_hints(folder, file_name, &OnceCell::new())
    }

    /// [`Resolver::resolve`] reading `folder`'s side files through `hints`,
    /// so saves sharing a folder scan it at most once.
    pub(crate) fn resolve_with_hints(
        &self,
        folder: &Path,
        file_name: &str,
        hints: &OnceCell<MetadataHints>,
    ) -> DetectionResult {
        let detected = self.detect(folder, file_name, hints);
        let resolved = self.apply_override(detected);
        tracing::trace!(
            folder = %folder.display(),
            file_name,
            id = %resolved.id,
            confidence = resolved.confidence.label(),
            source = resolved.source.label(),
            "save resolved"
        );
        resolved
    }

    /// Override for an unresolved folder group, if one was confirmed.
    #[must_use]
    pub fn resolve_group(&self, key: &UnresolvedGroupKey) -> Option<DetectionResult> {
        self.mappings
            .get(key.as_str())
            .map(|id| DetectionResult::user_confirmed(id.to_string()))
    }

    /// Ranked catalog hits for `query`, capped at the configured search limit.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<SearchHit> {
        self.search_response(query).hits
    }

    /// Catalog records whose id resembles `id`, for correcting a wrong detection.
    #[must_use]
    pub fn similar(&self, id: &str) -> Vec<&CatalogRecord> {
        self.catalog.similar_ids(id)
    }

    #[must_use]
    pub fn search_response(&self, query: &str) -> SearchResponse {
        rank(&self.catalog, query, self.options.search_limit)
    }

    fn detect(
        &self,
        folder: &Path,
        file_name: &str,
        hints: &OnceCell<MetadataHints>,
    ) -> DetectionResult {
        if let GameId::Known(id) = self.catalog.extract_game_id(&folder.to_string_lossy()) {
            return DetectionResult::detected(id, Confidence::High, SourceTag::Path);
        }
        if let GameId::Known(id) = self.catalog.extract_game_id(file_name) {
            return DetectionResult::detected(id, Confidence::High, SourceTag::Filename);
        }
        if !self.options.use_metadata {
            return DetectionResult::unknown();
        }

        let hints = hints.get_or_init(|| metadata::scan(folder));
        for hint in &hints.serial_hints {
            let found = if self.catalog.contains(hint) {
                Some(hint.as_str())
            } else {
                self.catalog.fuzzy_match(hint)
            };
            if let Some(id) = found {
                return DetectionResult::detected(
                    id.to_string(),
                    Confidence::High,
                    SourceTag::MetadataFile,
                );
            }
        }

        if let Some((record, score)) = best_title_match(
            &self.catalog,
            &hints.title_hints,
            self.options.title_match_threshold,
        ) {
            tracing::debug!(folder = %folder.display(), id = %record.id, score, "title hint matched");
            return DetectionResult::detected(
                record.id.clone(),
                Confidence::Medium,
                SourceTag::TitleMatch,
            );
        }

        DetectionResult::unknown()
    }

    fn apply_override(&self, detected: DetectionResult) -> DetectionResult {
        match detected.id.known().and_then(|id| self.mappings.get(id)) {
            Some(mapped) => DetectionResult::user_confirmed(mapped.to_string()),
            None => detected,
        }
    }
}

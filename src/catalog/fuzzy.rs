//! Candidate → canonical id resolution against a fixed catalog.

use super::CatalogIndex;
use crate::constants::ALIAS_PREFIX;
use crate::pattern::{extract_candidates, hyphen_variations, strip_separators};
use crate::types::{CatalogRecord, GameId};

impl CatalogIndex {
    /// Canonical id for `candidate`, trying alias, exact, separator-free and
    /// re-hyphenated forms in that order.
    #[must_use]
    pub fn fuzzy_match(&self, candidate: &str) -> Option<&str> {
        let upper = candidate.trim().to_uppercase();
        if upper.is_empty() {
            return None;
        }

        if upper.starts_with(ALIAS_PREFIX) {
            if let Some(id) = self.alias(&upper) {
                return Some(id);
            }
        }

        if let Some((key, _)) = self.records.get_key_value(upper.as_str()) {
            return Some(key.as_str());
        }

        let stripped = strip_separators(&upper);
        if stripped.is_empty() {
            return None;
        }
        if stripped != upper && stripped.starts_with(ALIAS_PREFIX) {
            if let Some(id) = self.alias(&stripped) {
                return Some(id);
            }
        }
        if let Some(key) = self.stripped_key(&stripped) {
            return Some(key);
        }

        hyphen_variations(&stripped).into_iter().find_map(|variation| {
            self.records
                .get_key_value(variation.as_str())
                .map(|(key, _)| key.as_str())
        })
    }

    /// First candidate in `path` that resolves, else the most specific path
    /// segment that does, else [`GameId::Unknown`].
    #[must_use]
    pub fn extract_game_id(&self, path: &str) -> GameId {
        for candidate in extract_candidates(path) {
            if let Some(id) = self.fuzzy_match(&candidate) {
                tracing::trace!(candidate = %candidate, id, "candidate matched");
                return GameId::Known(id.to_string());
            }
        }

        let normalized = path.replace('\\', "/");
        for segment in normalized.split('/').rev() {
            if segment.is_empty() {
                continue;
            }
            let stem = segment.split('.').next().unwrap_or(segment).trim();
            if let Some(id) = self.fuzzy_match(stem) {
                tracing::trace!(segment, id, "path segment matched");
                return GameId::Known(id.to_string());
            }
        }

        GameId::Unknown
    }

    /// Records whose id, reduced to ASCII letters and digits, contains or is
    /// contained in `id` reduced the same way; catalog order.
    ///
    /// Lists the alternatives for a detected id that looks wrong. An id with no
    /// letters or digits has no similar records.
    #[must_use]
    pub fn similar_ids(&self, id: &str) -> Vec<&CatalogRecord> {
        let needle = alphanumeric_upper(id);
        if needle.is_empty() {
            return Vec::new();
        }
        self.records()
            .filter(|record| {
                let key = alphanumeric_upper(&record.id);
                !key.is_empty() && (key.contains(&needle) || needle.contains(&key))
            })
            .collect()
    }
}

fn alphanumeric_upper(text: &str) -> String {
    text.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

//! Immutable in-memory view of the reference catalog.
//!
//! A [`CatalogIndex`] is assembled once through a [`CatalogBuilder`] (or one of
//! the loaders in [`source`]) and never mutated afterwards. Resolvers share it
//! behind an `Arc`; a catalog refresh builds a new index and a new resolver.

pub mod fuzzy;
pub mod source;

use std::collections::{BTreeMap, HashMap};

use crate::pattern::strip_separators;
use crate::types::CatalogRecord;

pub use source::decode_catalog_bytes;

/// Canonical id → record, plus the compact alias table.
#[derive(Debug, Clone)]
pub struct CatalogIndex {
    records: BTreeMap<String, CatalogRecord>,
    aliases: BTreeMap<String, String>,
    /// Separator-free key → first canonical key (in key order) that strips to it.
    stripped: HashMap<String, String>,
    fingerprint: String,
}

impl CatalogIndex {
    #[must_use]
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    /// Index with no records; every lookup misses.
    #[must_use]
    pub fn empty() -> Self {
        CatalogBuilder::default().build()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&CatalogRecord> {
        self.records.get(id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in catalog iteration order (ascending canonical id).
    pub fn records(&self) -> impl Iterator<Item = &CatalogRecord> {
        self.records.values()
    }

    /// Canonical id for a compact alias such as `GID028`.
    #[must_use]
    pub fn alias(&self, compact: &str) -> Option<&str> {
        self.aliases.get(compact).map(String::as_str)
    }

    #[must_use]
    pub fn aliases(&self) -> &BTreeMap<String, String> {
        &self.aliases
    }

    /// Hex BLAKE3 digest of every record and alias, stable across loads of the
    /// same content regardless of source order.
    #[must_use]
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub(crate) fn stripped_key(&self, stripped: &str) -> Option<&str> {
        self.stripped.get(stripped).map(String::as_str)
    }
}

impl Default for CatalogIndex {
    fn default() -> Self {
        Self::empty()
    }
}

/// Accumulates records and aliases before freezing them into a [`CatalogIndex`].
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    records: BTreeMap<String, CatalogRecord>,
    aliases: BTreeMap<String, String>,
}

impl CatalogBuilder {
    /// Adds `record` unless its id is already present; returns whether it was added.
    pub fn insert(&mut self, record: CatalogRecord) -> bool {
        if self.records.contains_key(&record.id) {
            return false;
        }
        self.records.insert(record.id.clone(), record);
        true
    }

    /// Maps a compact alias to a canonical id, replacing any earlier mapping.
    pub fn alias<A: Into<String>, C: Into<String>>(&mut self, compact: A, canonical: C) {
        self.aliases
            .insert(compact.into().trim().to_uppercase(), canonical.into());
    }

    #[must_use]
    pub fn with_record(mut self, record: CatalogRecord) -> Self {
        self.insert(record);
        self
    }

    #[must_use]
    pub fn with_alias<A: Into<String>, C: Into<String>>(mut self, compact: A, canonical: C) -> Self {
        self.alias(compact, canonical);
        self
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn build(self) -> CatalogIndex {
        let mut stripped = HashMap::with_capacity(self.records.len());
        for key in self.records.keys() {
            stripped
                .entry(strip_separators(&key.to_uppercase()))
                .or_insert_with(|| key.clone());
        }
        let fingerprint = fingerprint_of(&self.records, &self.aliases);
        tracing::debug!(
            catalog.games = self.records.len(),
            catalog.aliases = self.aliases.len(),
            catalog.fingerprint = %fingerprint,
            "catalog index built"
        );
        CatalogIndex {
            records: self.records,
            aliases: self.aliases,
            stripped,
            fingerprint,
        }
    }
}

fn fingerprint_of(
    records: &BTreeMap<String, CatalogRecord>,
    aliases: &BTreeMap<String, String>,
) -> String {
    let mut hasher = blake3::Hasher::new();
    for record in records.values() {
        for field in [
            record.id.as_str(),
            record.title.as_str(),
            record.region.as_str(),
            record.version.as_deref().unwrap_or(""),
            record.languages.as_deref().unwrap_or(""),
        ] {
            hasher.update(field.as_bytes());
            hasher.update(&[0x1f]);
        }
        hasher.update(&[0x1e]);
    }
    hasher.update(&[0x1d]);
    for (compact, canonical) in aliases {
        hasher.update(compact.as_bytes());
        hasher.update(&[0x1f]);
        hasher.update(canonical.as_bytes());
        hasher.update(&[0x1e]);
    }
    hasher.finalize().to_hex().to_string()
}

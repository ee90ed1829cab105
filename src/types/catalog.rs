//! Catalog records and the structured catalog document.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One game in the reference catalog, keyed by its canonical id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRecord {
    pub id: String,
    pub title: String,
    pub region: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub languages: Option<String>,
}

impl CatalogRecord {
    pub fn new<I, T, R>(id: I, title: T, region: R) -> Self
    where
        I: Into<String>,
        T: Into<String>,
        R: Into<String>,
    {
        Self {
            id: id.into(),
            title: title.into(),
            region: region.into(),
            version: None,
            languages: None,
        }
    }
}

/// Record shape inside [`CatalogDocument::games`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gameid: Option<String>,
    pub title: String,
    #[serde(default)]
    pub region: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub languages: Option<String>,
    /// Compact legacy id recorded as an alias of this record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gid: Option<String>,
}

/// Structured catalog document as cached on disk.
///
/// `games` is kept as raw JSON so one malformed record only costs that record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogDocument {
    #[serde(default)]
    pub version: u32,
    #[serde(default, alias = "lastUpdated", skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    #[serde(default, alias = "totalGames")]
    pub total_games: usize,
    #[serde(default)]
    pub games: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl CatalogDocument {
    /// `last_updated` as UTC; accepts RFC 3339 and offset-less ISO-8601 timestamps.
    #[must_use]
    pub fn last_updated_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.last_updated.as_deref()?.trim();
        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Some(parsed.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }
}

/// Counters produced while parsing a catalog source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogLoadReport {
    pub loaded: usize,
    pub skipped: usize,
    pub aliases: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl CatalogLoadReport {
    pub(crate) fn skip<S: Into<String>>(&mut self, warning: S) {
        self.skipped += 1;
        self.warnings.push(warning.into());
    }
}

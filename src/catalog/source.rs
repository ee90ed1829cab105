//! Catalog loaders: the pipe-delimited text table, the structured JSON
//! document and the vendor CSV export.
//!
//! Every loader skips malformed lines or records and counts them in a
//! [`CatalogLoadReport`]; only an unreadable file or a document that is not a
//! catalog at all is an error.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;

use encoding_rs::{UTF_8, WINDOWS_1252};
use serde_json::Value;

use super::{CatalogBuilder, CatalogIndex};
use crate::constants::{
    ALIAS_PREFIX, CATALOG_DOCUMENT_VERSION, CATALOG_JSON_FILES, CATALOG_SOURCE, CATALOG_TEXT_FILE,
};
use crate::error::{Result, SaveIdError};
use crate::io::atomic::write_json_atomic;
use crate::types::{CatalogDocument, CatalogLoadReport, CatalogRecord, DocumentRecord};

/// Decodes raw catalog bytes: UTF-8 (BOM optional), else Windows-1252.
#[must_use]
pub fn decode_catalog_bytes(bytes: &[u8]) -> String {
    let body = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    if let Some(text) = UTF_8.decode_without_bom_handling_and_without_replacement(body) {
        return text.into_owned();
    }
    log::debug!("catalog bytes are not UTF-8, decoding as windows-1252");
    let (text, _) = WINDOWS_1252.decode_without_bom_handling(body);
    text.into_owned()
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl CatalogIndex {
    /// Parses the `|Region|Title|GameID|Optional|` text table.
    ///
    /// When a traditional id is read, every compact (`GID###`) entry read
    /// before it with the identical title becomes an alias of it.
    #[must_use]
    pub fn parse_pipe(text: &str) -> (Self, CatalogLoadReport) {
        let mut builder = CatalogBuilder::default();
        let mut report = CatalogLoadReport::default();
        let mut compact_by_title: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let mut aliases = BTreeMap::new();

        for (line_no, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let parts: Vec<&str> = line.split('|').collect();
            if parts.len() < 4 {
                report.skip(format!("line {}: expected |Region|Title|GameID|", line_no + 1));
                continue;
            }
            let region = parts[1].trim();
            let title = parts[2].trim();
            let id = parts[3].trim();
            if id.is_empty() || title.is_empty() {
                report.skip(format!("line {}: missing id or title", line_no + 1));
                continue;
            }

            if builder.insert(CatalogRecord::new(id, title, region)) {
                report.loaded += 1;
            }
            if id.starts_with(ALIAS_PREFIX) {
                let compact = compact_by_title.entry(title.to_string()).or_default();
                if !compact.iter().any(|known| known == id) {
                    compact.push(id.to_string());
                }
            } else if let Some(compact) = compact_by_title.get(title) {
                for gid in compact {
                    aliases.insert(gid.clone(), id.to_string());
                }
            }
        }

        report.aliases = aliases.len();
        for (gid, canonical) in aliases {
            builder.alias(gid, canonical);
        }
        (builder.build(), report)
    }

    /// Parses a structured catalog document.
    ///
    /// A record that does not deserialize or has an empty title is skipped;
    /// its `gid` field, when present, becomes an alias of the record's key.
    pub fn parse_document(json: &str) -> Result<(Self, CatalogLoadReport)> {
        let document: CatalogDocument = serde_json::from_str(json)?;
        Ok(Self::from_document(document))
    }

    #[must_use]
    pub fn from_document(document: CatalogDocument) -> (Self, CatalogLoadReport) {
        let mut builder = CatalogBuilder::default();
        let mut report = CatalogLoadReport::default();

        if document.total_games != 0 && document.total_games != document.games.len() {
            tracing::warn!(
                catalog.total_games = document.total_games,
                catalog.games = document.games.len(),
                "catalog document game count mismatch"
            );
        }

        for (key, value) in document.games {
            let record: DocumentRecord = match serde_json::from_value(value) {
                Ok(record) => record,
                Err(err) => {
                    report.skip(format!("{key}: {err}"));
                    continue;
                }
            };
            let id = key.trim();
            let title = record.title.trim();
            if id.is_empty() || title.is_empty() {
                report.skip(format!("{key}: missing id or title"));
                continue;
            }
            let mut entry = CatalogRecord::new(id, title, record.region.trim());
            entry.version = optional(record.version);
            entry.languages = optional(record.languages);
            if builder.insert(entry) {
                report.loaded += 1;
            }
            if let Some(gid) = optional(record.gid) {
                builder.alias(gid, id);
                report.aliases += 1;
            }
        }

        (builder.build(), report)
    }

    /// Parses the `;`-delimited vendor export (optional `sep=;` first line,
    /// header naming `GameID`, `Title`, `Region`, `Version`, `Languages`).
    ///
    /// Trailing `~` padding is stripped from ids and the first occurrence of an
    /// id wins.
    pub fn parse_vendor_csv(text: &str) -> Result<(Self, CatalogLoadReport)> {
        let mut lines = text.trim().lines().peekable();
        if lines.peek().is_some_and(|line| line.starts_with("sep=")) {
            lines.next();
        }
        let header = lines.next().map(split_csv_row).unwrap_or_default();
        let column = |name: &str| header.iter().position(|field| field.trim() == name);
        let (Some(id_col), Some(title_col)) = (column("GameID"), column("Title")) else {
            return Err(SaveIdError::InvalidCatalog {
                path: "vendor csv".into(),
                reason: "header lacks GameID/Title columns".into(),
            });
        };
        let region_col = column("Region");
        let version_col = column("Version");
        let languages_col = column("Languages");

        let mut builder = CatalogBuilder::default();
        let mut report = CatalogLoadReport::default();
        for (row_no, line) in lines.enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let fields = split_csv_row(line);
            let field = |col: Option<usize>| {
                col.and_then(|idx| fields.get(idx))
                    .map(|value| value.trim().to_string())
                    .unwrap_or_default()
            };
            let id = field(Some(id_col));
            let id = id.trim_end_matches('~');
            let title = field(Some(title_col));
            if id.is_empty() || title.is_empty() {
                report.skip(format!("row {}: missing id or title", row_no + 1));
                continue;
            }
            let mut entry = CatalogRecord::new(id, title, field(region_col));
            entry.version = optional(Some(field(version_col)));
            entry.languages = optional(Some(field(languages_col)));
            if builder.insert(entry) {
                report.loaded += 1;
            }
        }

        tracing::info!(catalog.games = report.loaded, "vendor catalog parsed");
        Ok((builder.build(), report))
    }

    pub fn load_pipe_file(path: &Path) -> Result<(Self, CatalogLoadReport)> {
        let bytes = fs::read(path)?;
        let (index, report) = Self::parse_pipe(&decode_catalog_bytes(&bytes));
        if index.is_empty() {
            return Err(SaveIdError::InvalidCatalog {
                path: path.to_path_buf(),
                reason: "no records".into(),
            });
        }
        Ok((index, report))
    }

    pub fn load_document_file(path: &Path) -> Result<(Self, CatalogLoadReport)> {
        let bytes = fs::read(path)?;
        Self::parse_document(&decode_catalog_bytes(&bytes)).map_err(|err| match err {
            SaveIdError::Json(err) => SaveIdError::InvalidCatalog {
                path: path.to_path_buf(),
                reason: err.to_string(),
            },
            other => other,
        })
    }

    /// Loads the first usable catalog in `dir`: the text table, then each
    /// JSON document in turn. A source that fails to load is logged and the
    /// next one is tried.
    pub fn load_from_dir(dir: &Path) -> Result<(Self, CatalogLoadReport)> {
        let text_path = dir.join(CATALOG_TEXT_FILE);
        if text_path.is_file() {
            match Self::load_pipe_file(&text_path) {
                Ok(loaded) => {
                    log_loaded(&text_path, &loaded.1);
                    return Ok(loaded);
                }
                Err(err) => {
                    tracing::warn!(path = %text_path.display(), error = %err, "catalog load failed");
                }
            }
        }

        for name in CATALOG_JSON_FILES {
            let path = dir.join(name);
            if !path.is_file() {
                continue;
            }
            match Self::load_document_file(&path) {
                Ok(loaded) => {
                    log_loaded(&path, &loaded.1);
                    return Ok(loaded);
                }
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "catalog load failed");
                }
            }
        }

        Err(SaveIdError::CatalogNotFound {
            dir: dir.to_path_buf(),
        })
    }
}

fn log_loaded(path: &Path, report: &CatalogLoadReport) {
    tracing::info!(
        path = %path.display(),
        catalog.games = report.loaded,
        catalog.aliases = report.aliases,
        catalog.skipped = report.skipped,
        "catalog loaded"
    );
}

/// Splits one `;`-delimited row, honouring double-quoted fields with `""` escapes.
fn split_csv_row(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '"' if quoted && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => quoted = !quoted,
            ';' if !quoted => fields.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    fields.push(current);
    fields
}

impl CatalogDocument {
    /// Document snapshot of `index`, stamped with the current time.
    #[must_use]
    pub fn from_index(index: &CatalogIndex) -> Self {
        let mut gid_by_id: BTreeMap<&str, &str> = BTreeMap::new();
        for (gid, canonical) in index.aliases() {
            gid_by_id.entry(canonical.as_str()).or_insert(gid.as_str());
        }
        let games = index
            .records()
            .map(|record| {
                let doc = DocumentRecord {
                    gameid: Some(record.id.clone()),
                    title: record.title.clone(),
                    region: record.region.clone(),
                    version: record.version.clone(),
                    languages: record.languages.clone(),
                    gid: gid_by_id.get(record.id.as_str()).map(|gid| (*gid).to_string()),
                };
                let value = serde_json::to_value(doc).unwrap_or(Value::Null);
                (record.id.clone(), value)
            })
            .collect();
        Self {
            version: CATALOG_DOCUMENT_VERSION,
            last_updated: Some(chrono::Utc::now().to_rfc3339()),
            total_games: index.len(),
            games,
            source: Some(CATALOG_SOURCE.to_string()),
        }
    }

    pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Writes the document to `path` atomically.
    pub fn save(&self, path: &Path) -> Result<()> {
        write_json_atomic(path, self)?;
        tracing::debug!(path = %path.display(), catalog.games = self.total_games, "catalog document saved");
        Ok(())
    }
}

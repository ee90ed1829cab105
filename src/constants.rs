//! Well-known file names, score weights and sentinel strings.

/// Pipe-delimited catalog, preferred when present.
pub const CATALOG_TEXT_FILE: &str = "vmupro_gamedb.txt";
/// Structured catalog documents, tried in this order after the text file.
pub const CATALOG_JSON_FILES: [&str; 2] = ["vmupro_gamedb.json", "redump_dreamcast.json"];
/// Persisted manual override table.
pub const MANUAL_MAPPINGS_FILE: &str = "manual_mappings.json";
/// Source tag written into cached catalog documents.
pub const CATALOG_SOURCE: &str = "K3zter/vmu-save-splitter";
/// Schema version written into cached catalog documents.
pub const CATALOG_DOCUMENT_VERSION: u32 = 3;

/// Sentinel printed for an identifier that could not be determined.
pub const UNKNOWN_ID: &str = "UNKNOWN";
/// Prefix of synthetic keys grouping unresolved files by folder.
pub const UNRESOLVED_PREFIX: &str = "unresolved_";
/// Prefix of compact legacy identifiers (`GID028`).
pub const ALIAS_PREFIX: &str = "GID";

/// Top-level folder the export plan writes into.
pub const EXPORT_PLATFORM_DIR: &str = "Dreamcast";
/// Default save file extension (VM2 dumps).
pub const DEFAULT_SAVE_EXTENSION: &str = "vmu";

pub const SCORE_ID_EXACT: i64 = 10_000;
pub const SCORE_TITLE_EXACT: i64 = 9_000;
pub const SCORE_ID_PREFIX: i64 = 8_000;
pub const SCORE_TITLE_PREFIX: i64 = 7_000;
pub const SCORE_ID_CONTAINS: i64 = 5_000;
pub const SCORE_TITLE_CONTAINS: i64 = 4_000;
pub const SCORE_REGION_EXACT: i64 = 3_000;
pub const SCORE_WORD_EXACT: i64 = 500;
pub const SCORE_ALL_WORDS_BONUS: i64 = 2_000;
pub const SCORE_WORD_PREFIX: i64 = 200;
pub const SCORE_WORD_CONTAINS: i64 = 100;
pub const SCORE_LONG_TITLE_PENALTY: i64 = 500;
/// Queries shorter than this many characters are penalised against long titles.
pub const SHORT_QUERY_CHARS: usize = 10;
/// Titles longer than this many characters count as long.
pub const LONG_TITLE_CHARS: usize = 50;

/// Minimum best score for a title hint to be accepted.
pub const DEFAULT_TITLE_MATCH_THRESHOLD: i64 = 500;
/// Result cap for interactive search.
pub const DEFAULT_SEARCH_LIMIT: usize = 200;

//! Relevance scoring between free text and catalog records.
//!
//! The same score drives interactive search and the automatic title-match
//! step of the resolver, so a title the user would find at the top of a search
//! is the one the resolver picks.

use std::time::Instant;

use crate::catalog::CatalogIndex;
use crate::constants::{
    LONG_TITLE_CHARS, SCORE_ALL_WORDS_BONUS, SCORE_ID_CONTAINS, SCORE_ID_EXACT, SCORE_ID_PREFIX,
    SCORE_LONG_TITLE_PENALTY, SCORE_REGION_EXACT, SCORE_TITLE_CONTAINS, SCORE_TITLE_EXACT,
    SCORE_TITLE_PREFIX, SCORE_WORD_CONTAINS, SCORE_WORD_EXACT, SCORE_WORD_PREFIX,
    SHORT_QUERY_CHARS,
};
use crate::types::{CatalogRecord, SearchHit, SearchResponse};

/// Query words shorter than this are ignored by word matching.
const MIN_WORD_CHARS: usize = 3;

/// Scores `query` against one record. Case-insensitive; never negative.
#[must_use]
pub fn score(query: &str, id: &str, title: &str, region: &str) -> i64 {
    let query = query.trim().to_lowercase();
    let id = id.to_lowercase();
    let title_lower = title.to_lowercase();

    if query == id {
        return SCORE_ID_EXACT;
    }
    if query == title_lower {
        return SCORE_TITLE_EXACT;
    }
    if id.starts_with(&query) {
        return SCORE_ID_PREFIX;
    }
    if title_lower.starts_with(&query) {
        return SCORE_TITLE_PREFIX;
    }

    let mut total = 0;
    if id.contains(&query) {
        total += SCORE_ID_CONTAINS;
    }
    if title_lower.contains(&query) {
        total += SCORE_TITLE_CONTAINS;
    }
    if query == region.to_lowercase() {
        total += SCORE_REGION_EXACT;
    }

    let query_words: Vec<&str> = query
        .split_whitespace()
        .filter(|word| word.chars().count() >= MIN_WORD_CHARS)
        .collect();
    let title_words: Vec<&str> = title_lower.split_whitespace().collect();
    if !query_words.is_empty() {
        let exact = query_words
            .iter()
            .filter(|word| title_words.contains(*word))
            .count();
        total += SCORE_WORD_EXACT * exact as i64;
        if exact == query_words.len() {
            total += SCORE_ALL_WORDS_BONUS;
        }
        for word in &query_words {
            for title_word in &title_words {
                if title_word.starts_with(word) {
                    total += SCORE_WORD_PREFIX;
                } else if title_word.contains(word) {
                    total += SCORE_WORD_CONTAINS;
                }
            }
        }
    }

    if query.chars().count() < SHORT_QUERY_CHARS && title.chars().count() > LONG_TITLE_CHARS {
        total -= SCORE_LONG_TITLE_PENALTY;
    }
    total.max(0)
}

#[must_use]
pub fn score_record(query: &str, record: &CatalogRecord) -> i64 {
    score(query, &record.id, &record.title, &record.region)
}

/// Ranks every record against `query`, best first, keeping catalog order among
/// equal scores. A blank query lists the whole catalog with score 0.
#[must_use]
pub fn rank(index: &CatalogIndex, query: &str, limit: usize) -> SearchResponse {
    let started = Instant::now();
    let trimmed = query.trim();

    let mut scored: Vec<(&CatalogRecord, i64)> = if trimmed.is_empty() {
        index.records().map(|record| (record, 0)).collect()
    } else {
        index
            .records()
            .map(|record| (record, score_record(trimmed, record)))
            .filter(|(_, score)| *score > 0)
            .collect()
    };
    scored.sort_by(|a, b| b.1.cmp(&a.1));
    let total_hits = scored.len();

    let hits = scored
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(idx, (record, score))| SearchHit {
            rank: idx + 1,
            id: record.id.clone(),
            title: record.title.clone(),
            region: record.region.clone(),
            score,
        })
        .collect();

    let elapsed_ms = started.elapsed().as_millis();
    tracing::debug!(query = trimmed, total_hits, elapsed_ms = %elapsed_ms, "catalog search");
    SearchResponse {
        query: trimmed.to_string(),
        elapsed_ms,
        total_hits,
        hits,
    }
}

/// Best record for any of `hints`; the first record reaching the strictly
/// highest score wins, and nothing is returned below `threshold`.
#[must_use]
pub fn best_title_match<'a, S: AsRef<str>>(
    index: &'a CatalogIndex,
    hints: &[S],
    threshold: i64,
) -> Option<(&'a CatalogRecord, i64)> {
    let mut best: Option<(&CatalogRecord, i64)> = None;
    for hint in hints {
        let hint = hint.as_ref();
        if hint.trim().is_empty() {
            continue;
        }
        for record in index.records() {
            let candidate = score(hint, &record.id, &record.title, &record.region);
            if best.is_none_or(|(_, top)| candidate > top) {
                best = Some((record, candidate));
            }
        }
    }
    best.filter(|(_, top)| *top >= threshold)
}

//! Public search request/response types exposed by the core library.

use serde::{Deserialize, Serialize};

/// A single ranked catalog hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    /// 1-based position in the ranked list.
    pub rank: usize,
    pub id: String,
    pub title: String,
    pub region: String,
    pub score: i64,
}

/// Full search response with hits and bookkeeping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Query echoed back for clients.
    pub query: String,
    /// Milliseconds spent satisfying the request.
    pub elapsed_ms: u128,
    /// Hits with a positive score, before the limit was applied.
    pub total_hits: usize,
    /// Ranked hits.
    pub hits: Vec<SearchHit>,
}

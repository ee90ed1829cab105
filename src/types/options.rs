//! Builder-style options controlling how saves are resolved and scanned.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_SAVE_EXTENSION, DEFAULT_SEARCH_LIMIT, DEFAULT_TITLE_MATCH_THRESHOLD};

fn default_true() -> bool {
    true
}

fn default_title_match_threshold() -> i64 {
    DEFAULT_TITLE_MATCH_THRESHOLD
}

fn default_save_extension() -> String {
    DEFAULT_SAVE_EXTENSION.to_string()
}

fn default_search_limit() -> usize {
    DEFAULT_SEARCH_LIMIT
}

/// Tunable options for a [`crate::Resolver`].
///
/// Every field has a serde default so a partial JSON settings object deserializes
/// cleanly; builders make it easy to set only what you need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverOptions {
    /// Minimum best title score for a title hint to resolve a save.
    #[serde(default = "default_title_match_threshold")]
    pub title_match_threshold: i64,
    /// Read metadata side files when path and filename detection fail.
    #[serde(default = "default_true")]
    pub use_metadata: bool,
    /// Extension (without dot, case-insensitive) of save files picked up by tree scans.
    #[serde(default = "default_save_extension")]
    pub save_extension: String,
    /// Maximum hits returned by interactive search.
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,
    /// Follow symlinks while walking a source tree.
    #[serde(default)]
    pub follow_links: bool,
    /// Resolve scanned files on the rayon pool (needs the `parallel` feature).
    #[serde(default = "default_true")]
    pub parallel: bool,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            title_match_threshold: DEFAULT_TITLE_MATCH_THRESHOLD,
            use_metadata: true,
            save_extension: default_save_extension(),
            search_limit: DEFAULT_SEARCH_LIMIT,
            follow_links: false,
            parallel: true,
        }
    }
}

impl ResolverOptions {
    /// Start a fluent builder for `ResolverOptions`.
    #[must_use]
    pub fn builder() -> ResolverOptionsBuilder {
        ResolverOptionsBuilder::default()
    }

    /// True when `file_name` carries the configured save extension.
    #[must_use]
    pub fn is_save_file(&self, file_name: &str) -> bool {
        file_name
            .rsplit_once('.')
            .is_some_and(|(_, ext)| ext.eq_ignore_ascii_case(&self.save_extension))
    }
}

#[derive(Debug, Clone, Default)]
pub struct ResolverOptionsBuilder {
    inner: ResolverOptions,
}

impl ResolverOptionsBuilder {
    #[must_use]
    pub fn title_match_threshold(mut self, threshold: i64) -> Self {
        self.inner.title_match_threshold = threshold;
        self
    }

    #[must_use]
    pub fn use_metadata(mut self, enabled: bool) -> Self {
        self.inner.use_metadata = enabled;
        self
    }

    pub fn save_extension<S: Into<String>>(mut self, extension: S) -> Self {
        let extension = extension.into();
        self.inner.save_extension = extension.trim_start_matches('.').to_string();
        self
    }

    #[must_use]
    pub fn search_limit(mut self, limit: usize) -> Self {
        self.inner.search_limit = limit;
        self
    }

    #[must_use]
    pub fn follow_links(mut self, enabled: bool) -> Self {
        self.inner.follow_links = enabled;
        self
    }

    #[must_use]
    pub fn parallel(mut self, enabled: bool) -> Self {
        self.inner.parallel = enabled;
        self
    }

    #[must_use]
    pub fn build(self) -> ResolverOptions {
        self.inner
    }
}

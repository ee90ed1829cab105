//! Per-save detection results.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{UNKNOWN_ID, UNRESOLVED_PREFIX};

/// Trust level attached to a detected id.
///
/// Variants are declared lowest first so the derived ordering reads
/// `Manual > High > Medium > Low > Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Confidence {
    Unknown,
    Low,
    Medium,
    High,
    Manual,
}

impl Confidence {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Manual => "MANUAL",
        }
    }
}

/// Which detector produced the id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceTag {
    Path,
    Filename,
    MetadataFile,
    TitleMatch,
    UserConfirmed,
    None,
}

impl SourceTag {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Path => "Path",
            Self::Filename => "Filename",
            Self::MetadataFile => "Metadata File",
            Self::TitleMatch => "Title Match",
            Self::UserConfirmed => "User Confirmed",
            Self::None => "",
        }
    }
}

/// Synthetic key grouping the unresolved saves of one source folder.
///
/// Opaque: callers compare it and hand it back to the mapping store, never parse it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnresolvedGroupKey(String);

impl UnresolvedGroupKey {
    /// Key for `folder`; the full path is embedded so equal base names never collide.
    #[must_use]
    pub fn for_folder(folder: &Path) -> Self {
        let base = folder
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self(format!("{UNRESOLVED_PREFIX}{base}_{}", folder.display()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UnresolvedGroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of identifying a save: a canonical id, an unresolved folder group, or nothing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum GameId {
    Known(String),
    Unresolved(UnresolvedGroupKey),
    Unknown,
}

impl GameId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(id) => id,
            Self::Unresolved(key) => key.as_str(),
            Self::Unknown => UNKNOWN_ID,
        }
    }

    #[must_use]
    pub fn known(&self) -> Option<&str> {
        match self {
            Self::Known(id) => Some(id),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ephemeral result of one resolution; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub id: GameId,
    pub confidence: Confidence,
    pub source: SourceTag,
}

impl DetectionResult {
    #[must_use]
    pub fn unknown() -> Self {
        Self {
            id: GameId::Unknown,
            confidence: Confidence::Unknown,
            source: SourceTag::None,
        }
    }

    pub(crate) fn detected(id: String, confidence: Confidence, source: SourceTag) -> Self {
        Self {
            id: GameId::Known(id),
            confidence,
            source,
        }
    }

    pub(crate) fn user_confirmed(id: String) -> Self {
        Self::detected(id, Confidence::Manual, SourceTag::UserConfirmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn confidence_orders_manual_highest() {
        let mut levels = vec![
            Confidence::Medium,
            Confidence::Manual,
            Confidence::Unknown,
            Confidence::High,
            Confidence::Low,
        ];
        levels.sort();
        assert_eq!(
            levels,
            vec![
                Confidence::Unknown,
                Confidence::Low,
                Confidence::Medium,
                Confidence::High,
                Confidence::Manual,
            ]
        );
    }

    #[test]
    fn group_keys_embed_full_path() {
        let a = UnresolvedGroupKey::for_folder(&PathBuf::from("/saves/card1/Misc"));
        let b = UnresolvedGroupKey::for_folder(&PathBuf::from("/saves/card2/Misc"));
        assert_ne!(a, b);
        assert_eq!(a.as_str(), "unresolved_Misc_/saves/card1/Misc");
        assert_eq!(
            a,
            UnresolvedGroupKey::for_folder(&PathBuf::from("/saves/card1/Misc"))
        );
    }

    #[test]
    fn unknown_displays_sentinel() {
        assert_eq!(GameId::Unknown.to_string(), "UNKNOWN");
        assert_eq!(DetectionResult::unknown().source.label(), "");
    }
}

//! Metadata side-file reading: classification, decoding and hint extraction.

pub mod decode;
pub mod metadata;

pub use decode::{DecodedText, TextEncoding, decode_text};
pub use metadata::{MetadataHints, scan};

/// File names (lowercased) whose every line is a title candidate.
pub const TITLE_FILE_NAMES: [&str; 4] = ["title.txt", "title", "game.txt", "gamename.txt"];

/// Extensions (lowercased, without dot) of generic hint files.
pub const GENERIC_HINT_EXTENSIONS: [&str; 2] = ["txt", "dat"];

/// How a file in a save folder contributes hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HintFileKind {
    /// Dedicated title file; every qualifying line is a hint.
    Title,
    /// Other text or data file; only its first few qualifying lines count.
    Generic,
    Ignored,
}

impl HintFileKind {
    #[must_use]
    pub fn classify(file_name: &str) -> Self {
        let lower = file_name.to_lowercase();
        if TITLE_FILE_NAMES.contains(&lower.as_str()) {
            return Self::Title;
        }
        match lower.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() && GENERIC_HINT_EXTENSIONS.contains(&ext) => {
                Self::Generic
            }
            _ => Self::Ignored,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Generic => "generic",
            Self::Ignored => "ignored",
        }
    }
}

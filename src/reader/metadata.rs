//! Serial and title hints from the side files next to a save.

use std::fs;
use std::path::Path;

use once_cell::sync::OnceCell;

use super::HintFileKind;
use super::decode::decode_text;
use crate::pattern::{RuleSpec, RuleTable};
use crate::pattern::rules::shared_table;

const SERIAL_RULES: &[RuleSpec] = &[RuleSpec {
    name: "serial",
    pattern: r"\b([A-Z]{1,3}-\d{4,5}(?:-\d{2})?)\b",
    templates: &["{1}"],
}];

/// Lines kept from a dedicated title file, in characters.
const TITLE_FILE_LINE_CHARS: std::ops::Range<usize> = 3..150;
/// Lines kept from any other text file, in characters.
const GENERIC_LINE_CHARS: std::ops::Range<usize> = 6..100;
/// Title hints taken from one generic file.
const GENERIC_LINE_LIMIT: usize = 5;

fn serial_table() -> Option<&'static RuleTable> {
    static TABLE: OnceCell<std::result::Result<RuleTable, String>> = OnceCell::new();
    shared_table(&TABLE, SERIAL_RULES, "saveid::metadata")
}

/// Hints gathered from one folder, in file name order then file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataHints {
    pub serial_hints: Vec<String>,
    pub title_hints: Vec<String>,
}

impl MetadataHints {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.serial_hints.is_empty() && self.title_hints.is_empty()
    }
}

/// Reads the hint files directly inside `folder`; subfolders are not visited.
///
/// Missing folders and unreadable or undecodable files contribute nothing.
#[must_use]
pub fn scan(folder: &Path) -> MetadataHints {
    let mut hints = MetadataHints::default();
    let entries = match fs::read_dir(folder) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::debug!(folder = %folder.display(), error = %err, "metadata folder unreadable");
            return hints;
        }
    };
    let mut files: Vec<_> = entries
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.path().is_file())
        .collect();
    files.sort_by_key(fs::DirEntry::file_name);

    for entry in files {
        let name = entry.file_name().to_string_lossy().into_owned();
        let kind = HintFileKind::classify(&name);
        if kind == HintFileKind::Ignored {
            continue;
        }
        let path = entry.path();
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::debug!(path = %path.display(), error = %err, "metadata file unreadable");
                continue;
            }
        };
        let Some(decoded) = decode_text(&bytes) else {
            tracing::debug!(path = %path.display(), "metadata file undecodable");
            continue;
        };
        tracing::trace!(path = %path.display(), encoding = decoded.encoding, kind = kind.label(), "metadata file read");
        collect(&decoded.text, kind, &mut hints);
    }
    hints
}

fn collect(text: &str, kind: HintFileKind, hints: &mut MetadataHints) {
    if let Some(table) = serial_table() {
        hints.serial_hints.extend(table.apply(text));
    }
    let (range, limit) = match kind {
        HintFileKind::Title => (TITLE_FILE_LINE_CHARS, usize::MAX),
        HintFileKind::Generic => (GENERIC_LINE_CHARS, GENERIC_LINE_LIMIT),
        HintFileKind::Ignored => return,
    };
    let titles = text
        .split('\n')
        .map(str::trim)
        .filter(|line| range.contains(&line.chars().count()))
        .map(clean_title)
        .filter(|line| !line.is_empty())
        .take(limit);
    hints.title_hints.extend(titles);
}

/// Punctuation outside word characters, whitespace and `-:&!?'` becomes a
/// space, then whitespace runs collapse to one space.
fn clean_title(line: &str) -> String {
    let replaced: String = line
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' || c.is_whitespace() || "-:&!?'".contains(c) {
                c
            } else {
                ' '
            }
        })
        .collect();
    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_file_lines_and_serials() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(
            dir.path().join("TITLE.TXT"),
            "Sonic   Adventure (US)\nT-1201N\nab\nSerial: MK-51190-50 / HDR-0178\n",
        )
        .expect("write");

        let hints = scan(dir.path());
        assert_eq!(
            hints.title_hints,
            vec!["Sonic Adventure US", "T-1201N", "Serial: MK-51190-50 HDR-0178"]
        );
        assert_eq!(hints.serial_hints, vec!["MK-51190-50", "HDR-0178"]);
    }

    #[test]
    fn generic_files_keep_five_lines() {
        let dir = tempfile::tempdir().expect("tempdir");
        let body = "short\nline one here\nline two here\nline three here\nline four here\nline five here\nline six here\n";
        fs::write(dir.path().join("notes.txt"), body).expect("write");
        fs::write(dir.path().join("save.vmu"), "Ignored Title T-9999N").expect("write");

        let hints = scan(dir.path());
        assert_eq!(hints.title_hints.len(), 5);
        assert_eq!(hints.title_hints[0], "line one here");
        assert_eq!(hints.title_hints[4], "line five here");
        assert!(hints.serial_hints.is_empty());
    }

    #[test]
    fn utf16_title_file_and_subfolders() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut bytes = vec![0xFF, 0xFE];
        bytes.extend("Shenmue\r\nHDR-0178".encode_utf16().flat_map(u16::to_le_bytes));
        fs::write(dir.path().join("gamename.txt"), bytes).expect("write");
        fs::create_dir(dir.path().join("nested")).expect("mkdir");
        fs::write(dir.path().join("nested").join("title.txt"), "Other Game").expect("write");

        let hints = scan(dir.path());
        assert_eq!(hints.title_hints, vec!["Shenmue", "HDR-0178"]);
        assert_eq!(hints.serial_hints, vec!["HDR-0178"]);
    }

    #[test]
    fn missing_folder_is_empty() {
        assert!(scan(Path::new("/definitely/not/here")).is_empty());
    }
}

//! Candidate extraction: identifier-shaped substrings of paths and file names.

use once_cell::sync::OnceCell;

use super::rules::{RuleSpec, RuleTable, shared_table};

/// Most specific shape first; the word token catches publisher/series folders.
const EXTRACTION_RULES: &[RuleSpec] = &[
    RuleSpec {
        name: "hyphenated",
        pattern: r"[A-Z]{1,3}-\d{4,6}(?:-[A-Z0-9]{1,2})?",
        templates: &["{0}"],
    },
    RuleSpec {
        name: "unhyphenated",
        pattern: r"[A-Z]{1,3}\d{4,7}[A-Z]?",
        templates: &["{0}"],
    },
    RuleSpec {
        name: "numeric_hyphen",
        pattern: r"\d{3}-\d{4}",
        templates: &["{0}"],
    },
    RuleSpec {
        name: "numeric",
        pattern: r"\d{7}",
        templates: &["{0}"],
    },
    RuleSpec {
        name: "compact_alias",
        pattern: r"GID\d{3}",
        templates: &["{0}"],
    },
    RuleSpec {
        name: "word",
        pattern: r"[A-Z]{3,10}",
        templates: &["{0}"],
    },
];

fn extraction_table() -> Option<&'static RuleTable> {
    static TABLE: OnceCell<std::result::Result<RuleTable, String>> = OnceCell::new();
    shared_table(&TABLE, EXTRACTION_RULES, "saveid::extract")
}

/// Candidate substrings of `text`, uppercased, in rule priority then leftmost order.
///
/// Duplicates are kept; the same substring can satisfy several shapes.
#[must_use]
pub fn extract_candidates(text: &str) -> Vec<String> {
    let Some(table) = extraction_table() else {
        return Vec::new();
    };
    let upper = text.to_uppercase();
    table.apply(&upper).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hyphenated_ids_come_first() {
        let candidates = extract_candidates("saves/t-1201n Sonic Adventure/HDR-0178.vmu");
        // A trailing letter is only part of the hyphenated shape after a second hyphen.
        assert_eq!(
            candidates,
            vec!["T-1201", "HDR-0178", "SAVES", "SONIC", "ADVENTURE", "HDR", "VMU"]
        );
    }

    #[test]
    fn numeric_and_alias_shapes() {
        let candidates = extract_candidates("610-7390 6107390 gid028");
        assert_eq!(candidates, vec!["610-7390", "6107390", "GID028", "GID"]);
    }

    #[test]
    fn word_token_splits_long_runs() {
        let candidates = extract_candidates("VMUGAMESCOLLECTION");
        assert_eq!(candidates, vec!["VMUGAMESCO", "LLECTION"]);
    }

    #[test]
    fn nothing_identifier_shaped() {
        assert!(extract_candidates("").is_empty());
        assert!(extract_candidates("###").is_empty());
        assert!(extract_candidates("a1 b2").is_empty());
    }
}

//! Hyphenation variants of a separator-free candidate.
//!
//! Vendor ids come in a handful of grammars (`T-1201N`, `HDR-0178`,
//! `MK-51190-50`, `T-36803-N`, `610-7390`). Save dumps routinely drop the
//! hyphens, so a stripped candidate is re-hyphenated every way a known grammar
//! allows and the caller keeps whichever variant the catalog knows.

use std::collections::HashSet;

use once_cell::sync::OnceCell;

use super::rules::{RuleSpec, RuleTable, shared_table};

/// Characters treated as separators inside identifiers.
pub const SEPARATORS: [char; 2] = ['-', '_'];

const VARIANT_RULES: &[RuleSpec] = &[
    RuleSpec {
        name: "letter_4digit_letter",
        pattern: r"^([A-Z])(\d{4})([A-Z])$",
        templates: &["{1}-{2}{3}"],
    },
    RuleSpec {
        name: "letter_4digit_digit",
        pattern: r"^([A-Z])(\d{4})(\d)$",
        templates: &["{1}-{2}-{3}", "{1}-{2}{3}"],
    },
    RuleSpec {
        name: "letter_5digit_letter",
        pattern: r"^([A-Z])(\d{5})([A-Z])$",
        templates: &["{1}-{2}-{3}", "{1}-{2}{3}"],
    },
    RuleSpec {
        name: "letters_4digit",
        pattern: r"^([A-Z]{2,3})(\d{4})$",
        templates: &["{1}-{2}"],
    },
    RuleSpec {
        name: "letters_4digit_suffix",
        pattern: r"^([A-Z]{2,3})(\d{4})(\d{1,2})$",
        templates: &["{1}-{2}-{3}", "{1}-{2}{3}"],
    },
    // Eight-character dump names cut the region suffix short: MK511905 is MK-51190-50.
    RuleSpec {
        name: "two_letter_5digit_digit",
        pattern: r"^([A-Z]{2})(\d{5})(\d)$",
        templates: &["{1}-{2}-{3}", "{1}-{2}{3}", "{1}-{2}-{3}0"],
    },
    RuleSpec {
        name: "two_letter_5digit_2digit",
        pattern: r"^([A-Z]{2})(\d{5})(\d{2})$",
        templates: &["{1}-{2}-{3}", "{1}-{2}{3}"],
    },
    RuleSpec {
        name: "two_letter_4digit_2digit",
        pattern: r"^([A-Z]{2})(\d{4})(\d{2})$",
        templates: &["{1}-{2}-{3}", "{1}-{2}{3}"],
    },
    RuleSpec {
        name: "numeric",
        pattern: r"^(\d{3})(\d{4})$",
        templates: &["{1}-{2}"],
    },
    RuleSpec {
        name: "long_body",
        pattern: r"^([A-Z]{1,2})(\d{5,6})([A-Z]?)$",
        templates: &["{1}-{2}-{3}", "{1}-{2}{3}"],
    },
    RuleSpec {
        name: "three_letter_5digit",
        pattern: r"^([A-Z]{3})(\d{5})$",
        templates: &["{1}-{2}"],
    },
    RuleSpec {
        name: "generic",
        pattern: r"^([A-Z]+)(\d+)([A-Z]*)$",
        templates: &["{1}-{2}{3}", "{1}-{2}-{3}"],
    },
];

fn variant_table() -> Option<&'static RuleTable> {
    static TABLE: OnceCell<std::result::Result<RuleTable, String>> = OnceCell::new();
    shared_table(&TABLE, VARIANT_RULES, "saveid::normalize")
}

/// `candidate` with every separator removed.
#[must_use]
pub fn strip_separators(candidate: &str) -> String {
    candidate.chars().filter(|c| !SEPARATORS.contains(c)).collect()
}

/// Distinct hyphenated forms of `candidate`, first-generated first.
///
/// Input is expected uppercased; separators are stripped before matching and a
/// trailing hyphen left by an empty suffix group is dropped.
#[must_use]
pub fn hyphen_variations(candidate: &str) -> Vec<String> {
    let Some(table) = variant_table() else {
        return Vec::new();
    };
    let clean = strip_separators(candidate);
    let mut seen = HashSet::new();
    let mut variations = Vec::new();
    for variation in table.apply(&clean) {
        let variation = variation.trim_end_matches('-');
        if !variation.is_empty() && seen.insert(variation.to_string()) {
            variations.push(variation.to_string());
        }
    }
    variations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_letter_grammars() {
        assert_eq!(hyphen_variations("T1201N"), vec!["T-1201N", "T-1201-N"]);
        assert_eq!(hyphen_variations("T12015"), vec!["T-1201-5", "T-12015"]);
        assert_eq!(
            hyphen_variations("T36803N"),
            vec!["T-36803-N", "T-36803N"]
        );
    }

    #[test]
    fn truncated_region_suffix_is_padded() {
        let variations = hyphen_variations("MK511905");
        assert!(variations.contains(&"MK-51190-50".to_string()));
        assert!(variations.contains(&"MK-5119-05".to_string()));
        assert!(variations.contains(&"MK-51190-5".to_string()));
    }

    #[test]
    fn numeric_and_three_letter_grammars() {
        assert_eq!(hyphen_variations("6107390"), vec!["610-7390"]);
        assert_eq!(hyphen_variations("HDR0178"), vec!["HDR-0178"]);
        assert_eq!(hyphen_variations("IND16963"), vec!["IND-1696-3", "IND-16963"]);
    }

    #[test]
    fn separators_are_ignored_and_trailing_hyphens_dropped() {
        assert_eq!(hyphen_variations("T-15128"), vec!["T-1512-8", "T-15128"]);
        assert_eq!(hyphen_variations("HDR_0178"), vec!["HDR-0178"]);
    }

    #[test]
    fn non_identifier_yields_nothing() {
        assert!(hyphen_variations("SONIC").is_empty());
        assert!(hyphen_variations("").is_empty());
    }
}

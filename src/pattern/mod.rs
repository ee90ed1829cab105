//! Identifier shapes: candidate extraction and hyphenation, both driven by
//! ordered [`RuleTable`]s.

pub mod extract;
pub mod normalize;
pub mod rules;

pub use extract::extract_candidates;
pub use normalize::{SEPARATORS, hyphen_variations, strip_separators};
pub use rules::{RuleSpec, RuleTable, ShapeRule};

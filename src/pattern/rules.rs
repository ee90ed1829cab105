//! Ordered shape-rule tables.
//!
//! A [`RuleTable`] is a list of `(pattern, output templates)` pairs tried in
//! priority order. For every rule, every match (leftmost first) renders every
//! template, so callers see results in rule order, then match order, then
//! template order. Candidate extraction and hyphenation both run on this one
//! matcher, which keeps their tie-break behaviour identical.
//!
//! Templates reference capture groups as `{N}`; `{0}` is the whole match and a
//! group that did not participate renders as the empty string.

use once_cell::sync::OnceCell;
use regex::{Captures, Regex};

use crate::error::{Result, SaveIdError};

/// Declarative form of a rule, compiled into a [`ShapeRule`].
#[derive(Debug, Clone, Copy)]
pub struct RuleSpec {
    pub name: &'static str,
    pub pattern: &'static str,
    pub templates: &'static [&'static str],
}

#[derive(Debug)]
pub struct ShapeRule {
    name: &'static str,
    regex: Regex,
    templates: &'static [&'static str],
}

impl ShapeRule {
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

#[derive(Debug)]
pub struct RuleTable {
    rules: Vec<ShapeRule>,
}

impl RuleTable {
    pub fn compile(specs: &[RuleSpec]) -> Result<Self> {
        let rules = specs
            .iter()
            .map(|spec| {
                let regex = Regex::new(spec.pattern).map_err(|err| SaveIdError::InvalidRule {
                    pattern: spec.pattern.to_string(),
                    reason: err.to_string(),
                })?;
                Ok(ShapeRule {
                    name: spec.name,
                    regex,
                    templates: spec.templates,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    #[must_use]
    pub fn rules(&self) -> &[ShapeRule] {
        &self.rules
    }

    /// Every rendered output for `text`, in rule, match, then template order.
    pub fn apply<'t>(&'t self, text: &'t str) -> impl Iterator<Item = String> + 't {
        self.rules.iter().flat_map(move |rule| {
            rule.regex.captures_iter(text).flat_map(move |caps| {
                rule.templates
                    .iter()
                    .map(move |template| render(template, &caps))
            })
        })
    }
}

fn render(template: &str, caps: &Captures<'_>) -> String {
    let mut out = String::with_capacity(template.len() + 8);
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => match after[..close].parse::<usize>() {
                Ok(group) => {
                    out.push_str(caps.get(group).map_or("", |m| m.as_str()));
                    rest = &after[close + 1..];
                }
                Err(_) => {
                    out.push('{');
                    rest = after;
                }
            },
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Compile `specs` once per `cell`; a broken table logs and yields `None`.
pub(crate) fn shared_table(
    cell: &'static OnceCell<std::result::Result<RuleTable, String>>,
    specs: &[RuleSpec],
    target: &'static str,
) -> Option<&'static RuleTable> {
    let table = cell.get_or_init(|| RuleTable::compile(specs).map_err(|err| err.to_string()));
    match table {
        Ok(table) => Some(table),
        Err(msg) => {
            tracing::error!(table = target, error = %msg, "shape rule table init failed");
            None
        }
    }
}

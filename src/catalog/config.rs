//! Declarative catalog configuration.
//!
//! The slot vocabulary is data: a TOML document listing every slot, its
//! values and their surface patterns, plus the rules for writing corrected
//! MRs back out. See `data/e2e.toml` for the built-in restaurant catalog.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Top-level catalog document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Rules for serializing corrected MRs.
    #[serde(default)]
    pub output: OutputConfig,
    /// Slots in scan order.
    #[serde(rename = "slot", default)]
    pub slots: Vec<SlotConfig>,
}

/// How a slot's values are realized in text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotKind {
    /// Values are literal strings (proper names) matched as written.
    Verbatim,
    /// Values are categories, each with its own paraphrase patterns.
    Categorical,
}

/// One slot definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotConfig {
    /// Slot name as used in parsed MRs (snake_case).
    pub name: String,
    /// Verbatim or categorical.
    pub kind: SlotKind,
    /// Literal values (verbatim slots only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
    /// Values with their patterns (categorical slots only).
    #[serde(rename = "value", default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<ValueConfig>,
}

/// A categorical value and its realizations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueConfig {
    /// Canonical value, in the casing reported back.
    pub value: String,
    /// Regex realizations, tried in order.
    pub patterns: Vec<PatternSpec>,
}

/// A single realization pattern.
///
/// Written either as a bare string or as a table with a `not_after` guard:
///
/// ```toml
/// patterns = ['riverside', { pattern = '(?:good|well) rated', not_after = 'very ' }]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PatternSpec {
    /// Plain regex.
    Plain(String),
    /// Regex whose matches are dropped when immediately preceded by `not_after`.
    Guarded {
        /// The regex.
        pattern: String,
        /// Case-insensitive text that must not directly precede a match.
        #[serde(default)]
        not_after: Option<String>,
    },
}

impl PatternSpec {
    /// The regex source.
    #[must_use]
    pub fn pattern(&self) -> &str {
        match self {
            PatternSpec::Plain(p) => p,
            PatternSpec::Guarded { pattern, .. } => pattern,
        }
    }

    /// The preceding-context guard, if any.
    #[must_use]
    pub fn not_after(&self) -> Option<&str> {
        match self {
            PatternSpec::Plain(_) => None,
            PatternSpec::Guarded { not_after, .. } => {
                not_after.as_deref().filter(|g| !g.is_empty())
            }
        }
    }
}

impl From<&str> for PatternSpec {
    fn from(pattern: &str) -> Self {
        PatternSpec::Plain(pattern.to_string())
    }
}

/// Rules for rendering an MR back to its bracket string form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Slot priority; slots not listed sort after listed ones, alphabetically.
    #[serde(default)]
    pub slot_order: Vec<String>,
    /// Display names for slots, e.g. `rating` → `customer rating`.
    #[serde(default)]
    pub rename: BTreeMap<String, String>,
    /// Convert `snake_case` slot names to `camelCase` on output.
    #[serde(default)]
    pub camel_case: bool,
}

impl OutputConfig {
    /// Sort key for a slot.
    #[must_use]
    pub fn slot_rank(&self, slot: &str) -> usize {
        self.slot_order
            .iter()
            .position(|s| s == slot)
            .unwrap_or(self.slot_order.len())
    }

    /// Slot name as written in serialized MRs.
    ///
    /// ```
    /// use semerr::catalog::OutputConfig;
    ///
    /// let mut out = OutputConfig::default();
    /// out.camel_case = true;
    /// out.rename.insert("rating".into(), "customer rating".into());
    /// assert_eq!(out.display_slot("price_range"), "priceRange");
    /// assert_eq!(out.display_slot("rating"), "customer rating");
    /// ```
    #[must_use]
    pub fn display_slot(&self, slot: &str) -> String {
        let name = self.rename.get(slot).map(String::as_str).unwrap_or(slot);
        if self.camel_case {
            snake_to_camel(name)
        } else {
            name.to_string()
        }
    }
}

/// `price_range` → `priceRange`. Only an underscore followed by a lowercase ASCII letter is folded.
fn snake_to_camel(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut chars = name.chars().peekable();
    while let Some(c) = chars.next() {
        match (c, chars.peek()) {
            ('_', Some(next)) if next.is_ascii_lowercase() => {
                out.push(next.to_ascii_uppercase());
                chars.next();
            }
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mixed_pattern_array() {
        let doc = r#"
            [[slot]]
            name = "rating"
            kind = "categorical"
            [[slot.value]]
            value = "average"
            patterns = ['average', { pattern = 'good', not_after = 'very ' }]
        "#;
        let cfg: CatalogConfig = toml::from_str(doc).unwrap();
        let patterns = &cfg.slots[0].categories[0].patterns;
        assert_eq!(patterns[0], PatternSpec::from("average"));
        assert_eq!(patterns[1].pattern(), "good");
        assert_eq!(patterns[1].not_after(), Some("very "));
    }

    #[test]
    fn empty_guard_is_no_guard() {
        let spec = PatternSpec::Guarded {
            pattern: "good".into(),
            not_after: Some(String::new()),
        };
        assert_eq!(spec.not_after(), None);
    }

    #[test]
    fn snake_to_camel_cases() {
        assert_eq!(snake_to_camel("eat_type"), "eatType");
        assert_eq!(snake_to_camel("family_friendly"), "familyFriendly");
        assert_eq!(snake_to_camel("name"), "name");
        assert_eq!(snake_to_camel("trailing_"), "trailing_");
    }

    #[test]
    fn unknown_slots_rank_last() {
        let out = OutputConfig {
            slot_order: vec!["name".into(), "food".into()],
            ..OutputConfig::default()
        };
        assert_eq!(out.slot_rank("name"), 0);
        assert_eq!(out.slot_rank("food"), 1);
        assert_eq!(out.slot_rank("decor"), 2);
    }
}

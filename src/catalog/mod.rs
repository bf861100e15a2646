//! Pattern catalog: compiled surface-form matchers for every slot.
//!
//! Built once from a [`CatalogConfig`] and immutable afterwards, so a single
//! catalog can be shared by reference across any number of evaluations
//! (it is `Send + Sync`).
//!
//! - **Verbatim slots** compile all literal values into one alternation; a
//!   match is reported with the catalog's casing via the canonicalization table.
//! - **Categorical slots** compile one alternation per value from that value's
//!   paraphrase patterns.
//!
//! Every pattern is padded with `\b` on both sides unless it starts with `^`
//! (no leading boundary) or ends with `$` (no trailing boundary), and matching
//! is case-insensitive.
//!
//! # Example
//!
//! ```rust
//! use semerr::catalog::{PatternCatalog, SlotMatcher};
//!
//! let catalog = PatternCatalog::e2e();
//! let area = catalog.slot("area").unwrap();
//! assert!(matches!(area.matcher(), SlotMatcher::Categorical(_)));
//! assert_eq!(catalog.canonical_value("near", "café rouge"), Some("Café Rouge"));
//! ```

mod config;

pub use config::{CatalogConfig, OutputConfig, PatternSpec, SlotConfig, SlotKind, ValueConfig};

use crate::da::DialogueAct;
use crate::{Error, Result};
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use semerr_core::MeaningRepresentation;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Source of the built-in E2E restaurant-domain catalog.
pub const E2E_CATALOG_TOML: &str = include_str!("../../data/e2e.toml");

// The embedded catalog is a compile-time constant; failing to build it is a
// programmer error that should surface immediately.
static E2E_CATALOG: Lazy<PatternCatalog> = Lazy::new(|| {
    PatternCatalog::from_toml_str(E2E_CATALOG_TOML).expect("embedded E2E catalog is invalid")
});

// Unicode `\w` under repetition grows quickly; the rating patterns need headroom.
const REGEX_SIZE_LIMIT: usize = 64 * (1 << 20);

// =============================================================================
// Compiled patterns
// =============================================================================

/// One compiled alternation plus the guards of its guarded alternatives.
#[derive(Debug, Clone)]
pub struct CompiledPatterns {
    regex: Regex,
    /// (capture group index, lower-cased guard) for every guarded alternative.
    guards: Vec<(usize, String)>,
    /// Unguarded alternatives only; retried where a guard blocked a match.
    fallback: Option<Regex>,
}

impl CompiledPatterns {
    /// Compile a list of patterns into one case-insensitive alternation.
    pub fn compile(patterns: &[PatternSpec]) -> Result<Self> {
        if patterns.is_empty() {
            return Err(Error::catalog("empty pattern list"));
        }

        let mut alternatives = Vec::with_capacity(patterns.len());
        let mut unguarded = Vec::with_capacity(patterns.len());
        let mut guard_names = Vec::new();
        for (i, spec) in patterns.iter().enumerate() {
            let bounded = with_word_boundaries(spec.pattern());
            match spec.not_after() {
                Some(guard) => {
                    let name = format!("semerr_guard{}", i);
                    alternatives.push(format!("(?P<{}>{})", name, bounded));
                    guard_names.push((name, guard.to_lowercase()));
                }
                None => {
                    let plain = format!("(?:{})", bounded);
                    unguarded.push(plain.clone());
                    alternatives.push(plain);
                }
            }
        }

        let regex = build_regex(&alternatives.join("|"))?;
        let fallback = if guard_names.is_empty() || unguarded.is_empty() {
            None
        } else {
            Some(build_regex(&unguarded.join("|"))?)
        };

        let guards = guard_names
            .into_iter()
            .map(|(name, guard)| {
                regex
                    .capture_names()
                    .position(|n| n == Some(name.as_str()))
                    .map(|idx| (idx, guard))
                    .ok_or_else(|| Error::catalog(format!("lost capture group {}", name)))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            regex,
            guards,
            fallback,
        })
    }

    /// Byte spans of all non-overlapping matches, leftmost first.
    ///
    /// A match produced by a guarded alternative whose guard directly precedes
    /// it is discarded in favour of an unguarded alternative at the same start,
    /// if any; otherwise scanning resumes one character after its start.
    pub fn find_spans(&self, text: &str) -> Vec<(usize, usize)> {
        if self.guards.is_empty() {
            return self
                .regex
                .find_iter(text)
                .map(|m| (m.start(), m.end()))
                .collect();
        }

        let mut spans = Vec::new();
        let mut locs = self.regex.capture_locations();
        let mut pos = 0;
        while pos <= text.len() {
            let Some(m) = self.regex.captures_read_at(&mut locs, text, pos) else {
                break;
            };
            let (start, end) = (m.start(), m.end());

            let blocked = self.guards.iter().any(|(group, guard)| {
                locs.get(*group).is_some() && preceded_by(text, start, guard)
            });

            let accepted = if blocked {
                self.fallback
                    .as_ref()
                    .and_then(|re| re.find_at(text, start))
                    .filter(|alt| alt.start() == start)
                    .map(|alt| (alt.start(), alt.end()))
            } else {
                Some((start, end))
            };

            pos = match accepted {
                Some((s, e)) => {
                    spans.push((s, e));
                    if e == s {
                        next_char_boundary(text, s)
                    } else {
                        e
                    }
                }
                None => next_char_boundary(text, start),
            };
        }
        spans
    }

    /// The combined regex source.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

fn build_regex(source: &str) -> Result<Regex> {
    Ok(RegexBuilder::new(source)
        .case_insensitive(true)
        .size_limit(REGEX_SIZE_LIMIT)
        .build()?)
}

/// Pad a pattern with `\b`, except on an anchored side.
fn with_word_boundaries(pattern: &str) -> String {
    let lead = if pattern.starts_with('^') { "" } else { r"\b" };
    let trail = if pattern.ends_with('$') { "" } else { r"\b" };
    format!("{}{}{}", lead, pattern, trail)
}

/// Case-insensitive check that `text[..at]` ends with `guard` (already lower-cased).
fn preceded_by(text: &str, at: usize, guard: &str) -> bool {
    let n = guard.chars().count();
    let before = &text[..at];
    let tail_start = before
        .char_indices()
        .rev()
        .nth(n.saturating_sub(1))
        .map(|(i, _)| i);
    match tail_start {
        Some(i) if n > 0 => before[i..].to_lowercase() == guard,
        _ => false,
    }
}

fn next_char_boundary(text: &str, at: usize) -> usize {
    text[at..]
        .chars()
        .next()
        .map(|c| at + c.len_utf8())
        .unwrap_or(text.len() + 1)
}

// =============================================================================
// Slots
// =============================================================================

/// Compiled matcher of one slot.
#[derive(Debug, Clone)]
pub enum SlotMatcher {
    /// One alternation over all literal values.
    Verbatim(CompiledPatterns),
    /// One alternation per canonical value, in declaration order.
    Categorical(Vec<ValuePatterns>),
}

/// Patterns of one categorical value.
#[derive(Debug, Clone)]
pub struct ValuePatterns {
    value: String,
    patterns: CompiledPatterns,
}

impl ValuePatterns {
    /// Canonical value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Compiled realizations.
    #[must_use]
    pub fn patterns(&self) -> &CompiledPatterns {
        &self.patterns
    }
}

/// A slot with its compiled matcher.
#[derive(Debug, Clone)]
pub struct SlotPatterns {
    name: String,
    matcher: SlotMatcher,
}

impl SlotPatterns {
    /// Slot name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Compiled matcher.
    #[must_use]
    pub fn matcher(&self) -> &SlotMatcher {
        &self.matcher
    }

    /// Verbatim or categorical.
    #[must_use]
    pub fn kind(&self) -> SlotKind {
        match self.matcher {
            SlotMatcher::Verbatim(_) => SlotKind::Verbatim,
            SlotMatcher::Categorical(_) => SlotKind::Categorical,
        }
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// Immutable, compiled slot vocabulary.
#[derive(Debug, Clone)]
pub struct PatternCatalog {
    slots: Vec<SlotPatterns>,
    /// slot → lower-cased value → canonical value
    canonical: HashMap<String, HashMap<String, String>>,
    output: OutputConfig,
}

impl PatternCatalog {
    /// The built-in E2E restaurant catalog, compiled on first use.
    #[must_use]
    pub fn e2e() -> &'static PatternCatalog {
        &E2E_CATALOG
    }

    /// Parse and compile a catalog from TOML source.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: CatalogConfig = toml::from_str(source)?;
        Self::from_config(config)
    }

    /// Read, parse and compile a catalog file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| Error::catalog(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&source)
            .map_err(|e| Error::catalog(format!("{}: {}", path.display(), e)))
    }

    /// Compile a catalog from its configuration.
    pub fn from_config(config: CatalogConfig) -> Result<Self> {
        let mut slots = Vec::with_capacity(config.slots.len());
        let mut canonical = HashMap::new();
        let mut seen = HashSet::new();

        for slot in config.slots {
            if !seen.insert(slot.name.clone()) {
                return Err(Error::catalog(format!("duplicate slot '{}'", slot.name)));
            }
            let (matcher, table) = compile_slot(&slot)?;
            canonical.insert(slot.name.clone(), table);
            slots.push(SlotPatterns {
                name: slot.name,
                matcher,
            });
        }

        log::debug!(
            "[catalog] compiled {} slots ({} canonical values)",
            slots.len(),
            canonical.values().map(HashMap::len).sum::<usize>()
        );

        Ok(Self {
            slots,
            canonical,
            output: config.output,
        })
    }

    /// Slots in scan order.
    #[must_use]
    pub fn slots(&self) -> &[SlotPatterns] {
        &self.slots
    }

    /// Look up one slot.
    #[must_use]
    pub fn slot(&self, name: &str) -> Option<&SlotPatterns> {
        self.slots.iter().find(|s| s.name == name)
    }

    /// MR serialization rules.
    #[must_use]
    pub fn output(&self) -> &OutputConfig {
        &self.output
    }

    /// Number of canonical values of a slot (0 for unknown slots).
    #[must_use]
    pub fn value_count(&self, slot: &str) -> usize {
        self.canonical.get(slot).map(HashMap::len).unwrap_or(0)
    }

    /// Canonical casing of `raw` under `slot` (case-insensitive lookup).
    #[must_use]
    pub fn canonical_value(&self, slot: &str, raw: &str) -> Option<&str> {
        self.canonical
            .get(slot)?
            .get(&raw.to_lowercase())
            .map(String::as_str)
    }

    /// Canonicalize a gold slot/value, failing on anything outside the vocabulary.
    pub fn canonicalize(&self, slot: &str, raw: &str) -> Result<&str> {
        self.canonical_value(slot, raw)
            .ok_or_else(|| Error::unknown_value(slot, raw))
    }

    /// Fold a parsed gold MR into a canonical slot → value → count multiset.
    ///
    /// Repeated items are counted, so `food[Italian], food[Italian]` yields a
    /// count of 2.
    pub fn gold_mr(&self, act: &DialogueAct) -> Result<MeaningRepresentation> {
        let mut mr = MeaningRepresentation::new();
        for item in act.items() {
            let value = self.canonicalize(&item.slot, &item.value)?;
            mr.add(item.slot.as_str(), value);
        }
        Ok(mr)
    }
}

fn compile_slot(slot: &SlotConfig) -> Result<(SlotMatcher, HashMap<String, String>)> {
    let context = |e: Error| Error::catalog(format!("slot '{}': {}", slot.name, e));
    let mut table = HashMap::new();

    match slot.kind {
        SlotKind::Verbatim => {
            if slot.values.is_empty() || !slot.categories.is_empty() {
                return Err(Error::catalog(format!(
                    "verbatim slot '{}' needs `values` and no `value` tables",
                    slot.name
                )));
            }
            for value in &slot.values {
                if table.insert(value.to_lowercase(), value.clone()).is_some() {
                    return Err(Error::catalog(format!(
                        "slot '{}': duplicate value '{}'",
                        slot.name, value
                    )));
                }
            }
            let literals: Vec<PatternSpec> = slot
                .values
                .iter()
                .map(|v| PatternSpec::Plain(regex::escape(v)))
                .collect();
            let patterns = CompiledPatterns::compile(&literals).map_err(context)?;
            Ok((SlotMatcher::Verbatim(patterns), table))
        }
        SlotKind::Categorical => {
            if slot.categories.is_empty() || !slot.values.is_empty() {
                return Err(Error::catalog(format!(
                    "categorical slot '{}' needs `value` tables and no `values`",
                    slot.name
                )));
            }
            let mut values = Vec::with_capacity(slot.categories.len());
            for category in &slot.categories {
                if table
                    .insert(category.value.to_lowercase(), category.value.clone())
                    .is_some()
                {
                    return Err(Error::catalog(format!(
                        "slot '{}': duplicate value '{}'",
                        slot.name, category.value
                    )));
                }
                let patterns = CompiledPatterns::compile(&category.patterns).map_err(|e| {
                    Error::catalog(format!(
                        "slot '{}' value '{}': {}",
                        slot.name, category.value, e
                    ))
                })?;
                values.push(ValuePatterns {
                    value: category.value.clone(),
                    patterns,
                });
            }
            Ok((SlotMatcher::Categorical(values), table))
        }
    }
}

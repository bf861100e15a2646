//! Semantic diff between a gold MR and the MR extracted from a text.
//!
//! Every slot present in either MR is classified:
//!
//! | Case | Charged as |
//! |------|------------|
//! | slot only in gold | `missing` += all gold occurrences |
//! | slot only in output | `added` += all output occurrences |
//! | value repeated beyond its gold count | `repeated` += excess (count clamped) |
//! | per-value residual, both directions | `valerr` += min, rest to `missing` / `added` |
//!
//! A [`FixMode`] can mask the missing or added category. Masked
//! discrepancies are not charged; instead the extracted MR is moved onto the
//! gold counts so that it can be written back out as a corrected MR.

use semerr_core::{MeaningRepresentation, ValueCounts};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::ops::{Add, AddAssign};

/// Which discrepancy categories are charged, and which are repaired.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FixMode {
    /// Charge everything; the extracted MR keeps every discrepancy.
    #[default]
    All,
    /// Missing information is not charged and is restored in the corrected MR.
    IgnoreMissing,
    /// Added information is not charged and is removed from the corrected MR.
    IgnoreAdded,
}

impl FixMode {
    /// True when missing information is charged.
    #[must_use]
    pub const fn charges_missing(self) -> bool {
        !matches!(self, FixMode::IgnoreMissing)
    }

    /// True when added information is charged.
    #[must_use]
    pub const fn charges_added(self) -> bool {
        !matches!(self, FixMode::IgnoreAdded)
    }
}

impl fmt::Display for FixMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FixMode::All => "all",
            FixMode::IgnoreMissing => "ignore-missing",
            FixMode::IgnoreAdded => "ignore-added",
        })
    }
}

/// The four error totals of one instance (or a sum of instances).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorCounts {
    /// Output realizes slots/values absent from the gold MR.
    pub added: usize,
    /// Gold slots/values the output does not realize.
    pub missing: usize,
    /// Substituted values.
    pub valerr: usize,
    /// Gold values realized more often than the gold MR lists them.
    pub repeated: usize,
}

impl ErrorCounts {
    /// Sum of all four totals.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.added + self.missing + self.valerr + self.repeated
    }

    /// True when nothing is charged.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.total() == 0
    }
}

impl Add for ErrorCounts {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            added: self.added + rhs.added,
            missing: self.missing + rhs.missing,
            valerr: self.valerr + rhs.valerr,
            repeated: self.repeated + rhs.repeated,
        }
    }
}

impl AddAssign for ErrorCounts {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl fmt::Display for ErrorCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "A: {}, M: {}, V: {}, R: {}",
            self.added, self.missing, self.valerr, self.repeated
        )
    }
}

/// Signed per-slot, per-value discrepancies.
///
/// Positive: the output has that many more occurrences than the gold MR.
/// Negative: the gold MR has that many more. Zero entries and empty slots are
/// never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotDiff(BTreeMap<String, BTreeMap<String, i64>>);

impl SlotDiff {
    /// An empty diff.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn insert_slot(&mut self, slot: &str, values: BTreeMap<String, i64>) {
        let values: BTreeMap<String, i64> = values.into_iter().filter(|(_, d)| *d != 0).collect();
        if !values.is_empty() {
            self.0.insert(slot.to_string(), values);
        }
    }

    /// Signed discrepancy of one value (0 when absent).
    #[must_use]
    pub fn get(&self, slot: &str, value: &str) -> i64 {
        self.0
            .get(slot)
            .and_then(|values| values.get(value))
            .copied()
            .unwrap_or(0)
    }

    /// Slots with a non-zero discrepancy.
    pub fn slots(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// True when no discrepancy is recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Compact JSON object, e.g. `{"area":{"riverside":-1}}`.
    #[must_use]
    pub fn to_json(&self) -> String {
        // string keys and integer values always serialize
        serde_json::to_string(&self.0).unwrap_or_else(|_| "{}".to_string())
    }
}

impl fmt::Display for SlotDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_json())
    }
}

/// Result of [`diff_mrs`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffOutcome {
    /// Error totals.
    pub counts: ErrorCounts,
    /// Signed discrepancies.
    pub diff: SlotDiff,
    /// Extracted MR after repeat clamping and fix-mode repair.
    pub corrected: MeaningRepresentation,
}

/// Compare a gold MR with an extracted MR.
///
/// ```rust
/// use semerr::diff::{diff_mrs, FixMode};
/// use semerr_core::MeaningRepresentation;
///
/// let gold = MeaningRepresentation::try_from_counts([("food", "Italian", 1), ("area", "riverside", 1)]).unwrap();
/// let out = MeaningRepresentation::try_from_counts([("food", "Italian", 1)]).unwrap();
///
/// let outcome = diff_mrs(&gold, &out, FixMode::All);
/// assert_eq!(outcome.counts.missing, 1);
/// assert_eq!(outcome.diff.to_json(), r#"{"area":{"riverside":-1}}"#);
/// ```
#[must_use]
pub fn diff_mrs(
    gold: &MeaningRepresentation,
    extracted: &MeaningRepresentation,
    mode: FixMode,
) -> DiffOutcome {
    let mut counts = ErrorCounts::default();
    let mut diff = SlotDiff::new();
    let mut corrected = extracted.clone();

    let slots: BTreeSet<&str> = gold.slot_names().chain(extracted.slot_names()).collect();

    for slot in slots {
        match (gold.slot(slot), extracted.slot(slot)) {
            (Some(gold_values), None) => {
                if mode.charges_missing() {
                    counts.missing += gold.slot_total(slot);
                    diff.insert_slot(slot, signed(gold_values, -1));
                } else {
                    corrected.insert_slot(slot, gold_values.clone());
                }
            }
            (None, Some(out_values)) => {
                if mode.charges_added() {
                    counts.added += extracted.slot_total(slot);
                    diff.insert_slot(slot, signed(out_values, 1));
                } else {
                    corrected.remove_slot(slot);
                }
            }
            (Some(gold_values), Some(out_values)) => {
                let mut out_values = out_values.clone();

                // clamp repeats
                for (value, out_count) in out_values.iter_mut() {
                    if let Some(&gold_count) = gold_values.get(value) {
                        if gold_count < *out_count {
                            counts.repeated += *out_count - gold_count;
                            *out_count = gold_count;
                        }
                    }
                }

                // residual: gold - output, over the union of values
                let values: BTreeSet<&String> = gold_values.keys().chain(out_values.keys()).collect();
                let mut residual: BTreeMap<String, i64> = BTreeMap::new();
                for value in values {
                    let g = gold_values.get(value).copied().unwrap_or(0) as i64;
                    let o = out_values.get(value).copied().unwrap_or(0) as i64;
                    residual.insert(value.clone(), g - o);
                }

                residual.retain(|value, d| {
                    let masked = (*d > 0 && !mode.charges_missing())
                        || (*d < 0 && !mode.charges_added());
                    if masked {
                        let gold_count = gold_values.get(value).copied().unwrap_or(0);
                        out_values.insert(value.clone(), gold_count);
                    }
                    !masked
                });

                let mr_not_out: i64 = residual.values().filter(|d| **d > 0).sum();
                let out_not_mr: i64 = -residual.values().filter(|d| **d < 0).sum::<i64>();

                counts.valerr += mr_not_out.min(out_not_mr) as usize;
                counts.missing += (mr_not_out - out_not_mr).max(0) as usize;
                counts.added += (out_not_mr - mr_not_out).max(0) as usize;

                diff.insert_slot(
                    slot,
                    residual.into_iter().map(|(v, d)| (v, -d)).collect(),
                );
                corrected.insert_slot(slot, out_values);
            }
            (None, None) => {}
        }
    }

    DiffOutcome {
        counts,
        diff,
        corrected,
    }
}

fn signed(values: &ValueCounts, sign: i64) -> BTreeMap<String, i64> {
    values
        .iter()
        .map(|(v, c)| (v.clone(), sign * *c as i64))
        .collect()
}

//! Meaning representations as slot → value → count multisets.
//!
//! Both the gold MR (from a parsed input string) and the extracted MR (from
//! the mentions found in a text) use this type, so that the diff can treat
//! them symmetrically.
//!
//! Invariants, enforced by every constructor and mutator:
//! - every stored count is at least 1 (a zero count removes the value)
//! - no slot maps to an empty value table (removing the last value removes the slot)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Occurrence counts per canonical value of one slot.
pub type ValueCounts = BTreeMap<String, usize>;

/// A meaning representation: slot name → canonical value → occurrence count.
///
/// # Example
///
/// ```
/// use semerr_core::MeaningRepresentation;
///
/// let mut mr = MeaningRepresentation::new();
/// mr.add("food", "Italian");
/// mr.add("rating", "high");
/// mr.add("rating", "high");
///
/// assert_eq!(mr.count("rating", "high"), 2);
/// assert_eq!(mr.total(), 3);
/// assert!(mr.contains_value("food", "Italian"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MeaningRepresentation {
    slots: BTreeMap<String, ValueCounts>,
}

impl MeaningRepresentation {
    /// Create an empty MR.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an MR from `(slot, value, count)` triples, summing duplicates.
    ///
    /// Fails on a zero count, which no occurrence multiset can contain.
    pub fn try_from_counts<I, S, V>(items: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, V, usize)>,
        S: Into<String>,
        V: Into<String>,
    {
        let mut mr = Self::new();
        for (slot, value, count) in items {
            let (slot, value) = (slot.into(), value.into());
            if count == 0 {
                return Err(Error::invalid_input(format!(
                    "zero count for {}[{}]",
                    slot, value
                )));
            }
            *mr.slots.entry(slot).or_default().entry(value).or_insert(0) += count;
        }
        Ok(mr)
    }

    /// Record one more occurrence of `value` under `slot`.
    pub fn add(&mut self, slot: impl Into<String>, value: impl Into<String>) {
        *self
            .slots
            .entry(slot.into())
            .or_default()
            .entry(value.into())
            .or_insert(0) += 1;
    }

    /// Set the count for `slot`/`value`; zero removes the value (and an emptied slot).
    pub fn set_count(&mut self, slot: &str, value: &str, count: usize) {
        if count == 0 {
            if let Some(values) = self.slots.get_mut(slot) {
                values.remove(value);
                if values.is_empty() {
                    self.slots.remove(slot);
                }
            }
        } else {
            self.slots
                .entry(slot.to_string())
                .or_default()
                .insert(value.to_string(), count);
        }
    }

    /// Occurrences of `value` under `slot` (0 when absent).
    #[must_use]
    pub fn count(&self, slot: &str, value: &str) -> usize {
        self.slots
            .get(slot)
            .and_then(|values| values.get(value))
            .copied()
            .unwrap_or(0)
    }

    /// True when `slot` records `value` at least once.
    #[must_use]
    pub fn contains_value(&self, slot: &str, value: &str) -> bool {
        self.count(slot, value) > 0
    }

    /// True when the slot has any value.
    #[must_use]
    pub fn contains_slot(&self, slot: &str) -> bool {
        self.slots.contains_key(slot)
    }

    /// Value counts of one slot.
    #[must_use]
    pub fn slot(&self, slot: &str) -> Option<&ValueCounts> {
        self.slots.get(slot)
    }

    /// Replace a slot's value table. Zero counts are dropped; an empty table removes the slot.
    pub fn insert_slot(&mut self, slot: impl Into<String>, values: ValueCounts) {
        let values: ValueCounts = values.into_iter().filter(|(_, c)| *c > 0).collect();
        let slot = slot.into();
        if values.is_empty() {
            self.slots.remove(&slot);
        } else {
            self.slots.insert(slot, values);
        }
    }

    /// Remove a slot, returning its value table.
    pub fn remove_slot(&mut self, slot: &str) -> Option<ValueCounts> {
        self.slots.remove(slot)
    }

    /// Slot names in sorted order.
    pub fn slot_names(&self) -> impl Iterator<Item = &str> {
        self.slots.keys().map(String::as_str)
    }

    /// All slots with their value tables.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ValueCounts)> {
        self.slots.iter().map(|(s, v)| (s.as_str(), v))
    }

    /// Flattened `(slot, value, count)` triples.
    pub fn items(&self) -> impl Iterator<Item = (&str, &str, usize)> {
        self.slots.iter().flat_map(|(slot, values)| {
            values
                .iter()
                .map(move |(value, count)| (slot.as_str(), value.as_str(), *count))
        })
    }

    /// Total occurrences of one slot.
    #[must_use]
    pub fn slot_total(&self, slot: &str) -> usize {
        self.slots
            .get(slot)
            .map(|values| values.values().sum())
            .unwrap_or(0)
    }

    /// Total occurrences across all slots.
    #[must_use]
    pub fn total(&self) -> usize {
        self.slots.values().flat_map(|v| v.values()).sum()
    }

    /// Number of distinct slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True when no slot is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

//! Located slot realizations.
//!
//! A [`Mention`] records that a slot value was found in a text, together with
//! the half-open character [`Span`] of the surface string that realized it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Half-open character span `[start, end)` into a text.
///
/// Offsets are character offsets, not bytes, so they line up with what a
/// reader counts in the text regardless of non-ASCII content such as `£` or `é`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Span {
    /// Start offset (inclusive)
    pub start: usize,
    /// End offset (exclusive)
    pub end: usize,
}

impl Span {
    /// Create a span. `start` must not exceed `end`.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of characters covered.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// True when the span covers no characters.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// True when `self` lies inside `other` and differs from it in at least one endpoint.
    ///
    /// ```
    /// use semerr_core::Span;
    ///
    /// let phrase = Span::new(10, 21);
    /// assert!(Span::new(15, 21).is_strict_sub_span_of(&phrase));
    /// assert!(!phrase.is_strict_sub_span_of(&phrase));
    /// ```
    #[must_use]
    pub const fn is_strict_sub_span_of(&self, other: &Span) -> bool {
        (self.start > other.start && self.end <= other.end)
            || (self.start >= other.start && self.end < other.end)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{})", self.start, self.end)
    }
}

/// An occurrence of a `(slot, value)` pair in a text.
///
/// `value` is always the canonical value string (the catalog's casing), while
/// `text` keeps the surface form exactly as it appeared.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Mention {
    /// Slot name, e.g. `"food"`
    pub slot: String,
    /// Canonical value, e.g. `"Italian"`
    pub value: String,
    /// Character span of the realization
    pub span: Span,
    /// Surface text of the realization
    pub text: String,
}

impl Mention {
    /// Create a mention.
    #[must_use]
    pub fn new(
        slot: impl Into<String>,
        value: impl Into<String>,
        span: Span,
        text: impl Into<String>,
    ) -> Self {
        Self {
            slot: slot.into(),
            value: value.into(),
            span,
            text: text.into(),
        }
    }

    /// True when both mentions cover exactly the same characters, whatever their slot.
    #[must_use]
    pub fn is_same_string(&self, other: &Mention) -> bool {
        self.span == other.span
    }

    /// True when this mention is strictly contained in `other`.
    #[must_use]
    pub fn is_substring_of(&self, other: &Mention) -> bool {
        self.span.is_strict_sub_span_of(&other.span)
    }
}

impl fmt::Display for Mention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}{} \"{}\"", self.slot, self.value, self.span, self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_sub_span_requires_a_differing_endpoint() {
        let outer = Span::new(3, 14);
        assert!(Span::new(3, 10).is_strict_sub_span_of(&outer));
        assert!(Span::new(8, 14).is_strict_sub_span_of(&outer));
        assert!(Span::new(5, 9).is_strict_sub_span_of(&outer));
        assert!(!Span::new(3, 14).is_strict_sub_span_of(&outer));
    }

    #[test]
    fn partial_overlap_is_not_containment() {
        let a = Span::new(0, 6);
        let b = Span::new(4, 10);
        assert!(!a.is_strict_sub_span_of(&b));
        assert!(!b.is_strict_sub_span_of(&a));
    }

    #[test]
    fn same_string_ignores_slot_and_value() {
        let name = Mention::new("name", "The Rice Boat", Span::new(0, 13), "The Rice Boat");
        let near = Mention::new("near", "The Rice Boat", Span::new(0, 13), "The Rice Boat");
        assert!(name.is_same_string(&near));
        assert_ne!(name, near);
    }

    #[test]
    fn display_is_compact() {
        let m = Mention::new("food", "Italian", Span::new(8, 15), "italian");
        assert_eq!(m.to_string(), "food=Italian[8,15) \"italian\"");
    }

    #[test]
    fn span_len_and_empty() {
        assert_eq!(Span::new(2, 7).len(), 5);
        assert!(Span::new(4, 4).is_empty());
        assert!(!Span::new(4, 5).is_empty());
    }
}

//! Overlap resolution for raw mentions.
//!
//! A raw mention `M` is dropped when some other mention `N` of the list
//!
//! 1. strictly contains it (the longer realization wins), or
//! 2. covers exactly the same span and either carries a value the gold MR
//!    lists under `N`'s slot, or has already been retained.
//!
//! Mentions are visited in matcher emission order, so when neither of two
//! same-span mentions is supported by the gold MR, the one emitted first
//! survives. Same-span pairs are compared across slots as well.

use semerr_core::{MeaningRepresentation, Mention};

/// Filter raw mentions down to one interpretation per span.
///
/// # Example
///
/// ```rust
/// use semerr::disambiguate::resolve_mentions;
/// use semerr_core::{MeaningRepresentation, Mention, Span};
///
/// let raw = vec![
///     Mention::new("price_range", "cheap", Span::new(6, 11), "cheap"),
///     Mention::new("price_range", "less than £20", Span::new(6, 11), "cheap"),
/// ];
/// let gold = MeaningRepresentation::try_from_counts([("price_range", "less than £20", 1)]).unwrap();
///
/// let kept = resolve_mentions(&raw, &gold);
/// assert_eq!(kept.len(), 1);
/// assert_eq!(kept[0].value, "less than £20");
/// ```
#[must_use]
pub fn resolve_mentions(raw: &[Mention], gold: &MeaningRepresentation) -> Vec<Mention> {
    let mut kept: Vec<Mention> = Vec::with_capacity(raw.len());

    for (i, mention) in raw.iter().enumerate() {
        let skip = raw.iter().enumerate().any(|(j, other)| {
            i != j
                && (mention.is_substring_of(other)
                    || (mention.is_same_string(other)
                        && (gold.contains_value(&other.slot, &other.value)
                            || kept.contains(other))))
        });

        if skip {
            log::trace!("[disambiguate] dropped {}", mention);
        } else {
            kept.push(mention.clone());
        }
    }

    kept
}

/// Fold retained mentions into the extracted MR, one occurrence per mention.
#[must_use]
pub fn extracted_mr(mentions: &[Mention]) -> MeaningRepresentation {
    let mut mr = MeaningRepresentation::new();
    for mention in mentions {
        mr.add(mention.slot.as_str(), mention.value.as_str());
    }
    mr
}

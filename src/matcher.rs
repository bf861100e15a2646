//! Mention scanner.
//!
//! Runs every compiled pattern of a [`PatternCatalog`] over a text and reports
//! all raw candidate mentions. Overlapping and conflicting mentions are kept;
//! resolving them is the job of [`crate::disambiguate`].
//!
//! Emission order is part of the contract: slots in catalog order, then
//! values in catalog order, then matches left to right.

use crate::catalog::{PatternCatalog, SlotMatcher};
use semerr_core::{Mention, Span, SpanConverter};

/// Scans texts for slot realizations.
///
/// # Example
///
/// ```rust
/// use semerr::{Matcher, PatternCatalog};
///
/// let matcher = Matcher::new(PatternCatalog::e2e());
/// let mentions = matcher.find_mentions("Zizzi is a pub by the river.");
///
/// let found: Vec<_> = mentions.iter().map(|m| (m.slot.as_str(), m.value.as_str())).collect();
/// assert_eq!(found, [("area", "riverside"), ("eat_type", "pub"), ("name", "Zizzi")]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Matcher<'c> {
    catalog: &'c PatternCatalog,
}

impl<'c> Matcher<'c> {
    /// Create a matcher over a compiled catalog.
    #[must_use]
    pub fn new(catalog: &'c PatternCatalog) -> Self {
        Self { catalog }
    }

    /// The catalog in use.
    #[must_use]
    pub fn catalog(&self) -> &'c PatternCatalog {
        self.catalog
    }

    /// All raw mentions in `text`, in stable emission order.
    ///
    /// Spans are character offsets.
    #[must_use]
    pub fn find_mentions(&self, text: &str) -> Vec<Mention> {
        let conv = SpanConverter::new(text);
        let mut mentions = Vec::new();

        for slot in self.catalog.slots() {
            match slot.matcher() {
                SlotMatcher::Verbatim(patterns) => {
                    for (start, end) in patterns.find_spans(text) {
                        let surface = &text[start..end];
                        match self.catalog.canonical_value(slot.name(), surface) {
                            Some(value) => mentions.push(Mention::new(
                                slot.name(),
                                value,
                                span(&conv, start, end),
                                surface,
                            )),
                            None => log::debug!(
                                "[matcher] no canonical form for {}='{}', skipped",
                                slot.name(),
                                surface
                            ),
                        }
                    }
                }
                SlotMatcher::Categorical(values) => {
                    for value in values {
                        for (start, end) in value.patterns().find_spans(text) {
                            mentions.push(Mention::new(
                                slot.name(),
                                value.value(),
                                span(&conv, start, end),
                                &text[start..end],
                            ));
                        }
                    }
                }
            }
        }

        log::trace!("[matcher] {} raw mentions", mentions.len());
        mentions
    }
}

fn span(conv: &SpanConverter, start: usize, end: usize) -> Span {
    Span::new(conv.byte_to_char(start), conv.byte_to_char(end))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find(text: &str) -> Vec<Mention> {
        Matcher::new(PatternCatalog::e2e()).find_mentions(text)
    }

    fn pairs(mentions: &[Mention]) -> Vec<(String, String)> {
        mentions
            .iter()
            .map(|m| (m.slot.clone(), m.value.clone()))
            .collect()
    }

    #[test]
    fn empty_text_has_no_mentions() {
        assert!(find("").is_empty());
    }

    #[test]
    fn verbatim_match_reports_canonical_casing() {
        let mentions = find("you should visit THE EAGLE soon");
        assert_eq!(mentions.len(), 1);
        assert_eq!(mentions[0].slot, "name");
        assert_eq!(mentions[0].value, "The Eagle");
        assert_eq!(mentions[0].text, "THE EAGLE");
        assert_eq!(mentions[0].span, Span::new(17, 26));
    }

    #[test]
    fn categorical_values_share_a_span() {
        // "cheap" is a realization of both `cheap` and `less than £20`
        let mentions = find("It is cheap.");
        assert_eq!(
            pairs(&mentions),
            vec![
                ("price_range".to_string(), "cheap".to_string()),
                ("price_range".to_string(), "less than £20".to_string()),
            ]
        );
        assert!(mentions[0].is_same_string(&mentions[1]));
    }

    #[test]
    fn emission_order_is_slot_then_value_then_position() {
        let mentions = find("A pub and a restaurant and a pub.");
        assert_eq!(
            mentions.iter().map(|m| (m.value.as_str(), m.span.start)).collect::<Vec<_>>(),
            vec![("pub", 2), ("pub", 29), ("restaurant", 12)]
        );
    }

    #[test]
    fn spans_are_character_offsets() {
        let text = "Prices are under £20 near Café Rouge.";
        let mentions = find(text);
        let near = mentions.iter().find(|m| m.slot == "near").unwrap();
        assert_eq!(near.value, "Café Rouge");
        let chars: Vec<char> = text.chars().collect();
        let surface: String = chars[near.span.start..near.span.end].iter().collect();
        assert_eq!(surface, "Café Rouge");

        let price = mentions
            .iter()
            .find(|m| m.value == "less than £20" && m.text.starts_with("under"))
            .unwrap();
        assert_eq!(price.text, "under £20");
    }

    #[test]
    fn very_good_is_not_average() {
        let mentions = find("It has a very good rating.");
        let values: Vec<_> = mentions.iter().map(|m| m.value.as_str()).collect();
        assert!(values.contains(&"high"));
        assert!(values.contains(&"5 out of 5"));
        assert!(!values.contains(&"average"));
        assert!(!values.contains(&"3 out of 5"));
    }

    #[test]
    fn plain_good_rating_is_average() {
        let mentions = find("It has a good rating.");
        let values: Vec<_> = mentions.iter().map(|m| m.value.as_str()).collect();
        assert!(values.contains(&"average"));
        assert!(values.contains(&"3 out of 5"));
    }

    #[test]
    fn substring_candidates_are_all_reported() {
        // both "coffee shop" and "coffee" realizations fire at different lengths
        let mentions = find("a coffee shop");
        let coffee: Vec<_> = mentions
            .iter()
            .filter(|m| m.value == "coffee shop")
            .map(|m| m.text.as_str())
            .collect();
        assert_eq!(coffee, vec!["coffee shop"]);
    }
}

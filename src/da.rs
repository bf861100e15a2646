//! Dialogue acts: the serialized MR formats and their parsed form.
//!
//! Two input grammars are supported:
//!
//! - **E2E bracket format**: `name[The Eagle], eatType[coffee shop], customer rating[high]`
//! - **TGen format**: `inform(name=The Eagle,eat_type="coffee shop")&inform(rating=high)`
//!
//! Both parse into a [`DialogueAct`], an ordered list of items in which
//! repeated slot/value pairs are kept. Slot names are normalized to
//! snake_case on the way in (`eatType` → `eat_type`, `customer rating` →
//! `rating`), and [`serialize_mr`] reverses that on the way out.

use crate::catalog::OutputConfig;
use crate::{Error, Result};
use semerr_core::MeaningRepresentation;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Act type assigned to items of bracket-format MRs.
pub const INFORM: &str = "inform";

/// One dialogue-act item: `act(slot=value)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActItem {
    /// Dialogue act type (`inform` for E2E data).
    pub act: String,
    /// Normalized slot name.
    pub slot: String,
    /// Value as written.
    pub value: String,
}

impl ActItem {
    /// An `inform` item.
    pub fn inform(slot: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            act: INFORM.to_string(),
            slot: slot.into(),
            value: value.into(),
        }
    }
}

/// A parsed MR: ordered act items, duplicates kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DialogueAct {
    items: Vec<ActItem>,
}

impl DialogueAct {
    /// An empty act.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from items.
    #[must_use]
    pub fn from_items(items: Vec<ActItem>) -> Self {
        Self { items }
    }

    /// Append one item.
    pub fn push(&mut self, item: ActItem) {
        self.items.push(item);
    }

    /// Items in input order.
    #[must_use]
    pub fn items(&self) -> &[ActItem] {
        &self.items
    }

    /// Number of items (the gold slot count of an instance).
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when the act has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Copy with the values of `slots` replaced by `X-<slot>` placeholders.
    ///
    /// ```
    /// use semerr::da::parse_mr;
    ///
    /// let act = parse_mr("name[Aromi], near[Avalon], food[French]").unwrap();
    /// let delex = act.delexicalized(&["name", "near"]);
    /// assert_eq!(delex.to_string(), "name[X-name], near[X-near], food[French]");
    /// ```
    #[must_use]
    pub fn delexicalized(&self, slots: &[&str]) -> Self {
        let items = self
            .items
            .iter()
            .map(|item| {
                if slots.contains(&item.slot.as_str()) {
                    ActItem {
                        value: format!("X-{}", item.slot),
                        ..item.clone()
                    }
                } else {
                    item.clone()
                }
            })
            .collect();
        Self { items }
    }

    /// Fold the items, values as written, into a slot → value → count multiset.
    #[must_use]
    pub fn to_counts(&self) -> MeaningRepresentation {
        let mut mr = MeaningRepresentation::new();
        for item in &self.items {
            mr.add(item.slot.as_str(), item.value.as_str());
        }
        mr
    }
}

impl fmt::Display for DialogueAct {
    /// Bracket format with internal (snake_case) slot names.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}[{}]", item.slot, item.value)?;
        }
        Ok(())
    }
}

/// Normalize a slot name: spaces → `_`, camelCase → snake_case,
/// `customer_rating` → `rating`.
#[must_use]
pub fn normalize_slot(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 4);
    for c in raw.trim().chars() {
        if c.is_whitespace() {
            out.push('_');
        } else if c.is_uppercase() {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    if out == "customer_rating" {
        "rating".to_string()
    } else {
        out
    }
}

/// Parse an E2E bracket-format MR.
///
/// ```
/// use semerr::da::parse_mr;
///
/// let act = parse_mr("name[The Eagle], eatType[coffee shop], customer rating[high]").unwrap();
/// let slots: Vec<_> = act.items().iter().map(|i| i.slot.as_str()).collect();
/// assert_eq!(slots, ["name", "eat_type", "rating"]);
/// ```
pub fn parse_mr(raw: &str) -> Result<DialogueAct> {
    let mut act = DialogueAct::new();
    let mut rest = raw.trim();

    while !rest.is_empty() {
        let open = rest
            .find('[')
            .ok_or_else(|| Error::parse(format!("expected '[' in MR item '{}'", rest)))?;
        let close = rest[open..]
            .find(']')
            .map(|i| open + i)
            .ok_or_else(|| Error::parse(format!("unclosed '[' in MR '{}'", raw)))?;

        let slot = rest[..open].trim();
        if slot.is_empty() {
            return Err(Error::parse(format!("empty slot name in MR '{}'", raw)));
        }
        let value = rest[open + 1..close].trim();
        act.push(ActItem::inform(normalize_slot(slot), value));

        rest = rest[close + 1..].trim_start();
        if let Some(after) = rest.strip_prefix(',') {
            rest = after.trim_start();
        } else if !rest.is_empty() {
            return Err(Error::parse(format!(
                "expected ',' between MR items, found '{}'",
                rest
            )));
        }
    }

    Ok(act)
}

/// Parse a TGen-format MR (`act(slot=value,...)&act(...)`).
///
/// Values may be double-quoted, in which case they may contain `,` and `)`.
///
/// ```
/// use semerr::da::parse_tgen;
///
/// let act = parse_tgen(r#"inform(name="Loch Fyne",food=French)&inform(area=riverside)"#).unwrap();
/// assert_eq!(act.len(), 3);
/// assert_eq!(act.items()[0].value, "Loch Fyne");
/// ```
pub fn parse_tgen(raw: &str) -> Result<DialogueAct> {
    let mut act = DialogueAct::new();
    let chars: Vec<char> = raw.trim().chars().collect();
    let mut i = 0;

    while i < chars.len() {
        // act type
        let start = i;
        while i < chars.len() && chars[i] != '(' {
            i += 1;
        }
        if i == chars.len() {
            return Err(Error::parse(format!("expected '(' in TGen MR '{}'", raw)));
        }
        let act_type: String = chars[start..i].iter().collect::<String>().trim().to_string();
        if act_type.is_empty() {
            return Err(Error::parse(format!("empty act type in TGen MR '{}'", raw)));
        }
        i += 1;

        // slot=value pairs
        loop {
            while i < chars.len() && (chars[i] == ',' || chars[i] == ' ') {
                i += 1;
            }
            match chars.get(i) {
                None => return Err(Error::parse(format!("unclosed '(' in TGen MR '{}'", raw))),
                Some(')') => {
                    i += 1;
                    break;
                }
                Some(_) => {}
            }

            let slot_start = i;
            while i < chars.len() && !matches!(chars[i], '=' | ',' | ')') {
                i += 1;
            }
            let slot: String = chars[slot_start..i].iter().collect();
            let mut value = String::new();

            if chars.get(i) == Some(&'=') {
                i += 1;
                if chars.get(i) == Some(&'"') {
                    i += 1;
                    while i < chars.len() && chars[i] != '"' {
                        value.push(chars[i]);
                        i += 1;
                    }
                    if i == chars.len() {
                        return Err(Error::parse(format!("unclosed quote in TGen MR '{}'", raw)));
                    }
                    i += 1;
                } else {
                    while i < chars.len() && !matches!(chars[i], ',' | ')') {
                        value.push(chars[i]);
                        i += 1;
                    }
                }
            }

            act.push(ActItem {
                act: act_type.clone(),
                slot: normalize_slot(&slot),
                value: value.trim().to_string(),
            });
        }

        // separator
        while i < chars.len() && chars[i] == ' ' {
            i += 1;
        }
        if i < chars.len() {
            if chars[i] != '&' {
                return Err(Error::parse(format!(
                    "expected '&' between acts in TGen MR '{}'",
                    raw
                )));
            }
            i += 1;
        }
    }

    Ok(act)
}

/// Render an MR in the bracket format, one item per counted occurrence.
///
/// Slots follow `output.slot_order` (unlisted slots last, alphabetically);
/// values within a slot are sorted. Only slot names are renamed.
///
/// ```
/// use semerr::catalog::PatternCatalog;
/// use semerr::da::serialize_mr;
/// use semerr_core::MeaningRepresentation;
///
/// let mr = MeaningRepresentation::try_from_counts([
///     ("rating", "high", 1),
///     ("price_range", "cheap", 1),
///     ("name", "Zizzi", 1),
/// ]).unwrap();
/// let out = serialize_mr(&mr, PatternCatalog::e2e().output());
/// assert_eq!(out, "name[Zizzi], priceRange[cheap], customer rating[high]");
/// ```
#[must_use]
pub fn serialize_mr(mr: &MeaningRepresentation, output: &OutputConfig) -> String {
    let mut slots: Vec<_> = mr.iter().collect();
    slots.sort_by(|(a, _), (b, _)| {
        output
            .slot_rank(a)
            .cmp(&output.slot_rank(b))
            .then_with(|| a.cmp(b))
    });

    let mut parts = Vec::with_capacity(mr.total());
    for (slot, values) in slots {
        let display = output.display_slot(slot);
        for (value, count) in values {
            for _ in 0..*count {
                parts.push(format!("{}[{}]", display, value));
            }
        }
    }
    parts.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PatternCatalog;

    #[test]
    fn slot_names_are_normalized() {
        assert_eq!(normalize_slot("eatType"), "eat_type");
        assert_eq!(normalize_slot("priceRange"), "price_range");
        assert_eq!(normalize_slot("familyFriendly"), "family_friendly");
        assert_eq!(normalize_slot("customer rating"), "rating");
        assert_eq!(normalize_slot("customerRating"), "rating");
        assert_eq!(normalize_slot(" area "), "area");
    }

    #[test]
    fn parse_bracket_format() {
        let act = parse_mr("name[Blue Spice], priceRange[less than £20], area[riverside]").unwrap();
        assert_eq!(
            act.items(),
            &[
                ActItem::inform("name", "Blue Spice"),
                ActItem::inform("price_range", "less than £20"),
                ActItem::inform("area", "riverside"),
            ]
        );
    }

    #[test]
    fn parse_keeps_repeated_items() {
        let act = parse_mr("food[Italian], food[Italian]").unwrap();
        assert_eq!(act.len(), 2);
        assert_eq!(act.to_counts().count("food", "Italian"), 2);
    }

    #[test]
    fn parse_empty_mr() {
        assert!(parse_mr("").unwrap().is_empty());
        assert!(parse_mr("   ").unwrap().is_empty());
    }

    #[test]
    fn parse_tolerates_missing_space_after_comma() {
        let act = parse_mr("name[Aromi],food[French]").unwrap();
        assert_eq!(act.len(), 2);
    }

    #[test]
    fn parse_rejects_malformed() {
        assert!(matches!(parse_mr("name[Aromi"), Err(Error::Parse(_))));
        assert!(matches!(parse_mr("name Aromi"), Err(Error::Parse(_))));
        assert!(matches!(parse_mr("[Aromi]"), Err(Error::Parse(_))));
        assert!(matches!(parse_mr("name[Aromi] food[French]"), Err(Error::Parse(_))));
    }

    #[test]
    fn parse_tgen_format() {
        let act =
            parse_tgen("inform(name=Aromi,eat_type=coffee shop)&inform(customer rating=low)").unwrap();
        assert_eq!(
            act.items(),
            &[
                ActItem::inform("name", "Aromi"),
                ActItem::inform("eat_type", "coffee shop"),
                ActItem::inform("rating", "low"),
            ]
        );
    }

    #[test]
    fn parse_tgen_quoted_values_and_other_acts() {
        let act = parse_tgen(r#"inform(price_range="£20-25")&confirm(near="A, B")"#).unwrap();
        assert_eq!(act.items()[0].value, "£20-25");
        assert_eq!(act.items()[1].act, "confirm");
        assert_eq!(act.items()[1].value, "A, B");
    }

    #[test]
    fn parse_tgen_rejects_malformed() {
        assert!(parse_tgen("inform(name=Aromi").is_err());
        assert!(parse_tgen("inform(name=\"Aromi)").is_err());
        assert!(parse_tgen("inform(name=Aromi) inform(food=French)").is_err());
        assert!(parse_tgen("(name=Aromi)").is_err());
    }

    #[test]
    fn serialize_orders_and_renames() {
        let mr = MeaningRepresentation::try_from_counts([
            ("near", "Avalon", 1),
            ("family_friendly", "yes", 1),
            ("eat_type", "pub", 1),
            ("name", "Cotto", 1),
        ])
        .unwrap();
        assert_eq!(
            serialize_mr(&mr, PatternCatalog::e2e().output()),
            "name[Cotto], eatType[pub], familyFriendly[yes], near[Avalon]"
        );
    }

    #[test]
    fn serialize_repeats_counts_and_puts_unknown_slots_last() {
        let mr = MeaningRepresentation::try_from_counts([
            ("decor", "nice", 1),
            ("area", "riverside", 2),
        ])
        .unwrap();
        assert_eq!(
            serialize_mr(&mr, PatternCatalog::e2e().output()),
            "area[riverside], area[riverside], decor[nice]"
        );
    }

    #[test]
    fn bracket_round_trip_through_counts() {
        let raw = "name[The Eagle], eatType[coffee shop], customer rating[high], area[riverside]";
        let act = parse_mr(raw).unwrap();
        assert_eq!(serialize_mr(&act.to_counts(), PatternCatalog::e2e().output()), raw);
    }

    #[test]
    fn delexicalize_leaves_other_slots() {
        let act = parse_mr("name[Aromi], food[French]").unwrap();
        let delex = act.delexicalized(&["near"]);
        assert_eq!(delex, act);
    }
}

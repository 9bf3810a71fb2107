//! Card table rows.
//!
//! The card table is hand-entered and follows two conventions:
//!
//! - upper-case names are productions, lower-case names are resources
//! - nouns are singular (`plant`, never `plants`)
//!
//! Every column except `Title`, `Primary_Cost` and `Tags` holds an
//! expression in the card mini-language, or nothing.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Tag;

/// Column of the card table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CardField {
    Title,
    PrimaryCost,
    AdditionalCost,
    VictoryPoints,
    ImmediateBenefit,
    PassiveBenefit,
    ActiveCost,
    ActiveBenefit,
    RemovedFromOpponent,
    Tags,
    /// Not a column: the value supplied by a special-case override.
    Override,
}

impl CardField {
    #[must_use]
    pub const fn column_name(self) -> &'static str {
        match self {
            CardField::Title => "Title",
            CardField::PrimaryCost => "Primary_Cost",
            CardField::AdditionalCost => "Additional_Cost",
            CardField::VictoryPoints => "Victory_Points",
            CardField::ImmediateBenefit => "Immediate_Benefit",
            CardField::PassiveBenefit => "Passive_Benefit",
            CardField::ActiveCost => "Active_Cost",
            CardField::ActiveBenefit => "Active_Benefit",
            CardField::RemovedFromOpponent => "Removed_from_Opponent",
            CardField::Tags => "Tags",
            CardField::Override => "override",
        }
    }
}

impl fmt::Display for CardField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.column_name(), f)
    }
}

/// One card (project) as loaded from the card table.
///
/// Records are read-only; valuation produces separate result rows.
///
/// # Example
///
/// ```
/// use tmvalue_engine::{CardField, CardRecord};
///
/// let card = CardRecord::new("Mine", 4).with(CardField::ImmediateBenefit, "1 STEEL");
/// assert_eq!(card.text(CardField::ImmediateBenefit), Some("1 STEEL"));
/// assert_eq!(card.text(CardField::ActiveBenefit), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRecord {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Primary_Cost")]
    pub primary_cost: u32,
    #[serde(rename = "Additional_Cost", default)]
    pub additional_cost: Option<String>,
    #[serde(rename = "Victory_Points", default)]
    pub victory_points: Option<String>,
    #[serde(rename = "Immediate_Benefit", default)]
    pub immediate_benefit: Option<String>,
    #[serde(rename = "Passive_Benefit", default)]
    pub passive_benefit: Option<String>,
    #[serde(rename = "Active_Cost", default)]
    pub active_cost: Option<String>,
    #[serde(rename = "Active_Benefit", default)]
    pub active_benefit: Option<String>,
    #[serde(rename = "Removed_from_Opponent", default)]
    pub removed_from_opponent: Option<String>,
    #[serde(rename = "Tags", default)]
    pub tags: Option<String>,
}

impl CardRecord {
    /// Creates a card with only a title and a primary cost.
    #[must_use]
    pub fn new(title: impl Into<String>, primary_cost: u32) -> Self {
        Self {
            title: title.into(),
            primary_cost,
            additional_cost: None,
            victory_points: None,
            immediate_benefit: None,
            passive_benefit: None,
            active_cost: None,
            active_benefit: None,
            removed_from_opponent: None,
            tags: None,
        }
    }

    /// Sets a text column. Setting `Title`, `PrimaryCost` or `Override` has no effect.
    #[must_use]
    pub fn with(mut self, field: CardField, text: impl Into<String>) -> Self {
        if let Some(slot) = self.slot_mut(field) {
            *slot = Some(text.into());
        }
        self
    }

    fn slot(&self, field: CardField) -> Option<&Option<String>> {
        let slot = match field {
            CardField::AdditionalCost => &self.additional_cost,
            CardField::VictoryPoints => &self.victory_points,
            CardField::ImmediateBenefit => &self.immediate_benefit,
            CardField::PassiveBenefit => &self.passive_benefit,
            CardField::ActiveCost => &self.active_cost,
            CardField::ActiveBenefit => &self.active_benefit,
            CardField::RemovedFromOpponent => &self.removed_from_opponent,
            CardField::Tags => &self.tags,
            CardField::Title | CardField::PrimaryCost | CardField::Override => return None,
        };
        Some(slot)
    }

    fn slot_mut(&mut self, field: CardField) -> Option<&mut Option<String>> {
        let slot = match field {
            CardField::AdditionalCost => &mut self.additional_cost,
            CardField::VictoryPoints => &mut self.victory_points,
            CardField::ImmediateBenefit => &mut self.immediate_benefit,
            CardField::PassiveBenefit => &mut self.passive_benefit,
            CardField::ActiveCost => &mut self.active_cost,
            CardField::ActiveBenefit => &mut self.active_benefit,
            CardField::RemovedFromOpponent => &mut self.removed_from_opponent,
            CardField::Tags => &mut self.tags,
            CardField::Title | CardField::PrimaryCost | CardField::Override => return None,
        };
        Some(slot)
    }

    /// Returns the trimmed text of a column, `None` when it is null or blank.
    #[must_use]
    pub fn text(&self, field: CardField) -> Option<&str> {
        self.slot(field)?
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }

    /// Iterates over the tag names of the card.
    pub fn tag_names(&self) -> impl Iterator<Item = &str> {
        self.tags
            .as_deref()
            .unwrap_or_default()
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|name| !name.is_empty())
    }

    /// Returns `true` if the card bears `tag`.
    #[must_use]
    pub fn has_tag(&self, tag: Tag) -> bool {
        self.tag_names().any(|name| name == tag.name())
    }
}

//! Card tags and how often they occur.
//!
//! Effects such as "1 CREDIT per jovian tag" depend on how many tagged cards
//! are in play. Without a game state, the engine estimates that count from
//! the fraction of the card pool bearing each tag.

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

/// Category label printed on a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tag {
    Earth,
    Science,
    Plant,
    Microbe,
    Animal,
    Space,
    Event,
    Building,
    Jovian,
    Power,
    City,
}

impl Tag {
    pub const ALL: [Tag; 11] = [
        Tag::Earth,
        Tag::Science,
        Tag::Plant,
        Tag::Microbe,
        Tag::Animal,
        Tag::Space,
        Tag::Event,
        Tag::Building,
        Tag::Jovian,
        Tag::Power,
        Tag::City,
    ];

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tag| tag.name() == name)
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Tag::Earth => "earth",
            Tag::Science => "science",
            Tag::Plant => "plant",
            Tag::Microbe => "microbe",
            Tag::Animal => "animal",
            Tag::Space => "space",
            Tag::Event => "event",
            Tag::Building => "building",
            Tag::Jovian => "jovian",
            Tag::Power => "power",
            Tag::City => "city",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.name(), f)
    }
}

/// Probability that a card bears a tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TagFrequency {
    /// Fraction of all cards bearing the tag.
    pub played: f64,
    /// Fraction of all cards bearing the tag that stay visible after being
    /// played, i.e. excluding events.
    pub showing: f64,
}

/// Tag frequencies of a card pool.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagStatistics {
    frequencies: BTreeMap<Tag, TagFrequency>,
}

impl FromIterator<(Tag, TagFrequency)> for TagStatistics {
    fn from_iter<T: IntoIterator<Item = (Tag, TagFrequency)>>(iter: T) -> Self {
        Self {
            frequencies: iter.into_iter().collect(),
        }
    }
}

impl TagStatistics {
    /// Returns the frequency of `tag`, zero when the pool has no such card.
    #[must_use]
    pub fn frequency(&self, tag: Tag) -> TagFrequency {
        self.frequencies.get(&tag).copied().unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Tag, TagFrequency)> + '_ {
        self.frequencies.iter().map(|(&tag, &freq)| (tag, freq))
    }
}

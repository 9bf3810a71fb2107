//! Tag frequencies of a card table.

use std::collections::BTreeSet;

use tmvalue_engine::{CardRecord, Tag, TagFrequency, TagStatistics};

/// Computes how often each tag occurs in `cards`.
///
/// `played` counts every card bearing the tag. `showing` leaves out events,
/// which are discarded once played and so never count towards tags in play.
///
/// # Example
///
/// ```
/// use tmvalue_analysis::tag_stats::tag_statistics;
/// use tmvalue_engine::{CardField, CardRecord, Tag};
///
/// let cards = [
///     CardRecord::new("Io Mining", 41).with(CardField::Tags, "jovian space"),
///     CardRecord::new("Callisto", 24).with(CardField::Tags, "jovian space event"),
///     CardRecord::new("Mine", 4).with(CardField::Tags, "building"),
///     CardRecord::new("Lichen", 7).with(CardField::Tags, "plant"),
/// ];
/// let stats = tag_statistics(&cards);
/// assert_eq!(stats.frequency(Tag::Jovian).played, 0.5);
/// assert_eq!(stats.frequency(Tag::Jovian).showing, 0.25);
/// assert_eq!(stats.frequency(Tag::Event).showing, 0.0);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn tag_statistics(cards: &[CardRecord]) -> TagStatistics {
    if cards.is_empty() {
        return TagStatistics::default();
    }

    let unknown = cards
        .iter()
        .flat_map(CardRecord::tag_names)
        .filter(|name| Tag::from_name(name).is_none())
        .collect::<BTreeSet<_>>();
    if !unknown.is_empty() {
        log::warn!("ignoring unknown tags: {unknown:?}");
    }

    let total = cards.len() as f64;
    Tag::ALL
        .into_iter()
        .map(|tag| {
            let tagged = cards.iter().filter(|card| card.has_tag(tag));
            let played = tagged.clone().count();
            let showing = tagged.filter(|card| !card.has_tag(Tag::Event)).count();
            let frequency = TagFrequency {
                played: played as f64 / total,
                showing: showing as f64 / total,
            };
            (tag, frequency)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use tmvalue_engine::CardField;

    use super::*;

    #[test]
    fn test_empty_table() {
        let stats = tag_statistics(&[]);
        assert_eq!(stats.frequency(Tag::Earth), TagFrequency::default());
    }

    #[test]
    fn test_every_tag_is_listed() {
        let cards = [CardRecord::new("Untagged", 1)];
        let stats = tag_statistics(&cards);
        assert_eq!(stats.iter().count(), Tag::ALL.len());
        assert!(stats.iter().all(|(_, f)| f == TagFrequency::default()));
    }

    #[test]
    fn test_comma_separated_tags() {
        let cards = [
            CardRecord::new("A", 1).with(CardField::Tags, "earth,science"),
            CardRecord::new("B", 1).with(CardField::Tags, "earth, event"),
        ];
        let stats = tag_statistics(&cards);
        assert_eq!(stats.frequency(Tag::Earth).played, 1.0);
        assert_eq!(stats.frequency(Tag::Earth).showing, 0.5);
        assert_eq!(stats.frequency(Tag::Science).showing, 0.5);
        assert_eq!(stats.frequency(Tag::Event).played, 0.5);
    }
}

//! Game length statistics per player count.

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

use crate::{ContextError, StatisticsError};

/// Mean final generation per player count.
///
/// Derived once from a corpus of logged games and immutable afterwards.
/// The final generation bounds every "remaining generations" computation.
///
/// # Example
///
/// ```
/// use tmvalue_engine::{GameStatistics, Quarter};
///
/// let stats = GameStatistics::tharsis_base();
/// assert_eq!(stats.last_generation(4).unwrap(), 10);
/// assert_eq!(stats.quarter_generation(4, Quarter::Q2).unwrap(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<u8, u32>", into = "BTreeMap<u8, u32>")]
pub struct GameStatistics {
    last_generations: BTreeMap<u8, u32>,
}

impl Default for GameStatistics {
    fn default() -> Self {
        Self::tharsis_base()
    }
}

impl TryFrom<BTreeMap<u8, u32>> for GameStatistics {
    type Error = StatisticsError;

    fn try_from(value: BTreeMap<u8, u32>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<GameStatistics> for BTreeMap<u8, u32> {
    fn from(value: GameStatistics) -> Self {
        value.last_generations
    }
}

impl GameStatistics {
    pub const MIN_PLAYERS: u8 = 2;
    pub const MAX_PLAYERS: u8 = 5;

    /// Builds statistics from `player count -> last generation` pairs.
    pub fn new<I>(last_generations: I) -> Result<Self, StatisticsError>
    where
        I: IntoIterator<Item = (u8, u32)>,
    {
        let last_generations = last_generations.into_iter().collect::<BTreeMap<_, _>>();
        for (&player_count, &last_generation) in &last_generations {
            if !(Self::MIN_PLAYERS..=Self::MAX_PLAYERS).contains(&player_count) {
                return Err(StatisticsError::PlayerCountOutOfRange {
                    player_count,
                    min: Self::MIN_PLAYERS,
                    max: Self::MAX_PLAYERS,
                });
            }
            if last_generation == 0 {
                return Err(StatisticsError::NonPositiveLastGeneration { player_count });
            }
        }
        Ok(Self { last_generations })
    }

    /// Mean game lengths of base-game Tharsis matches (Corporate Era only).
    #[must_use]
    pub fn tharsis_base() -> Self {
        Self {
            last_generations: BTreeMap::from([(2, 13), (3, 11), (4, 10), (5, 10)]),
        }
    }

    pub fn last_generation(&self, player_count: u8) -> Result<u32, ContextError> {
        self.last_generations
            .get(&player_count)
            .copied()
            .ok_or(ContextError::UnsupportedPlayerCount { player_count })
    }

    /// Median generation of the given quarter of an average game.
    ///
    /// The game is cut into four equal quarters and the midpoint of each is
    /// rounded half-to-even.
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn quarter_generation(
        &self,
        player_count: u8,
        quarter: Quarter,
    ) -> Result<u32, ContextError> {
        let last_generation = f64::from(self.last_generation(player_count)?);
        let quarter_length = last_generation / 4.0;
        let midpoint = quarter_length / 2.0 + quarter_length * f64::from(quarter.index());
        Ok(midpoint.round_ties_even() as u32)
    }

    /// Iterates over the supported player counts in ascending order.
    pub fn player_counts(&self) -> impl Iterator<Item = u8> + '_ {
        self.last_generations.keys().copied()
    }

    /// Iterates over `(player count, last generation)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u32)> + '_ {
        self.last_generations.iter().map(|(&p, &g)| (p, g))
    }
}

/// A quarter of an average-length game, used to report values by game phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quarter {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quarter {
    pub const ALL: [Quarter; 4] = [Quarter::Q1, Quarter::Q2, Quarter::Q3, Quarter::Q4];

    /// Zero-based position of the quarter.
    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            Quarter::Q1 => 0,
            Quarter::Q2 => 1,
            Quarter::Q3 => 2,
            Quarter::Q4 => 3,
        }
    }

    fn to_str(self) -> &'static str {
        match self {
            Quarter::Q1 => "q1",
            Quarter::Q2 => "q2",
            Quarter::Q3 => "q3",
            Quarter::Q4 => "q4",
        }
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.to_str(), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quarters(stats: &GameStatistics, player_count: u8) -> Vec<u32> {
        Quarter::ALL
            .iter()
            .map(|&q| stats.quarter_generation(player_count, q).unwrap())
            .collect()
    }

    #[test]
    fn test_quarter_generations_of_base_statistics() {
        let stats = GameStatistics::tharsis_base();
        assert_eq!(quarters(&stats, 2), [2, 5, 8, 11]);
        assert_eq!(quarters(&stats, 3), [1, 4, 7, 10]);
        assert_eq!(quarters(&stats, 4), [1, 4, 6, 9]);
        assert_eq!(quarters(&stats, 5), [1, 4, 6, 9]);
    }

    #[test]
    fn test_quarter_rounds_half_to_even() {
        // 12 / 8 = 1.5 -> 2, 1.5 + 3 = 4.5 -> 4
        let stats = GameStatistics::new([(2, 12)]).unwrap();
        assert_eq!(quarters(&stats, 2), [2, 4, 8, 10]);
    }

    #[test]
    fn test_unsupported_player_count() {
        let stats = GameStatistics::tharsis_base();
        assert_eq!(
            stats.last_generation(6),
            Err(ContextError::UnsupportedPlayerCount { player_count: 6 })
        );
    }

    #[test]
    fn test_new_rejects_invalid_entries() {
        assert!(matches!(
            GameStatistics::new([(1, 10)]),
            Err(StatisticsError::PlayerCountOutOfRange { player_count: 1, .. })
        ));
        assert_eq!(
            GameStatistics::new([(3, 0)]),
            Err(StatisticsError::NonPositiveLastGeneration { player_count: 3 })
        );
    }

    #[test]
    fn test_json_round_trip_validates() {
        let json = serde_json::to_string(&GameStatistics::tharsis_base()).unwrap();
        assert_eq!(json, r#"{"2":13,"3":11,"4":10,"5":10}"#);
        let parsed: GameStatistics = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, GameStatistics::tharsis_base());

        assert!(serde_json::from_str::<GameStatistics>(r#"{"7":10}"#).is_err());
    }

    #[test]
    fn test_quarter_serializes_like_display() {
        for quarter in Quarter::ALL {
            let json = serde_json::to_string(&quarter).unwrap();
            assert_eq!(json, format!("\"{quarter}\""));
        }
        assert_eq!(serde_json::from_str::<Quarter>(r#""q3""#).unwrap(), Quarter::Q3);
    }
}

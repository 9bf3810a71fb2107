//! Historical game records.
//!
//! Each row describes one finished game. Only four columns matter here; any
//! other column of the source table is ignored on deserialization.

use serde::{Deserialize, Serialize};

/// One logged game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub players: u8,
    /// Generation the game ended in.
    pub generations: u32,
    /// Expansion list as written by the logging tool, e.g. `['CORPORATE']`.
    pub expansions: String,
    pub map: String,
}

impl GameRecord {
    /// A base-game (Corporate Era) record on Tharsis.
    #[must_use]
    pub fn base(players: u8, generations: u32) -> Self {
        let filter = GameFilter::default();
        Self {
            players,
            generations,
            expansions: filter.expansions,
            map: filter.map,
        }
    }
}

/// Selects the games that share the rules the valuation assumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameFilter {
    pub expansions: String,
    pub map: String,
}

impl Default for GameFilter {
    fn default() -> Self {
        Self {
            expansions: "['CORPORATE']".to_owned(),
            map: "THARSIS".to_owned(),
        }
    }
}

impl GameFilter {
    #[must_use]
    pub fn matches(&self, game: &GameRecord) -> bool {
        game.expansions.trim() == self.expansions && game.map.trim() == self.map
    }
}

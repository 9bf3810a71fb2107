//! Tunable game-size estimates used by `per` clauses.

use serde::{Deserialize, Serialize};

/// Per-game totals interpolated linearly over the generations of a game.
///
/// Both values are averages for a whole game: by generation `g` of a game
/// lasting `L` generations, `total / L * g` of them are expected to be in play.
///
/// ```
/// use tmvalue_evaluator::config::ValuationConfig;
///
/// let config: ValuationConfig = serde_json::from_str(r#"{"cities_per_game": 9}"#).unwrap();
/// assert_eq!(config.cities_per_game, 9.0);
/// assert_eq!(config.cards_per_game, ValuationConfig::default().cards_per_game);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValuationConfig {
    /// Cities placed on Mars by all players over a game.
    pub cities_per_game: f64,
    /// Project cards a player has in play at the end of a game.
    pub cards_per_game: f64,
}

impl Default for ValuationConfig {
    fn default() -> Self {
        Self {
            cities_per_game: 11.0,
            cards_per_game: 24.0,
        }
    }
}

impl ValuationConfig {
    /// Expected number of cities on Mars by `generation`.
    #[must_use]
    pub fn cities_in_play(&self, generation: u32, last_generation: u32) -> f64 {
        Self::interpolate(self.cities_per_game, generation, last_generation)
    }

    /// Expected number of cards a player has in play by `generation`.
    #[must_use]
    pub fn cards_in_play(&self, generation: u32, last_generation: u32) -> f64 {
        Self::interpolate(self.cards_per_game, generation, last_generation)
    }

    fn interpolate(total: f64, generation: u32, last_generation: u32) -> f64 {
        total / f64::from(last_generation) * f64::from(generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolation() {
        let config = ValuationConfig::default();
        assert_eq!(config.cities_in_play(13, 13), 11.0);
        assert_eq!(config.cards_in_play(5, 10), 12.0);
        assert_eq!(config.cards_in_play(0, 10), 0.0);
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        assert!(serde_json::from_str::<ValuationConfig>(r#"{"cites_per_game": 9}"#).is_err());
        assert_eq!(
            serde_json::from_str::<ValuationConfig>("{}").unwrap(),
            ValuationConfig::default()
        );
    }
}

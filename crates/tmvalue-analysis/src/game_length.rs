//! Game length per player count.

use std::collections::BTreeMap;

use serde::Serialize;
use tmvalue_engine::{GameStatistics, StatisticsError};
use tmvalue_stats::descriptive::DescriptiveStats;

use crate::game_log::{GameFilter, GameRecord};

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum BaselineError {
    #[display("no game matches expansions {expansions} on map {map}")]
    NoGames { expansions: String, map: String },
    #[display("invalid game statistics")]
    Statistics { source: StatisticsError },
}

/// Distribution of final generations for one player count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameLengthSummary {
    pub players: u8,
    pub games: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    /// Mean rounded half-to-even: the generation an average game ends in.
    pub last_generation: u32,
}

impl GameLengthSummary {
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn new(players: u8, stats: &DescriptiveStats) -> Self {
        Self {
            players,
            games: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean,
            median: stats.median,
            std_dev: stats.std_dev,
            last_generation: stats.mean.round_ties_even() as u32,
        }
    }
}

/// Summarizes the games accepted by `filter`, by ascending player count.
///
/// Player counts outside the supported range are skipped.
pub fn summarize_games(
    games: &[GameRecord],
    filter: &GameFilter,
) -> Result<Vec<GameLengthSummary>, BaselineError> {
    let mut by_players = BTreeMap::<u8, Vec<f64>>::new();
    let mut skipped = 0;
    for game in games.iter().filter(|game| filter.matches(game)) {
        if !(GameStatistics::MIN_PLAYERS..=GameStatistics::MAX_PLAYERS).contains(&game.players) {
            skipped += 1;
            continue;
        }
        by_players
            .entry(game.players)
            .or_default()
            .push(f64::from(game.generations));
    }
    if skipped > 0 {
        log::debug!("skipped {skipped} games with unsupported player counts");
    }

    let summaries = by_players
        .iter()
        .filter_map(|(&players, generations)| {
            let stats = DescriptiveStats::new(generations.iter().copied())?;
            Some(GameLengthSummary::new(players, &stats))
        })
        .collect::<Vec<_>>();
    if summaries.is_empty() {
        return Err(BaselineError::NoGames {
            expansions: filter.expansions.clone(),
            map: filter.map.clone(),
        });
    }
    for summary in &summaries {
        log::debug!(
            "{} players: {} games, mean final generation {:.2}",
            summary.players,
            summary.games,
            summary.mean
        );
    }
    Ok(summaries)
}

/// Builds [`GameStatistics`] from the games accepted by `filter`.
pub fn game_statistics(
    games: &[GameRecord],
    filter: &GameFilter,
) -> Result<GameStatistics, BaselineError> {
    let summaries = summarize_games(games, filter)?;
    GameStatistics::new(summaries.iter().map(|s| (s.players, s.last_generation)))
        .map_err(|source| BaselineError::Statistics { source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_is_rounded_half_to_even() {
        let games = [
            GameRecord::base(2, 12),
            GameRecord::base(2, 13),
            GameRecord::base(4, 10),
            GameRecord::base(4, 11),
            GameRecord::base(5, 9),
        ];
        let stats = game_statistics(&games, &GameFilter::default()).unwrap();
        // 12.5 -> 12, 10.5 -> 10
        assert_eq!(stats.iter().collect::<Vec<_>>(), [(2, 12), (4, 10), (5, 9)]);
    }

    #[test]
    fn test_filter_and_unsupported_players() {
        let mut other_map = GameRecord::base(3, 20);
        other_map.map = "ELYSIUM".to_owned();
        let games = [
            GameRecord::base(3, 10),
            GameRecord::base(3, 12),
            GameRecord::base(1, 30),
            GameRecord::base(6, 30),
            other_map,
        ];
        let summaries = summarize_games(&games, &GameFilter::default()).unwrap();
        assert_eq!(summaries.len(), 1);
        let three = &summaries[0];
        assert_eq!(three.players, 3);
        assert_eq!(three.games, 2);
        assert_eq!(three.last_generation, 11);
        assert_eq!((three.min, three.max), (10.0, 12.0));
    }

    #[test]
    fn test_no_games() {
        let games = [GameRecord::base(2, 12)];
        let filter = GameFilter {
            map: "HELLAS".to_owned(),
            ..GameFilter::default()
        };
        assert!(matches!(
            game_statistics(&games, &filter),
            Err(BaselineError::NoGames { .. })
        ));
        assert!(matches!(
            game_statistics(&[], &GameFilter::default()),
            Err(BaselineError::NoGames { .. })
        ));
    }
}

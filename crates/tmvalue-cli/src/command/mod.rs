use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tmvalue_analysis::{
    game_length::{self, GameLengthSummary},
    game_log::GameFilter,
};
use tmvalue_engine::GameStatistics;

use self::{baselines::BaselinesArg, credits_per_vp::CreditsPerVpArg, evaluate::EvaluateArg};
use crate::data;

mod baselines;
mod credits_per_vp;
mod evaluate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
    /// What to compute
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Value every card of a card table
    Evaluate(#[clap(flatten)] EvaluateArg),
    /// Print game lengths, quarter generations and tag frequencies
    Baselines(#[clap(flatten)] BaselinesArg),
    /// Print the credits-per-VP table
    CreditsPerVp(#[clap(flatten)] CreditsPerVpArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    match args.mode {
        Mode::Evaluate(arg) => evaluate::run(&arg)?,
        Mode::Baselines(arg) => baselines::run(&arg)?,
        Mode::CreditsPerVp(arg) => credits_per_vp::run(&arg)?,
    }
    Ok(())
}

/// Where game lengths come from.
///
/// Without `--games` or `--statistics`, the built-in base-game Tharsis
/// statistics are used.
#[derive(Debug, Clone, Default, clap::Args)]
pub(crate) struct StatisticsArg {
    /// Historical games CSV (`players`, `generations`, `expansions`, `map`)
    #[arg(long, conflicts_with = "statistics")]
    games: Option<PathBuf>,
    /// Game statistics JSON mapping player count to last generation
    #[arg(long)]
    statistics: Option<PathBuf>,
    /// Expansion list a logged game must match to be counted [default: ['CORPORATE']]
    #[arg(long, requires = "games")]
    expansions: Option<String>,
    /// Map a logged game must be played on to be counted [default: THARSIS]
    #[arg(long, requires = "games")]
    map: Option<String>,
}

impl StatisticsArg {
    fn filter(&self) -> GameFilter {
        let default = GameFilter::default();
        GameFilter {
            expansions: self.expansions.clone().unwrap_or(default.expansions),
            map: self.map.clone().unwrap_or(default.map),
        }
    }

    /// Summaries of the logged games, if a games table was given.
    fn summarize(&self) -> anyhow::Result<Option<Vec<GameLengthSummary>>> {
        let Some(path) = &self.games else {
            return Ok(None);
        };
        let games = data::read_games_csv(path)?;
        log::info!("Loaded {} games from {}", games.len(), path.display());
        let summaries = game_length::summarize_games(&games, &self.filter())
            .with_context(|| format!("Failed to summarize games from {}", path.display()))?;
        Ok(Some(summaries))
    }

    /// Game statistics, along with the game length summaries they were
    /// derived from when a games table was given.
    pub(crate) fn load_with_summaries(
        &self,
    ) -> anyhow::Result<(GameStatistics, Option<Vec<GameLengthSummary>>)> {
        if let Some(path) = &self.statistics {
            let statistics = data::read_json_file("game statistics", path)?;
            return Ok((statistics, None));
        }
        match self.summarize()? {
            Some(summaries) => {
                let statistics =
                    GameStatistics::new(summaries.iter().map(|s| (s.players, s.last_generation)))
                        .context("Failed to build game statistics")?;
                Ok((statistics, Some(summaries)))
            }
            None => Ok((GameStatistics::tharsis_base(), None)),
        }
    }

    pub(crate) fn load(&self) -> anyhow::Result<GameStatistics> {
        let (statistics, _) = self.load_with_summaries()?;
        Ok(statistics)
    }
}

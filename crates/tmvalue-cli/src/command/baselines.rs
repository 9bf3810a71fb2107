use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tmvalue_analysis::{game_length::GameLengthSummary, tag_stats};
use tmvalue_engine::{GameStatistics, Quarter, TagStatistics};

use super::StatisticsArg;
use crate::{data, util::Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct BaselinesArg {
    #[clap(flatten)]
    statistics: StatisticsArg,
    /// Card table CSV to compute tag frequencies from
    #[arg(long)]
    cards: Option<PathBuf>,
    /// Output file path (default: stdout)
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct BaselinesReport {
    generated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    game_lengths: Option<Vec<GameLengthSummary>>,
    last_generations: GameStatistics,
    quarters: Vec<QuarterRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tags: Option<TagStatistics>,
}

#[derive(Debug, Serialize)]
struct QuarterRow {
    players: u8,
    quarter: Quarter,
    generation: u32,
}

pub fn run(arg: &BaselinesArg) -> anyhow::Result<()> {
    let BaselinesArg {
        statistics,
        cards,
        output,
    } = arg;

    let (last_generations, game_lengths) = statistics.load_with_summaries()?;
    let quarters = quarter_table(&last_generations)?;

    let tags = match cards {
        Some(path) => {
            let cards = data::read_cards_csv(path)?;
            log::info!("Loaded {} cards from {}", cards.len(), path.display());
            Some(tag_stats::tag_statistics(&cards))
        }
        None => None,
    };

    let report = BaselinesReport {
        generated_at: Utc::now(),
        game_lengths,
        last_generations,
        quarters,
        tags,
    };
    let mut output = Output::from_output_path(output.clone())?;
    output.write_json(&report)?;
    log::info!("Wrote baselines to {output}");
    Ok(())
}

fn quarter_table(statistics: &GameStatistics) -> anyhow::Result<Vec<QuarterRow>> {
    let mut rows = vec![];
    for players in statistics.player_counts() {
        for quarter in Quarter::ALL {
            rows.push(QuarterRow {
                players,
                quarter,
                generation: statistics.quarter_generation(players, quarter)?,
            });
        }
    }
    Ok(rows)
}

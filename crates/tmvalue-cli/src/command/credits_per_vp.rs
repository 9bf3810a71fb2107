use std::path::PathBuf;

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tmvalue_engine::{GameStatistics, Quarter, ResourceModel, victory_point};

use super::StatisticsArg;
use crate::util::{Output, ReportFormat};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct CreditsPerVpArg {
    #[clap(flatten)]
    statistics: StatisticsArg,
    /// List every generation of the game instead of the quarter medians
    #[arg(long)]
    all_generations: bool,
    /// Report format
    #[arg(long, value_enum, default_value_t)]
    format: ReportFormat,
    /// Output file path (default: stdout)
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct CreditsPerVpReport<'a> {
    generated_at: DateTime<Utc>,
    last_generations: &'a GameStatistics,
    credits_per_vp: &'a [CreditsPerVpRow],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct CreditsPerVpRow {
    players: u8,
    quarter: Option<Quarter>,
    generation: u32,
    credits_per_vp: f64,
}

pub fn run(arg: &CreditsPerVpArg) -> anyhow::Result<()> {
    let CreditsPerVpArg {
        statistics,
        all_generations,
        format,
        output,
    } = arg;

    let statistics = statistics.load()?;
    let resources = ResourceModel::default();
    let rows = if *all_generations {
        generation_table(&statistics, &resources)
    } else {
        quarter_table(&statistics, &resources)?
    };

    let mut output = Output::from_output_path(output.clone())?;
    match format {
        ReportFormat::Json => output.write_json(&CreditsPerVpReport {
            generated_at: Utc::now(),
            last_generations: &statistics,
            credits_per_vp: &rows,
        })?,
        ReportFormat::Csv => output.write_csv(&rows)?,
    }
    log::info!("Wrote credits per VP to {output}");
    Ok(())
}

fn quarter_table(
    statistics: &GameStatistics,
    resources: &ResourceModel,
) -> anyhow::Result<Vec<CreditsPerVpRow>> {
    let mut rows = vec![];
    for players in statistics.player_counts() {
        for quarter in Quarter::ALL {
            let generation = statistics.quarter_generation(players, quarter)?;
            let credits_per_vp =
                victory_point::credits_per_vp(statistics, resources, generation, players)
                    .with_context(|| {
                        format!("No credits per VP for {players} players in quarter {quarter}")
                    })?;
            rows.push(CreditsPerVpRow {
                players,
                quarter: Some(quarter),
                generation,
                credits_per_vp,
            });
        }
    }
    Ok(rows)
}

/// Credits per VP from generation 1 up to the last generation, skipping
/// generations where the curve is undefined.
fn generation_table(
    statistics: &GameStatistics,
    resources: &ResourceModel,
) -> Vec<CreditsPerVpRow> {
    let mut rows = vec![];
    for (players, last_generation) in statistics.iter() {
        for generation in 1..=last_generation {
            match victory_point::credits_per_vp(statistics, resources, generation, players) {
                Ok(credits_per_vp) => rows.push(CreditsPerVpRow {
                    players,
                    quarter: None,
                    generation,
                    credits_per_vp,
                }),
                Err(error) => log::debug!("skipping generation {generation}: {error}"),
            }
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quarter_table_grows_over_the_game() {
        let stats = GameStatistics::tharsis_base();
        let rows = quarter_table(&stats, &ResourceModel::default()).unwrap();
        assert_eq!(rows.len(), 16);
        for per_players in rows.chunks(4) {
            assert!(
                per_players
                    .windows(2)
                    .all(|w| w[0].credits_per_vp < w[1].credits_per_vp)
            );
        }
        assert!((rows[0].credits_per_vp - 4.699_7).abs() < 1e-3);
    }

    #[test]
    fn test_generation_table_lists_every_generation() {
        let stats = GameStatistics::new([(3, 11)]).unwrap();
        let rows = generation_table(&stats, &ResourceModel::default());
        let generations = rows.iter().map(|r| r.generation).collect::<Vec<_>>();
        assert_eq!(generations, (1..=11).collect::<Vec<_>>());
        assert!(rows.iter().all(|r| r.quarter.is_none()));
    }
}

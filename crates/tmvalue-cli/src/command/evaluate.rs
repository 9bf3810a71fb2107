use std::{error::Error, iter, path::PathBuf};

use anyhow::{Context as _, bail};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tmvalue_analysis::tag_stats;
use tmvalue_engine::{Baselines, GameStatistics, Quarter, ResourceModel};
use tmvalue_evaluator::{
    ValuationError,
    config::ValuationConfig,
    special_case::SpecialCaseTable,
    valuation_engine::{CardValuation, GridPoint, ValuationBatch, ValuationEngine},
};

use super::StatisticsArg;
use crate::{
    data,
    util::{Output, ReportFormat},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct EvaluateArg {
    /// Card table CSV
    cards: PathBuf,
    #[clap(flatten)]
    statistics: StatisticsArg,
    /// Player counts to value cards for [default: every player count with statistics]
    #[arg(long, value_delimiter = ',')]
    players: Vec<u8>,
    /// Generation to value cards at [default: the median generation of each quarter]
    #[arg(long)]
    generation: Option<u32>,
    /// Special-case overrides JSON, keyed by card title
    #[arg(long)]
    special_cases: Option<PathBuf>,
    /// Valuation configuration JSON
    #[arg(long)]
    config: Option<PathBuf>,
    /// Report format
    #[arg(long, value_enum, default_value_t)]
    format: ReportFormat,
    /// Include per-column contributions in the report
    #[arg(long)]
    breakdown: bool,
    /// Fail if any card cannot be valued
    #[arg(long)]
    strict: bool,
    /// Output file path (default: stdout)
    #[arg(long)]
    output: Option<PathBuf>,
}

pub fn run(arg: &EvaluateArg) -> anyhow::Result<()> {
    let EvaluateArg {
        cards,
        statistics,
        players,
        generation,
        special_cases,
        config,
        format,
        breakdown,
        strict,
        output,
    } = arg;

    let statistics = statistics.load()?;
    let cards = data::read_cards_csv(cards)?;
    log::info!("Loaded {} cards", cards.len());

    let tags = tag_stats::tag_statistics(&cards);
    let baselines = Baselines::new(statistics, ResourceModel::default(), tags);

    let config = match config {
        Some(path) => data::read_json_file::<ValuationConfig, _>("valuation config", path)?,
        None => ValuationConfig::default(),
    };
    let mut engine = ValuationEngine::new(&baselines).with_config(config);
    if let Some(path) = special_cases {
        let table = data::read_json_file::<SpecialCaseTable, _>("special cases", path)?;
        table
            .validate()
            .with_context(|| format!("Invalid special cases in {}", path.display()))?;
        log::info!("Loaded {} special cases", table.len());
        engine = engine.with_resolver(table);
    }

    let grid = valuation_grid(baselines.statistics(), players, *generation)?;
    let ValuationBatch {
        mut valuations,
        errors,
    } = engine
        .evaluate_grid(&cards, &grid)
        .context("Failed to value card table")?;
    log::info!(
        "Valued {} cards at {} points ({} valuations, {} errors)",
        cards.len(),
        grid.len(),
        valuations.len(),
        errors.len()
    );

    if !breakdown {
        for valuation in &mut valuations {
            valuation.breakdown = None;
        }
    }

    let mut output = Output::from_output_path(output.clone())?;
    match format {
        ReportFormat::Json => {
            let report = EvaluationReport {
                generated_at: Utc::now(),
                last_generations: baselines.statistics(),
                grid: &grid,
                valuations: &valuations,
                errors: errors.iter().map(ErrorRow::new).collect(),
            };
            output.write_json(&report)?;
        }
        ReportFormat::Csv if *breakdown => {
            output.write_csv(valuations.iter().map(|v| BreakdownRow::new(v, &grid)))?;
        }
        ReportFormat::Csv => {
            output.write_csv(valuations.iter().map(|v| ValuationRow::new(v, &grid)))?;
        }
    }
    log::info!("Wrote valuations to {output}");

    if *strict && !errors.is_empty() {
        bail!("{} card valuations failed", errors.len());
    }
    Ok(())
}

fn valuation_grid(
    statistics: &GameStatistics,
    players: &[u8],
    generation: Option<u32>,
) -> anyhow::Result<Vec<GridPoint>> {
    let players = if players.is_empty() {
        statistics.player_counts().collect()
    } else {
        players.to_vec()
    };
    for &p in &players {
        statistics
            .last_generation(p)
            .with_context(|| format!("Cannot value cards for {p} players"))?;
    }

    match generation {
        Some(generation) => Ok(players
            .into_iter()
            .map(|p| GridPoint::new(generation, p))
            .collect()),
        None => GridPoint::quarters(statistics, players).context("Failed to build quarter grid"),
    }
}

fn quarter_of(valuation: &CardValuation, grid: &[GridPoint]) -> Option<Quarter> {
    grid.iter()
        .find(|p| p.generation == valuation.generation && p.players == valuation.players)
        .and_then(|p| p.quarter)
}

/// Renders an error and its sources as `outer: inner: ...`.
fn error_chain(error: &(dyn Error + 'static)) -> String {
    iter::successors(Some(error), |&e| e.source())
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(": ")
}

#[derive(Debug, Serialize)]
struct EvaluationReport<'a> {
    generated_at: DateTime<Utc>,
    last_generations: &'a GameStatistics,
    grid: &'a [GridPoint],
    valuations: &'a [CardValuation],
    errors: Vec<ErrorRow<'a>>,
}

#[derive(Debug, Serialize)]
struct ErrorRow<'a> {
    title: &'a str,
    field: &'static str,
    generation: u32,
    players: u8,
    message: String,
}

impl<'a> ErrorRow<'a> {
    fn new(error: &'a ValuationError) -> Self {
        Self {
            title: &error.title,
            field: error.field.column_name(),
            generation: error.generation,
            players: error.player_count,
            message: error_chain(&error.source),
        }
    }
}

#[derive(Debug, Serialize)]
struct ValuationRow<'a> {
    title: &'a str,
    generation: u32,
    players: u8,
    quarter: Option<Quarter>,
    value: i64,
}

impl<'a> ValuationRow<'a> {
    fn new(valuation: &'a CardValuation, grid: &[GridPoint]) -> Self {
        Self {
            title: &valuation.title,
            generation: valuation.generation,
            players: valuation.players,
            quarter: quarter_of(valuation, grid),
            value: valuation.value,
        }
    }
}

/// CSV row with the breakdown columns left empty for special cases.
#[derive(Debug, Serialize)]
struct BreakdownRow<'a> {
    title: &'a str,
    generation: u32,
    players: u8,
    quarter: Option<Quarter>,
    value: i64,
    primary_cost: Option<f64>,
    additional_cost: Option<f64>,
    victory_points: Option<f64>,
    immediate_benefit: Option<f64>,
    active: Option<f64>,
    removal: Option<f64>,
    total: Option<f64>,
}

impl<'a> BreakdownRow<'a> {
    fn new(valuation: &'a CardValuation, grid: &[GridPoint]) -> Self {
        let breakdown = valuation.breakdown.as_ref();
        Self {
            title: &valuation.title,
            generation: valuation.generation,
            players: valuation.players,
            quarter: quarter_of(valuation, grid),
            value: valuation.value,
            primary_cost: breakdown.map(|b| b.primary_cost),
            additional_cost: breakdown.map(|b| b.additional_cost),
            victory_points: breakdown.map(|b| b.victory_points),
            immediate_benefit: breakdown.map(|b| b.immediate_benefit),
            active: breakdown.map(|b| b.active),
            removal: breakdown.map(|b| b.removal),
            total: breakdown.map(|b| b.total()),
        }
    }
}

#[cfg(test)]
mod tests {
    use tmvalue_engine::{CardField, CardRecord, ContextError};
    use tmvalue_evaluator::EvalError;

    use super::*;

    #[test]
    fn test_default_grid_covers_every_quarter() {
        let stats = GameStatistics::tharsis_base();
        let grid = valuation_grid(&stats, &[], None).unwrap();
        assert_eq!(grid.len(), 4 * 4);
        assert_eq!(grid[0].players, 2);
        assert_eq!(grid[0].quarter, Some(Quarter::Q1));
    }

    #[test]
    fn test_fixed_generation_grid() {
        let stats = GameStatistics::tharsis_base();
        let grid = valuation_grid(&stats, &[3, 4], Some(5)).unwrap();
        assert_eq!(grid, [GridPoint::new(5, 3), GridPoint::new(5, 4)]);
    }

    #[test]
    fn test_unsupported_players_rejected() {
        let stats = GameStatistics::tharsis_base();
        assert!(valuation_grid(&stats, &[6], None).is_err());
    }

    #[test]
    fn test_error_chain_includes_context_error() {
        let error = EvalError::from(ContextError::UnsupportedPlayerCount { player_count: 7 });
        let message = error_chain(&error);
        assert_eq!(
            message,
            "degenerate generation context: no statistics for 7-player games"
        );
    }

    #[test]
    fn test_csv_quarter_lookup() {
        let baselines = Baselines::default();
        let engine = ValuationEngine::new(&baselines);
        let cards = [CardRecord::new("Mine", 4).with(CardField::ImmediateBenefit, "1 STEEL")];
        let grid = GridPoint::quarters(baselines.statistics(), [2]).unwrap();
        let batch = engine.evaluate_grid(&cards, &grid).unwrap();

        let rows = batch
            .valuations
            .iter()
            .map(|v| BreakdownRow::new(v, &grid))
            .collect::<Vec<_>>();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[3].quarter, Some(Quarter::Q4));
        assert_eq!(rows[0].primary_cost, Some(-4.0));
    }
}

//! Card table valuation.
//!
//! [`ValuationEngine`] values every card of a table for one or more
//! `(generation, player count)` points:
//!
//! ```text
//! value = round(-primary_cost + additional_cost + victory_points
//!               + immediate_benefit + active + removal)
//! ```
//!
//! Special-case cards take their value from the
//! [`SpecialCaseResolver`] instead, and their columns are never parsed.
//!
//! Rounding is half-to-even. A card that fails to evaluate is reported in
//! [`ValuationBatch::errors`] and the remaining cards are still valued.

use serde::Serialize;
use tmvalue_engine::{
    Baselines, CardField, CardRecord, ContextError, GameStatistics, GenerationContext, Quarter,
};

use crate::{
    FieldError, ValuationError,
    config::ValuationConfig,
    field_valuator::{CompiledCard, FieldValuator, ValueBreakdown},
    special_case::{NoSpecialCases, SpecialCaseResolver},
    token_evaluator::TokenEvaluator,
};

/// Value of one card at one `(generation, player count)` point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardValuation {
    pub title: String,
    pub generation: u32,
    pub players: u8,
    pub value: i64,
    /// Column contributions, absent for special cases.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<ValueBreakdown>,
}

/// Result of valuing a card table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValuationBatch {
    pub valuations: Vec<CardValuation>,
    pub errors: Vec<ValuationError>,
}

impl ValuationBatch {
    fn extend(&mut self, other: ValuationBatch) {
        self.valuations.extend(other.valuations);
        self.errors.extend(other.errors);
    }
}

/// A `(generation, player count)` pair to value cards at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridPoint {
    pub generation: u32,
    pub players: u8,
    /// Game quarter the generation stands for, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quarter: Option<Quarter>,
}

impl GridPoint {
    #[must_use]
    pub fn new(generation: u32, players: u8) -> Self {
        Self {
            generation,
            players,
            quarter: None,
        }
    }

    /// The median generation of every quarter, for each of `player_counts`.
    pub fn quarters<I>(
        statistics: &GameStatistics,
        player_counts: I,
    ) -> Result<Vec<Self>, ContextError>
    where
        I: IntoIterator<Item = u8>,
    {
        let mut points = vec![];
        for players in player_counts {
            for quarter in Quarter::ALL {
                points.push(Self {
                    generation: statistics.quarter_generation(players, quarter)?,
                    players,
                    quarter: Some(quarter),
                });
            }
        }
        Ok(points)
    }
}

#[derive(Debug)]
enum PreparedCard<'c> {
    Special(&'c CardRecord),
    Generic(CompiledCard),
    Invalid(&'c CardRecord, FieldError),
}

impl PreparedCard<'_> {
    fn title(&self) -> &str {
        match self {
            PreparedCard::Special(card) | PreparedCard::Invalid(card, _) => &card.title,
            PreparedCard::Generic(card) => &card.title,
        }
    }
}

/// Values card tables against read-only baselines.
///
/// The engine keeps no state between calls: the same inputs always give the
/// same valuations.
///
/// # Example
///
/// ```
/// use tmvalue_engine::{Baselines, CardField, CardRecord};
/// use tmvalue_evaluator::valuation_engine::ValuationEngine;
///
/// let baselines = Baselines::default();
/// let engine = ValuationEngine::new(&baselines);
/// let cards = [
///     CardRecord::new("Mine", 4).with(CardField::ImmediateBenefit, "1 STEEL"),
///     CardRecord::new("Typo", 4).with(CardField::ImmediateBenefit, "1 STEAL"),
/// ];
///
/// let batch = engine.evaluate(&cards, 2, 2).unwrap();
/// assert_eq!(batch.valuations.len(), 1);
/// assert_eq!(batch.valuations[0].value, 18);
/// assert_eq!(batch.errors[0].title, "Typo");
/// ```
#[derive(Debug)]
pub struct ValuationEngine<'a> {
    baselines: &'a Baselines,
    config: ValuationConfig,
    resolver: Box<dyn SpecialCaseResolver + 'a>,
}

impl<'a> ValuationEngine<'a> {
    #[must_use]
    pub fn new(baselines: &'a Baselines) -> Self {
        Self {
            baselines,
            config: ValuationConfig::default(),
            resolver: Box::new(NoSpecialCases),
        }
    }

    #[must_use]
    pub fn with_config(self, config: ValuationConfig) -> Self {
        Self { config, ..self }
    }

    #[must_use]
    pub fn with_resolver<R>(self, resolver: R) -> Self
    where
        R: SpecialCaseResolver + 'a,
    {
        Self {
            resolver: Box::new(resolver),
            ..self
        }
    }

    #[must_use]
    pub fn baselines(&self) -> &'a Baselines {
        self.baselines
    }

    fn token_evaluator(&self) -> TokenEvaluator<'_> {
        TokenEvaluator::new(self.baselines, &self.config)
    }

    /// Values one card in the given context.
    pub fn value_card(
        &self,
        card: &CardRecord,
        context: &GenerationContext,
    ) -> Result<CardValuation, ValuationError> {
        let prepared = self.prepare(card);
        self.value_prepared(&prepared, context)
    }

    /// Values every card at `generation` in a `player_count` game.
    ///
    /// Fails only if the context itself is invalid; card errors are collected.
    pub fn evaluate(
        &self,
        cards: &[CardRecord],
        generation: u32,
        player_count: u8,
    ) -> Result<ValuationBatch, ContextError> {
        let prepared = cards.iter().map(|card| self.prepare(card)).collect::<Vec<_>>();
        self.evaluate_prepared(&prepared, GridPoint::new(generation, player_count))
    }

    /// Values every card at each point of `grid`, parsing the cards only once.
    pub fn evaluate_grid(
        &self,
        cards: &[CardRecord],
        grid: &[GridPoint],
    ) -> Result<ValuationBatch, ContextError> {
        let prepared = cards.iter().map(|card| self.prepare(card)).collect::<Vec<_>>();
        let mut batch = ValuationBatch::default();
        for &point in grid {
            batch.extend(self.evaluate_prepared(&prepared, point)?);
        }
        Ok(batch)
    }

    fn prepare<'c>(&self, card: &'c CardRecord) -> PreparedCard<'c> {
        if self.resolver.is_special(&card.title) {
            return PreparedCard::Special(card);
        }
        match CompiledCard::compile(card) {
            Ok(compiled) => PreparedCard::Generic(compiled),
            Err(error) => PreparedCard::Invalid(card, error),
        }
    }

    fn evaluate_prepared(
        &self,
        cards: &[PreparedCard<'_>],
        point: GridPoint,
    ) -> Result<ValuationBatch, ContextError> {
        let context = self.baselines.context(point.generation, point.players)?;
        log::debug!(
            "valuing {} cards at generation {} with {} players ({} remaining generations)",
            cards.len(),
            point.generation,
            point.players,
            context.remaining_generations(),
        );

        let mut batch = ValuationBatch::default();
        for card in cards {
            match self.value_prepared(card, &context) {
                Ok(valuation) => batch.valuations.push(valuation),
                Err(error) => {
                    log::warn!("{error}: {}", error.source);
                    batch.errors.push(error);
                }
            }
        }
        Ok(batch)
    }

    fn value_prepared(
        &self,
        card: &PreparedCard<'_>,
        context: &GenerationContext,
    ) -> Result<CardValuation, ValuationError> {
        let generation = context.generation();
        let player_count = context.player_count();
        let (total, breakdown) = match card {
            PreparedCard::Special(record) => {
                let evaluator = self.token_evaluator();
                let total = self
                    .resolver
                    .resolve(record, context, &evaluator)
                    .map_err(|e| {
                        ValuationError::new(
                            &record.title,
                            generation,
                            player_count,
                            FieldError::new(CardField::Override, e),
                        )
                    })?;
                (total, None)
            }
            PreparedCard::Generic(compiled) => {
                let valuator = FieldValuator::new(self.token_evaluator());
                let breakdown = valuator.breakdown(compiled, context).map_err(|e| {
                    ValuationError::new(&compiled.title, generation, player_count, e)
                })?;
                (breakdown.total(), Some(breakdown))
            }
            PreparedCard::Invalid(record, error) => {
                return Err(ValuationError::new(
                    &record.title,
                    generation,
                    player_count,
                    error.clone(),
                ));
            }
        };
        Ok(CardValuation {
            title: card.title().to_owned(),
            generation,
            players: player_count,
            value: round_credits(total),
            breakdown,
        })
    }
}

#[expect(clippy::cast_possible_truncation)]
fn round_credits(value: f64) -> i64 {
    value.round_ties_even() as i64
}

#[cfg(test)]
mod tests {
    use tmvalue_engine::Resource;

    use super::*;
    use crate::{
        EvalError,
        special_case::{SpecialCase, SpecialCaseTable},
    };

    fn card_with_vp(primary_cost: u32, points: &str) -> CardRecord {
        CardRecord::new("Monument", primary_cost).with(CardField::VictoryPoints, points)
    }

    #[test]
    fn test_rounding_is_half_to_even() {
        assert_eq!(round_credits(-7.5), -8);
        assert_eq!(round_credits(-6.5), -6);
        assert_eq!(round_credits(2.5), 2);
        assert_eq!(round_credits(3.4999), 3);
    }

    #[test]
    fn test_immediate_steel_is_worth_four() {
        let baselines = Baselines::default();
        let engine = ValuationEngine::new(&baselines);
        let card = CardRecord::new("Steel", 0).with(CardField::ImmediateBenefit, "2 steel");
        for (generation, players) in [(1, 2), (6, 3), (10, 5)] {
            let context = baselines.context(generation, players).unwrap();
            let valuation = engine.value_card(&card, &context).unwrap();
            assert_eq!(valuation.value, 4);
            assert_eq!(valuation.breakdown.unwrap().immediate_benefit, 4.0);
        }
    }

    #[test]
    fn test_value_sums_columns() {
        let baselines = Baselines::default();
        let engine = ValuationEngine::new(&baselines);
        let context = baselines.context(2, 2).unwrap();
        let card = card_with_vp(10, "1");

        let valuation = engine.value_card(&card, &context).unwrap();
        let expected = -10.0 + context.credits_per_vp();
        assert_eq!(valuation.value, round_credits(expected));
        assert_eq!(valuation.breakdown.unwrap().total(), expected);
        assert_eq!((valuation.generation, valuation.players), (2, 2));
    }

    #[test]
    fn test_primary_cost_shifts_value() {
        let baselines = Baselines::default();
        let engine = ValuationEngine::new(&baselines);
        let context = baselines.context(5, 3).unwrap();
        for points in ["0", "1", "2"] {
            let base = engine.value_card(&card_with_vp(5, points), &context).unwrap();
            let dearer = engine.value_card(&card_with_vp(12, points), &context).unwrap();
            let base = base.breakdown.unwrap().total();
            let dearer = dearer.breakdown.unwrap().total();
            assert!((base - dearer - 7.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_evaluate_is_idempotent() {
        let baselines = Baselines::default();
        let engine = ValuationEngine::new(&baselines);
        let cards = [
            card_with_vp(8, "2"),
            CardRecord::new("Tap", 11)
                .with(CardField::ActiveCost, "1 energy")
                .with(CardField::ActiveBenefit, "1 draw"),
        ];
        let first = engine.evaluate(&cards, 4, 4).unwrap();
        let second = engine.evaluate(&cards, 4, 4).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.valuations.len(), 2);
    }

    #[test]
    fn test_special_case_bypasses_columns() {
        let baselines = Baselines::default();
        let table = [(
            "Odd".to_owned(),
            SpecialCase {
                credits: 7.0,
                expression: None,
            },
        )]
        .into_iter()
        .collect::<SpecialCaseTable>();
        let engine = ValuationEngine::new(&baselines).with_resolver(table);
        // columns that would fail to parse are never looked at
        let card = CardRecord::new("Odd", 30)
            .with(CardField::ImmediateBenefit, "gain something unusual")
            .with(CardField::VictoryPoints, "5");

        let batch = engine.evaluate(&[card], 3, 2).unwrap();
        assert!(batch.errors.is_empty());
        assert_eq!(batch.valuations[0].value, 7);
        assert_eq!(batch.valuations[0].breakdown, None);
    }

    #[test]
    fn test_batch_collects_errors() {
        let baselines = Baselines::default();
        let engine = ValuationEngine::new(&baselines);
        let cards = [
            CardRecord::new("Good", 3).with(CardField::ImmediateBenefit, "1 temp"),
            CardRecord::new("Bad", 3).with(CardField::AdditionalCost, "2 gold"),
            CardRecord::new("Pet", 3).with(CardField::ActiveBenefit, "1 unicorn on card"),
        ];

        let batch = engine.evaluate(&cards, 6, 3).unwrap();
        assert_eq!(batch.valuations.len(), 1);
        assert_eq!(batch.valuations[0].value, 11);

        let bad = &batch.errors[0];
        assert_eq!(bad.title, "Bad");
        assert_eq!(bad.field, CardField::AdditionalCost);
        assert_eq!((bad.generation, bad.player_count), (6, 3));
        assert_eq!(
            bad.source,
            EvalError::UnknownToken {
                token: "gold".to_owned()
            }
        );

        let pet = &batch.errors[1];
        assert_eq!(pet.field, CardField::ActiveBenefit);
    }

    #[test]
    fn test_invalid_context() {
        let baselines = Baselines::default();
        let engine = ValuationEngine::new(&baselines);
        assert_eq!(
            engine.evaluate(&[], 1, 6),
            Err(ContextError::UnsupportedPlayerCount { player_count: 6 })
        );
        assert!(matches!(
            engine.evaluate(&[], 0, 2),
            Err(ContextError::InvalidGeneration { .. })
        ));
    }

    #[test]
    fn test_grid_over_quarters() {
        let baselines = Baselines::default();
        let engine = ValuationEngine::new(&baselines);
        let grid = GridPoint::quarters(baselines.statistics(), [2, 3]).unwrap();
        assert_eq!(grid.len(), 8);
        assert_eq!(
            grid.iter().map(|p| p.generation).collect::<Vec<_>>(),
            [2, 5, 8, 11, 1, 4, 7, 10]
        );

        let cards = [CardRecord::new("Oxygen", 10).with(CardField::ImmediateBenefit, "1 oxygen")];
        let batch = engine.evaluate_grid(&cards, &grid).unwrap();
        assert_eq!(batch.valuations.len(), 8);
        for valuation in &batch.valuations {
            let context = baselines
                .context(valuation.generation, valuation.players)
                .unwrap();
            let oxygen = baselines
                .resources()
                .resource_value(Resource::Oxygen, &context);
            assert_eq!(valuation.value, round_credits(oxygen - 10.0));
        }
    }
}

//! Per-column valuation rules.
//!
//! A card is first compiled into a [`CompiledCard`]: every expression column
//! is parsed once, so that the recurring action loop can re-evaluate the same
//! trees for every remaining generation. A [`FieldValuator`] then turns each
//! column into a credit delta for one [`GenerationContext`].
//!
//! | Column                 | Rule                                              |
//! |------------------------|---------------------------------------------------|
//! | `Primary_Cost`         | `-cost`                                           |
//! | `Additional_Cost`      | `-value`, `or` takes the cheapest option          |
//! | `Victory_Points`       | `points * credits_per_vp` for a fixed number      |
//! | `Immediate_Benefit`    | `value`, `or` takes the best option               |
//! | `Active_Cost/Benefit`  | net gain of the action, summed over the game      |
//! | `Removed_from_Opponent`| `value`                                           |
//!
//! `Passive_Benefit` is not valued.

use serde::Serialize;
use tmvalue_engine::{CardField, CardRecord, GenerationContext, Production};

use crate::{
    EvalError, FieldError,
    expression::Expression,
    token_evaluator::{EvalScope, Objective, TokenEvaluator},
};

/// Parsed `Victory_Points` column.
#[derive(Debug, Clone, PartialEq)]
pub enum VictoryPoints {
    None,
    /// A fixed number of points, e.g. `2` or `-1`.
    Fixed(i32),
    /// Points scored per resource stored on the card, e.g. `1 per 2 animal`.
    PerResource { ratio: f64 },
    /// Any other condition, e.g. `1 per jovian tag`. Worth nothing by itself.
    Conditional,
}

impl VictoryPoints {
    /// Parses the column text.
    ///
    /// ```
    /// use tmvalue_evaluator::field_valuator::VictoryPoints;
    ///
    /// assert_eq!(VictoryPoints::parse(Some("-1")).unwrap(), VictoryPoints::Fixed(-1));
    /// assert_eq!(
    ///     VictoryPoints::parse(Some("1 per 2 animal")).unwrap(),
    ///     VictoryPoints::PerResource { ratio: 0.5 },
    /// );
    /// assert_eq!(VictoryPoints::parse(None).unwrap(), VictoryPoints::None);
    /// ```
    pub fn parse(text: Option<&str>) -> Result<Self, EvalError> {
        let Some(text) = text.map(str::trim).filter(|t| !t.is_empty()) else {
            return Ok(VictoryPoints::None);
        };
        if let Ok(points) = text.parse::<i32>() {
            return Ok(VictoryPoints::Fixed(points));
        }
        if let Ok(points) = text.parse::<f64>() {
            return Self::whole_points(text, points);
        }

        let words = text.split_whitespace().collect::<Vec<_>>();
        let (points, rest) = match words.as_slice() {
            [points, "per", rest @ ..] => match points.parse::<f64>() {
                Ok(points) if points.is_finite() => (points, rest),
                _ => return Ok(VictoryPoints::Conditional),
            },
            _ => return Ok(VictoryPoints::Conditional),
        };
        let malformed = |reason: &str| EvalError::MalformedExpression {
            expression: text.to_owned(),
            reason: reason.to_owned(),
        };
        let per = match rest {
            [_resource] => 1.0,
            [per, _resource] => match per.parse::<f64>() {
                Ok(per) if per.is_finite() && per > 0.0 => per,
                // `1 per jovian tag`
                _ => return Ok(VictoryPoints::Conditional),
            },
            [] => return Err(malformed("expected a resource after 'per'")),
            _ => return Ok(VictoryPoints::Conditional),
        };
        Ok(VictoryPoints::PerResource { ratio: points / per })
    }

    /// Accepts a number written with a decimal point, like `2.0`, as long as
    /// it is a whole number of points.
    #[expect(clippy::cast_possible_truncation)]
    fn whole_points(text: &str, points: f64) -> Result<Self, EvalError> {
        let whole = points.is_finite()
            && points.fract() == 0.0
            && (f64::from(i32::MIN)..=f64::from(i32::MAX)).contains(&points);
        if !whole {
            return Err(EvalError::MalformedExpression {
                expression: text.to_owned(),
                reason: "victory points must be a whole number".to_owned(),
            });
        }
        Ok(VictoryPoints::Fixed(points as i32))
    }

    /// Points per stored resource, when points depend on resources on the card.
    #[must_use]
    pub fn per_card_resource(&self) -> Option<f64> {
        match self {
            VictoryPoints::PerResource { ratio, .. } => Some(*ratio),
            VictoryPoints::None | VictoryPoints::Fixed(_) | VictoryPoints::Conditional => None,
        }
    }
}

/// A card with all valued columns parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledCard {
    pub title: String,
    pub primary_cost: u32,
    pub additional_cost: Expression,
    pub victory_points: VictoryPoints,
    pub immediate_benefit: Expression,
    pub active_cost: Expression,
    pub active_benefit: Expression,
    pub removed_from_opponent: Expression,
}

impl CompiledCard {
    /// Parses every valued column, failing on the first invalid one.
    pub fn compile(card: &CardRecord) -> Result<Self, FieldError> {
        let expression = |field| {
            Expression::parse_opt(card.text(field)).map_err(|e| FieldError::new(field, e))
        };
        Ok(Self {
            title: card.title.clone(),
            primary_cost: card.primary_cost,
            additional_cost: expression(CardField::AdditionalCost)?,
            victory_points: VictoryPoints::parse(card.text(CardField::VictoryPoints))
                .map_err(|e| FieldError::new(CardField::VictoryPoints, e))?,
            immediate_benefit: expression(CardField::ImmediateBenefit)?,
            active_cost: expression(CardField::ActiveCost)?,
            active_benefit: expression(CardField::ActiveBenefit)?,
            removed_from_opponent: expression(CardField::RemovedFromOpponent)?,
        })
    }
}

/// Unrounded contribution of every column to a card value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ValueBreakdown {
    pub primary_cost: f64,
    pub additional_cost: f64,
    pub victory_points: f64,
    pub immediate_benefit: f64,
    pub active: f64,
    pub removal: f64,
}

impl ValueBreakdown {
    #[must_use]
    pub fn total(&self) -> f64 {
        self.primary_cost
            + self.additional_cost
            + self.victory_points
            + self.immediate_benefit
            + self.active
            + self.removal
    }
}

/// Applies the column rules to compiled cards.
#[derive(Debug, Clone, Copy)]
pub struct FieldValuator<'a> {
    evaluator: TokenEvaluator<'a>,
}

impl<'a> FieldValuator<'a> {
    #[must_use]
    pub fn new(evaluator: TokenEvaluator<'a>) -> Self {
        Self { evaluator }
    }

    /// Values every column of `card` when played in `context`.
    pub fn breakdown(
        &self,
        card: &CompiledCard,
        context: &GenerationContext,
    ) -> Result<ValueBreakdown, FieldError> {
        Ok(ValueBreakdown {
            primary_cost: -f64::from(card.primary_cost),
            additional_cost: self.additional_cost(card, context)?,
            victory_points: self.victory_points(card, context),
            immediate_benefit: self.immediate_benefit(card, context)?,
            active: self.active_cost_benefit(card, context)?,
            removal: self.removal_from_opponent(card, context)?,
        })
    }

    pub fn additional_cost(
        &self,
        card: &CompiledCard,
        context: &GenerationContext,
    ) -> Result<f64, FieldError> {
        let cost = self
            .evaluate(card, &card.additional_cost, context, Objective::Cost)
            .map_err(|e| FieldError::new(CardField::AdditionalCost, e))?;
        Ok(-cost)
    }

    #[must_use]
    pub fn victory_points(&self, card: &CompiledCard, context: &GenerationContext) -> f64 {
        match card.victory_points {
            VictoryPoints::Fixed(points) => f64::from(points) * context.credits_per_vp(),
            // per-resource points are earned through `on card` clauses
            VictoryPoints::None | VictoryPoints::PerResource { .. } | VictoryPoints::Conditional => {
                0.0
            }
        }
    }

    pub fn immediate_benefit(
        &self,
        card: &CompiledCard,
        context: &GenerationContext,
    ) -> Result<f64, FieldError> {
        self.evaluate(card, &card.immediate_benefit, context, Objective::Benefit)
            .map_err(|e| FieldError::new(CardField::ImmediateBenefit, e))
    }

    pub fn removal_from_opponent(
        &self,
        card: &CompiledCard,
        context: &GenerationContext,
    ) -> Result<f64, FieldError> {
        self.evaluate(card, &card.removed_from_opponent, context, Objective::Benefit)
            .map_err(|e| FieldError::new(CardField::RemovedFromOpponent, e))
    }

    /// Net gain of the card's action, taken once per generation from the
    /// current one through the last one whenever it pays off.
    ///
    /// On the last generation, production gained by the action can no longer
    /// pay out:
    ///
    /// - the cost is ignored if the benefit is income dependent, unless the
    ///   cost offers a choice;
    /// - a `CREDIT` or `PLANT` benefit is worth nothing, unless the benefit
    ///   offers a choice or stores resources on the card.
    pub fn active_cost_benefit(
        &self,
        card: &CompiledCard,
        context: &GenerationContext,
    ) -> Result<f64, FieldError> {
        if card.active_cost.is_empty() && card.active_benefit.is_empty() {
            return Ok(0.0);
        }

        let baselines = self.evaluator.baselines();
        let mut total = 0.0;
        for generation in context.generation()..=context.last_generation() {
            let step = baselines
                .context(generation, context.player_count())
                .map_err(|e| FieldError::new(CardField::ActiveBenefit, e.into()))?;
            let cost = self
                .active_cost(card, &step)
                .map_err(|e| FieldError::new(CardField::ActiveCost, e))?;
            let benefit = self
                .active_benefit(card, &step)
                .map_err(|e| FieldError::new(CardField::ActiveBenefit, e))?;
            if benefit > cost {
                total += benefit - cost;
            }
        }
        Ok(total)
    }

    fn active_cost(
        &self,
        card: &CompiledCard,
        step: &GenerationContext,
    ) -> Result<f64, EvalError> {
        let cost = &card.active_cost;
        if !cost.has_or()
            && step.is_last_generation()
            && card.active_benefit.is_income_dependent()
        {
            return Ok(0.0);
        }
        self.evaluate(card, cost, step, Objective::Cost)
    }

    fn active_benefit(
        &self,
        card: &CompiledCard,
        step: &GenerationContext,
    ) -> Result<f64, EvalError> {
        let benefit = &card.active_benefit;
        if !benefit.has_or()
            && !benefit.has_on_card()
            && step.is_last_generation()
            && benefit.references_production(&[Production::Credit, Production::Plant])
        {
            return Ok(0.0);
        }
        self.evaluate(card, benefit, step, Objective::Benefit)
    }

    fn evaluate(
        &self,
        card: &CompiledCard,
        expression: &Expression,
        context: &GenerationContext,
        objective: Objective,
    ) -> Result<f64, EvalError> {
        let scope = EvalScope::new(context)
            .with_vp_per_card_resource(card.victory_points.per_card_resource());
        self.evaluator.evaluate(expression, &scope, objective)
    }
}

#[cfg(test)]
mod tests {
    use tmvalue_engine::Baselines;

    use super::*;
    use crate::config::ValuationConfig;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "{actual} is not close to {expected}"
        );
    }

    fn active(card: &CardRecord, generation: u32, player_count: u8) -> f64 {
        let baselines = Baselines::default();
        let config = ValuationConfig::default();
        let valuator = FieldValuator::new(TokenEvaluator::new(&baselines, &config));
        let context = baselines.context(generation, player_count).unwrap();
        let card = CompiledCard::compile(card).unwrap();
        valuator.active_cost_benefit(&card, &context).unwrap()
    }

    fn action(cost: &str, benefit: &str) -> CardRecord {
        CardRecord::new("Action", 0)
            .with(CardField::ActiveCost, cost)
            .with(CardField::ActiveBenefit, benefit)
    }

    #[test]
    fn test_victory_points_parse() {
        assert_eq!(VictoryPoints::parse(Some(" 2 ")), Ok(VictoryPoints::Fixed(2)));
        assert_eq!(VictoryPoints::parse(Some("")), Ok(VictoryPoints::None));
        assert_eq!(
            VictoryPoints::parse(Some("1 per animal")),
            Ok(VictoryPoints::PerResource { ratio: 1.0 })
        );
        assert_eq!(
            VictoryPoints::parse(Some("1 per 3 microbe")).unwrap().per_card_resource(),
            Some(1.0 / 3.0)
        );
        assert_eq!(
            VictoryPoints::parse(Some("1 per jovian tag")),
            Ok(VictoryPoints::Conditional)
        );
        assert_eq!(
            VictoryPoints::parse(Some("special")),
            Ok(VictoryPoints::Conditional)
        );
        assert!(matches!(
            VictoryPoints::parse(Some("1 per")),
            Err(EvalError::MalformedExpression { .. })
        ));
    }

    #[test]
    fn test_victory_points_decimal() {
        assert_eq!(VictoryPoints::parse(Some("2.0")), Ok(VictoryPoints::Fixed(2)));
        assert_eq!(VictoryPoints::parse(Some("-1.0")), Ok(VictoryPoints::Fixed(-1)));
        for text in ["0.5", "2.5", "1e12", "NaN"] {
            assert!(
                matches!(
                    VictoryPoints::parse(Some(text)),
                    Err(EvalError::MalformedExpression { .. })
                ),
                "{text}"
            );
        }
    }

    #[test]
    fn test_compile_reports_field() {
        let card = CardRecord::new("Broken", 5).with(CardField::ActiveBenefit, "1 dragon");
        let error = CompiledCard::compile(&card).unwrap_err();
        assert_eq!(error.field, CardField::ActiveBenefit);
        assert_eq!(
            error.source,
            EvalError::UnknownToken {
                token: "dragon".to_owned()
            }
        );
    }

    #[test]
    fn test_empty_action_is_zero() {
        assert_eq!(active(&CardRecord::new("Plain", 3), 1, 2), 0.0);
    }

    #[test]
    fn test_action_loop_past_last_generation_is_zero() {
        // the loop range 14..=13 is empty
        assert_eq!(active(&action("1 energy", "1 draw"), 14, 2), 0.0);
    }

    #[test]
    fn test_action_loop_accumulates_net_gain() {
        // generations 11, 12 and 13 each gain 4 - 3
        assert_close(active(&action("1 energy", "1 draw"), 11, 2), 3.0);
        // never pays off
        assert_eq!(active(&action("2 draw", "1 steel"), 5, 2), 0.0);
    }

    #[test]
    fn test_plant_production_benefit_is_dropped_on_last_generation() {
        // generation 12 yields PLANT over one generation plus the current one,
        // generation 13 yields nothing
        assert_close(active(&action("", "1 PLANT"), 12, 2), 2.875 * 2.0);
    }

    #[test]
    fn test_benefit_with_choice_is_kept_on_last_generation() {
        // PLANT production at income 0 is still 2.875 per step
        assert_close(active(&action("", "2 PLANT or 1 steel"), 13, 2), 5.75);
        assert_close(active(&action("", "1 PLANT or 2 steel"), 13, 2), 4.0);
    }

    #[test]
    fn test_benefit_storing_on_card_is_kept_on_last_generation() {
        let baselines = Baselines::default();
        let card = CardRecord::new("Grazers", 0)
            .with(CardField::VictoryPoints, "1 per 2 animal")
            .with(CardField::ActiveBenefit, "1 PLANT, 1 animal on card");
        let vp = baselines.context(13, 2).unwrap().credits_per_vp();
        assert_close(active(&card, 13, 2), 2.875 + 0.5 * vp);
    }

    #[test]
    fn test_cost_is_dropped_on_last_generation_for_income_dependent_benefit() {
        // a city at the last generation is worth 25 - 1, and its cost is ignored
        assert_close(active(&action("3 credit", "1 city"), 13, 2), 24.0);
        // a cost with a choice is always paid
        assert_close(active(&action("3 credit or 5 steel", "1 city"), 13, 2), 21.0);
        // STEEL: 4 - 3 at generation 11, 2 - 3 at 12, nothing at 13
        assert_close(active(&action("3 credit", "1 STEEL"), 11, 2), 1.0);
    }

    #[test]
    fn test_on_card_uses_victory_point_ratio() {
        let baselines = Baselines::default();
        let config = ValuationConfig::default();
        let valuator = FieldValuator::new(TokenEvaluator::new(&baselines, &config));
        let card = CardRecord::new("Herd", 12)
            .with(CardField::VictoryPoints, "1 per 2 animal")
            .with(CardField::ActiveBenefit, "1 animal on card");
        let card = CompiledCard::compile(&card).unwrap();

        let expected = (12..=13)
            .map(|g| 0.5 * baselines.context(g, 2).unwrap().credits_per_vp())
            .sum::<f64>();
        let context = baselines.context(12, 2).unwrap();
        assert_close(valuator.active_cost_benefit(&card, &context).unwrap(), expected);
        assert_eq!(valuator.victory_points(&card, &context), 0.0);
    }

    #[test]
    fn test_breakdown() {
        let baselines = Baselines::default();
        let config = ValuationConfig::default();
        let valuator = FieldValuator::new(TokenEvaluator::new(&baselines, &config));
        let card = CardRecord::new("Sample", 10)
            .with(CardField::AdditionalCost, "1 plant or 2 steel")
            .with(CardField::VictoryPoints, "1")
            .with(CardField::ImmediateBenefit, "2 steel")
            .with(CardField::RemovedFromOpponent, "2 heat");
        let card = CompiledCard::compile(&card).unwrap();
        let context = baselines.context(3, 2).unwrap();

        let breakdown = valuator.breakdown(&card, &context).unwrap();
        assert_eq!(breakdown.primary_cost, -10.0);
        assert_eq!(breakdown.additional_cost, -2.875);
        assert_eq!(breakdown.victory_points, context.credits_per_vp());
        assert_eq!(breakdown.immediate_benefit, 4.0);
        assert_eq!(breakdown.active, 0.0);
        assert_eq!(breakdown.removal, 3.5);
        assert_close(
            breakdown.total(),
            -10.0 - 2.875 + context.credits_per_vp() + 4.0 + 3.5,
        );
    }
}

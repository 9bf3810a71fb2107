//! Expression evaluation for a single generation.
//!
//! [`TokenEvaluator`] turns a parsed [`Expression`] into credits using the
//! resource model, the tag statistics and a [`GenerationContext`]. It holds
//! only shared references to read-only data and is cheap to copy.

use tmvalue_engine::{
    Baselines, GenerationContext, Resource,
    resource::{GREENERY, OCEAN},
};

use crate::{
    EvalError,
    config::ValuationConfig,
    expression::{Clause, Expression, PerUnit, Placement, Term},
};

/// Whether an expression is gained or paid.
///
/// The two only differ for `or` clauses: a player picks the better benefit
/// and the cheaper cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Objective {
    Benefit,
    Cost,
}

impl Objective {
    fn pick(self, left: f64, right: f64) -> f64 {
        match self {
            Objective::Benefit => left.max(right),
            Objective::Cost => left.min(right),
        }
    }
}

/// Everything an expression may depend on besides the baselines.
#[derive(Debug, Clone, Copy)]
pub struct EvalScope<'c> {
    pub context: &'c GenerationContext,
    /// Victory points scored per resource stored on the card being valued,
    /// when its victory points depend on them.
    pub vp_per_card_resource: Option<f64>,
}

impl<'c> EvalScope<'c> {
    #[must_use]
    pub fn new(context: &'c GenerationContext) -> Self {
        Self {
            context,
            vp_per_card_resource: None,
        }
    }

    #[must_use]
    pub fn with_vp_per_card_resource(self, ratio: Option<f64>) -> Self {
        Self {
            vp_per_card_resource: ratio,
            ..self
        }
    }
}

/// Evaluates expressions into credits.
///
/// # Example
///
/// ```
/// use tmvalue_engine::Baselines;
/// use tmvalue_evaluator::{
///     config::ValuationConfig,
///     expression::Expression,
///     token_evaluator::{EvalScope, Objective, TokenEvaluator},
/// };
///
/// let baselines = Baselines::default();
/// let config = ValuationConfig::default();
/// let evaluator = TokenEvaluator::new(&baselines, &config);
/// let context = baselines.context(3, 2).unwrap();
/// let scope = EvalScope::new(&context);
///
/// let expr = Expression::parse("2 steel or 1 titanium").unwrap();
/// assert_eq!(evaluator.evaluate(&expr, &scope, Objective::Benefit).unwrap(), 4.0);
/// assert_eq!(evaluator.evaluate(&expr, &scope, Objective::Cost).unwrap(), 3.0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TokenEvaluator<'a> {
    baselines: &'a Baselines,
    config: &'a ValuationConfig,
}

impl<'a> TokenEvaluator<'a> {
    #[must_use]
    pub fn new(baselines: &'a Baselines, config: &'a ValuationConfig) -> Self {
        Self { baselines, config }
    }

    #[must_use]
    pub fn baselines(&self) -> &'a Baselines {
        self.baselines
    }

    #[must_use]
    pub fn config(&self) -> &'a ValuationConfig {
        self.config
    }

    /// Sums the values of all clauses. An empty expression is worth zero.
    pub fn evaluate(
        &self,
        expression: &Expression,
        scope: &EvalScope<'_>,
        objective: Objective,
    ) -> Result<f64, EvalError> {
        expression
            .clauses()
            .iter()
            .map(|clause| self.clause_value(clause, scope, objective))
            .sum()
    }

    /// Parses and evaluates raw field text. Missing or blank text is worth zero.
    pub fn evaluate_text(
        &self,
        text: Option<&str>,
        scope: &EvalScope<'_>,
        objective: Objective,
    ) -> Result<f64, EvalError> {
        let expression = Expression::parse_opt(text)?;
        self.evaluate(&expression, scope, objective)
    }

    fn clause_value(
        &self,
        clause: &Clause,
        scope: &EvalScope<'_>,
        objective: Objective,
    ) -> Result<f64, EvalError> {
        let value = match clause {
            Clause::Term(term) => self.term_value(term, scope.context),
            Clause::Per { amount, unit } => {
                self.term_value(amount, scope.context) * self.unit_count(*unit, scope.context)
            }
            Clause::Placement { count, placement } => count * self.placement_value(*placement),
            Clause::OnCard { count, resource } => self.on_card_value(*count, resource, scope)?,
            Clause::Or(left, right) => {
                let left = self.clause_value(left, scope, objective)?;
                let right = self.clause_value(right, scope, objective)?;
                objective.pick(left, right)
            }
        };
        Ok(value)
    }

    /// Value of a counted resource or production.
    #[must_use]
    pub fn term_value(&self, term: &Term, context: &GenerationContext) -> f64 {
        term.count
            * self
                .baselines
                .resources()
                .quantity_value(term.quantity, context)
    }

    /// Expected number of units a `per` clause counts at the given generation.
    #[must_use]
    pub fn unit_count(&self, unit: PerUnit, context: &GenerationContext) -> f64 {
        let generation = context.generation();
        let last_generation = context.last_generation();
        match unit {
            PerUnit::Tag(tag) => {
                self.baselines.tags().frequency(tag).showing
                    * self.config.cards_in_play(generation, last_generation)
            }
            PerUnit::City => self.config.cities_in_play(generation, last_generation),
            PerUnit::Player => f64::from(context.player_count()),
            PerUnit::Opponent => f64::from(context.player_count()) - 1.0,
        }
    }

    /// Value of one tile placed on an unusual area.
    #[must_use]
    pub fn placement_value(&self, placement: Placement) -> f64 {
        let resources = self.baselines.resources();
        let tile_land = resources.tile_land();
        let tile_ocean = resources.tile_ocean();
        match placement {
            Placement::Special { ocean: true } => tile_ocean,
            Placement::Special { ocean: false } => tile_land,
            Placement::OceanOnLand => OCEAN + tile_land - tile_ocean,
            Placement::GreeneryOnOcean => GREENERY + tile_ocean - tile_land,
        }
    }

    fn on_card_value(
        &self,
        count: f64,
        resource: &str,
        scope: &EvalScope<'_>,
    ) -> Result<f64, EvalError> {
        if let Some(ratio) = scope.vp_per_card_resource {
            return Ok(count * ratio * scope.context.credits_per_vp());
        }
        let resource = Resource::from_name(resource).ok_or_else(|| EvalError::UnknownToken {
            token: resource.to_owned(),
        })?;
        Ok(count
            * self
                .baselines
                .resources()
                .resource_value(resource, scope.context))
    }
}

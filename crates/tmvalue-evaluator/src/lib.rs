//! Card valuation: from card table rows to a value in credits.
//!
//! This crate interprets the card mini-language on top of the economic model
//! in [`tmvalue_engine`]. It is organized in three levels:
//!
//! 1. **Token evaluation** ([`token_evaluator`]) - resolves one parsed
//!    [`expression`] into credits for a single generation.
//!
//! 2. **Field valuation** ([`field_valuator`]) - applies the rules of each card
//!    column (costs, victory points, immediate and removal effects, the
//!    recurring action loop) on top of token evaluation.
//!
//! 3. **Card valuation** ([`valuation_engine`]) - sums the fields of every card
//!    of a table for a `(generation, player count)` pair, dispatching special
//!    cases to a [`SpecialCaseResolver`](special_case::SpecialCaseResolver).
//!
//! ```text
//! ValuationEngine (one value per card, generation and player count)
//!     ↓ uses
//! FieldValuator (one value per card column)
//!     ↓ uses
//! TokenEvaluator (one value per expression)
//! ```
//!
//! All levels are pure functions of the immutable
//! [`Baselines`](tmvalue_engine::Baselines); nothing is cached between calls.
//!
//! # Example
//!
//! ```
//! use tmvalue_engine::{Baselines, CardField, CardRecord};
//! use tmvalue_evaluator::valuation_engine::ValuationEngine;
//!
//! let baselines = Baselines::default();
//! let engine = ValuationEngine::new(&baselines);
//!
//! let mine = CardRecord::new("Mine", 4).with(CardField::ImmediateBenefit, "1 STEEL");
//! let context = baselines.context(2, 2).unwrap();
//! let valuation = engine.value_card(&mine, &context).unwrap();
//!
//! // one steel production for 11 remaining generations, minus the card price
//! assert_eq!(valuation.value, 18);
//! ```
//!
//! # Errors
//!
//! Evaluation of a single card fails fast: the first unknown token or
//! malformed expression aborts that card with a [`ValuationError`] naming the
//! card, the field, the generation and the player count. Batch evaluation
//! collects these errors and carries on with the remaining cards.

use tmvalue_engine::{CardField, ContextError};

pub mod config;
pub mod expression;
pub mod field_valuator;
pub mod special_case;
pub mod token_evaluator;
pub mod valuation_engine;

/// Error raised while interpreting one expression.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum EvalError {
    #[display("unknown token '{token}'")]
    UnknownToken { token: String },
    #[display("malformed expression '{expression}': {reason}")]
    MalformedExpression { expression: String, reason: String },
    #[display("degenerate generation context")]
    DegenerateContext { source: ContextError },
    #[display("special case has no override value")]
    MissingOverride,
}

impl From<ContextError> for EvalError {
    fn from(source: ContextError) -> Self {
        Self::DegenerateContext { source }
    }
}

/// An [`EvalError`] tagged with the card column it came from.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
#[display("invalid {field}")]
pub struct FieldError {
    pub field: CardField,
    pub source: EvalError,
}

impl FieldError {
    #[must_use]
    pub fn new(field: CardField, source: EvalError) -> Self {
        Self { field, source }
    }
}

/// Failure to value one card, with everything needed to locate the problem.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
#[display("cannot value '{title}' ({field}) at generation {generation} with {player_count} players")]
pub struct ValuationError {
    pub title: String,
    pub field: CardField,
    pub generation: u32,
    pub player_count: u8,
    pub source: EvalError,
}

impl ValuationError {
    fn new(title: &str, generation: u32, player_count: u8, error: FieldError) -> Self {
        Self {
            title: title.to_owned(),
            field: error.field,
            generation,
            player_count,
            source: error.source,
        }
    }
}

//! The card expression mini-language.
//!
//! Card fields describe costs and benefits with a small, closed vocabulary:
//!
//! ```text
//! 2 plant                      two plants
//! 1 PLANT                      one plant production
//! 3 CREDIT per city            three credit production per city on Mars
//! 1 ocean or 1 steel           the better of the two
//! 1 animal on card             one animal placed on this card
//! 1 ocean land                 an ocean placed on a land area
//! 1 temp, 2 plant              two clauses, both gained
//! ```
//!
//! # Grammar
//!
//! ```text
//! Expression  := ε | Clause ("," Clause)*
//! Clause      := Alternative ("or" Alternative)*
//! Alternative := Term ("per" Unit | "on" "card")?
//! Term        := Number? Word+
//! ```
//!
//! A term with a single word names a resource or production; a term with
//! several words names a tile placement. A missing number means one.
//!
//! Text is parsed once into an [`Expression`] tree and then evaluated any
//! number of times by the [`TokenEvaluator`](crate::token_evaluator::TokenEvaluator).

use std::str::FromStr;

use tmvalue_engine::{Production, Quantity, Tag};

use crate::EvalError;

mod lexer;
mod parser;

/// A parsed card field: clauses separated by commas, all of which apply.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Expression {
    clauses: Vec<Clause>,
}

/// One comma-separated part of an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    /// `2 plant`
    Term(Term),
    /// `3 CREDIT per city`
    Per { amount: Term, unit: PerUnit },
    /// `1 ocean land`
    Placement { count: f64, placement: Placement },
    /// `1 animal on card`
    OnCard { count: f64, resource: String },
    /// `1 ocean or 1 steel`
    Or(Box<Clause>, Box<Clause>),
}

/// A counted resource or production.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Term {
    pub count: f64,
    pub quantity: Quantity,
}

/// What a `per` clause counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerUnit {
    /// Cards bearing the tag that are in play.
    Tag(Tag),
    /// Cities placed so far (`city` or `Mars_city`).
    City,
    /// Players in the game.
    Player,
    /// Opponents in the game.
    Opponent,
}

impl PerUnit {
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "city" | "Mars_city" => Some(PerUnit::City),
            "player" => Some(PerUnit::Player),
            "opponent" => Some(PerUnit::Opponent),
            _ => Tag::from_name(name).map(PerUnit::Tag),
        }
    }
}

/// Tile placement with a non-standard area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// A special tile, on an ocean area if `ocean` is set, on land otherwise.
    Special { ocean: bool },
    /// An ocean tile placed on a land area.
    OceanOnLand,
    /// A greenery tile placed on an ocean area.
    GreeneryOnOcean,
}

impl Expression {
    /// Parses an expression. Blank text yields an empty expression.
    ///
    /// # Example
    ///
    /// ```
    /// use tmvalue_evaluator::expression::{Clause, Expression, PerUnit};
    ///
    /// let expr = Expression::parse("3 CREDIT per city, 1 ocean or 2 steel").unwrap();
    /// assert_eq!(expr.clauses().len(), 2);
    /// assert!(matches!(expr.clauses()[0], Clause::Per { unit: PerUnit::City, .. }));
    /// assert!(expr.has_or());
    ///
    /// assert!(Expression::parse("2 unobtainium").is_err());
    /// assert!(Expression::parse("").unwrap().is_empty());
    /// ```
    pub fn parse(text: &str) -> Result<Self, EvalError> {
        parser::parse(text)
    }

    /// Parses an optional field; `None` yields an empty expression.
    pub fn parse_opt(text: Option<&str>) -> Result<Self, EvalError> {
        text.map_or_else(|| Ok(Self::default()), Self::parse)
    }

    #[must_use]
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Returns `true` if any clause offers a choice.
    #[must_use]
    pub fn has_or(&self) -> bool {
        self.clauses.iter().any(|c| matches!(c, Clause::Or(..)))
    }

    /// Returns `true` if any clause puts resources on the card itself.
    #[must_use]
    pub fn has_on_card(&self) -> bool {
        self.clauses.iter().any(Clause::has_on_card)
    }

    /// Returns `true` if any counted quantity satisfies `pred`.
    pub fn references<F>(&self, pred: F) -> bool
    where
        F: Fn(Quantity) -> bool,
    {
        self.clauses.iter().any(|c| c.references(&pred))
    }

    /// Returns `true` if the value depends on the number of remaining generations.
    #[must_use]
    pub fn is_income_dependent(&self) -> bool {
        self.references(Quantity::is_income_dependent)
    }

    /// Returns `true` if any of the given productions is counted.
    #[must_use]
    pub fn references_production(&self, productions: &[Production]) -> bool {
        self.references(|q| matches!(q, Quantity::Production(p) if productions.contains(&p)))
    }
}

impl FromStr for Expression {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Clause {
    fn has_on_card(&self) -> bool {
        match self {
            Clause::OnCard { .. } => true,
            Clause::Or(left, right) => left.has_on_card() || right.has_on_card(),
            Clause::Term(_) | Clause::Per { .. } | Clause::Placement { .. } => false,
        }
    }

    fn references<F>(&self, pred: &F) -> bool
    where
        F: Fn(Quantity) -> bool,
    {
        match self {
            Clause::Term(term) | Clause::Per { amount: term, .. } => pred(term.quantity),
            Clause::Or(left, right) => left.references(pred) || right.references(pred),
            Clause::Placement { .. } | Clause::OnCard { .. } => false,
        }
    }
}

//! Cards whose value cannot be derived from their columns.
//!
//! Some cards have effects the mini-language cannot describe. Their titles
//! are handed to a [`SpecialCaseResolver`], and the generic column sum is
//! never computed for them.

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};
use tmvalue_engine::{CardRecord, GenerationContext};

use crate::{
    EvalError,
    expression::Expression,
    token_evaluator::{EvalScope, Objective, TokenEvaluator},
};

/// Supplies values for special-case cards.
pub trait SpecialCaseResolver: fmt::Debug + Send + Sync {
    /// Returns `true` if `title` bypasses the generic valuation.
    fn is_special(&self, title: &str) -> bool;

    /// Values a special card, before rounding.
    fn resolve(
        &self,
        card: &CardRecord,
        context: &GenerationContext,
        evaluator: &TokenEvaluator<'_>,
    ) -> Result<f64, EvalError>;
}

/// Resolver without any special case.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSpecialCases;

impl SpecialCaseResolver for NoSpecialCases {
    fn is_special(&self, _title: &str) -> bool {
        false
    }

    fn resolve(
        &self,
        _card: &CardRecord,
        _context: &GenerationContext,
        _evaluator: &TokenEvaluator<'_>,
    ) -> Result<f64, EvalError> {
        Err(EvalError::MissingOverride)
    }
}

/// Override value of one card: a fixed amount plus an optional expression
/// evaluated as a benefit in the current generation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpecialCase {
    pub credits: f64,
    pub expression: Option<String>,
}

/// Error found while checking a [`SpecialCaseTable`].
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
#[display("invalid special case '{title}'")]
pub struct SpecialCaseError {
    pub title: String,
    pub source: EvalError,
}

/// Special cases keyed by card title, usually loaded from JSON.
///
/// # Example
///
/// ```
/// use tmvalue_engine::{Baselines, CardRecord};
/// use tmvalue_evaluator::{
///     config::ValuationConfig,
///     special_case::{SpecialCaseResolver, SpecialCaseTable},
///     token_evaluator::TokenEvaluator,
/// };
///
/// let json = r#"{ "Business Network": { "credits": -3, "expression": "1 draw" } }"#;
/// let table: SpecialCaseTable = serde_json::from_str(json).unwrap();
/// table.validate().unwrap();
///
/// let baselines = Baselines::default();
/// let config = ValuationConfig::default();
/// let evaluator = TokenEvaluator::new(&baselines, &config);
/// let context = baselines.context(2, 2).unwrap();
/// let card = CardRecord::new("Business Network", 4);
///
/// assert!(table.is_special("Business Network"));
/// assert_eq!(table.resolve(&card, &context, &evaluator).unwrap(), 1.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpecialCaseTable {
    cases: BTreeMap<String, SpecialCase>,
}

impl FromIterator<(String, SpecialCase)> for SpecialCaseTable {
    fn from_iter<T: IntoIterator<Item = (String, SpecialCase)>>(iter: T) -> Self {
        Self {
            cases: iter.into_iter().collect(),
        }
    }
}

impl SpecialCaseTable {
    pub fn insert(&mut self, title: impl Into<String>, case: SpecialCase) {
        self.cases.insert(title.into(), case);
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.cases.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Checks that every expression parses.
    pub fn validate(&self) -> Result<(), SpecialCaseError> {
        for (title, case) in &self.cases {
            Expression::parse_opt(case.expression.as_deref()).map_err(|source| {
                SpecialCaseError {
                    title: title.clone(),
                    source,
                }
            })?;
        }
        Ok(())
    }
}

impl SpecialCaseResolver for SpecialCaseTable {
    fn is_special(&self, title: &str) -> bool {
        self.cases.contains_key(title)
    }

    fn resolve(
        &self,
        card: &CardRecord,
        context: &GenerationContext,
        evaluator: &TokenEvaluator<'_>,
    ) -> Result<f64, EvalError> {
        let case = self
            .cases
            .get(&card.title)
            .ok_or(EvalError::MissingOverride)?;
        let scope = EvalScope::new(context);
        let value =
            evaluator.evaluate_text(case.expression.as_deref(), &scope, Objective::Benefit)?;
        Ok(case.credits + value)
    }
}

#[cfg(test)]
mod tests {
    use tmvalue_engine::Baselines;

    use super::*;
    use crate::config::ValuationConfig;

    #[test]
    fn test_no_special_cases() {
        let baselines = Baselines::default();
        let config = ValuationConfig::default();
        let evaluator = TokenEvaluator::new(&baselines, &config);
        let context = baselines.context(1, 3).unwrap();
        assert!(!NoSpecialCases.is_special("Anything"));
        assert_eq!(
            NoSpecialCases.resolve(&CardRecord::new("Anything", 1), &context, &evaluator),
            Err(EvalError::MissingOverride)
        );
    }

    #[test]
    fn test_expression_uses_current_generation() {
        let mut table = SpecialCaseTable::default();
        table.insert(
            "Late Bloomer",
            SpecialCase {
                credits: 0.0,
                expression: Some("1 CREDIT".to_owned()),
            },
        );
        let baselines = Baselines::default();
        let config = ValuationConfig::default();
        let evaluator = TokenEvaluator::new(&baselines, &config);
        let card = CardRecord::new("Late Bloomer", 0);

        let early = baselines.context(3, 2).unwrap();
        let late = baselines.context(12, 2).unwrap();
        assert_eq!(table.resolve(&card, &early, &evaluator), Ok(11.0));
        assert_eq!(table.resolve(&card, &late, &evaluator), Ok(2.0));

        let stranger = CardRecord::new("Stranger", 0);
        assert_eq!(
            table.resolve(&stranger, &early, &evaluator),
            Err(EvalError::MissingOverride)
        );
    }

    #[test]
    fn test_validate_reports_title() {
        let table = [(
            "Bad".to_owned(),
            SpecialCase {
                credits: 1.0,
                expression: Some("1 wish".to_owned()),
            },
        )]
        .into_iter()
        .collect::<SpecialCaseTable>();
        let error = table.validate().unwrap_err();
        assert_eq!(error.title, "Bad");
        assert_eq!(table.titles().collect::<Vec<_>>(), ["Bad"]);
    }

    #[test]
    fn test_json_defaults() {
        let table: SpecialCaseTable =
            serde_json::from_str(r#"{"Fixed": {"credits": 5}, "Free": {}}"#).unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.is_special("Free"));
        assert!(serde_json::from_str::<SpecialCaseTable>(r#"{"X": {"credit": 5}}"#).is_err());
    }
}

use tmvalue_engine::Quantity;

use super::{
    Clause, Expression, PerUnit, Placement, Term,
    lexer::{self, Token},
};
use crate::EvalError;

const PLACEMENT_WORDS: [&str; 4] = ["special", "land", "ocean", "greenery"];

pub(super) fn parse(text: &str) -> Result<Expression, EvalError> {
    let mut parser = Parser {
        text,
        tokens: lexer::tokenize(text),
        pos: 0,
    };
    parser.parse_expression()
}

#[derive(Debug)]
struct Parser<'a> {
    text: &'a str,
    tokens: Vec<Token<'a>>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn malformed(&self, reason: impl Into<String>) -> EvalError {
        EvalError::MalformedExpression {
            expression: self.text.trim().to_owned(),
            reason: reason.into(),
        }
    }

    fn peek(&self) -> Option<Token<'a>> {
        self.tokens.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<Token<'a>> {
        let token = self.peek()?;
        self.pos += 1;
        Some(token)
    }

    fn eat(&mut self, expected: Token<'a>) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            return true;
        }
        false
    }

    fn parse_expression(&mut self) -> Result<Expression, EvalError> {
        let mut clauses = vec![];
        if self.tokens.is_empty() {
            return Ok(Expression { clauses });
        }
        loop {
            clauses.push(self.parse_clause()?);
            match self.bump() {
                None => break,
                Some(Token::Comma) => {}
                Some(token) => return Err(self.malformed(format!("unexpected '{token}'"))),
            }
        }
        Ok(Expression { clauses })
    }

    fn parse_clause(&mut self) -> Result<Clause, EvalError> {
        let first = self.parse_alternative()?;
        if self.eat(Token::Or) {
            let rest = self.parse_clause()?;
            return Ok(Clause::Or(Box::new(first), Box::new(rest)));
        }
        Ok(first)
    }

    fn parse_alternative(&mut self) -> Result<Clause, EvalError> {
        let count = match self.peek() {
            Some(Token::Number(n)) => {
                self.pos += 1;
                n
            }
            _ => 1.0,
        };

        let mut words = vec![];
        while let Some(Token::Word(word)) = self.peek() {
            words.push(word);
            self.pos += 1;
        }
        if words.is_empty() {
            let found = self
                .peek()
                .map_or_else(|| "end of clause".to_owned(), |t| format!("'{t}'"));
            return Err(self.malformed(format!("expected a name, found {found}")));
        }

        if self.eat(Token::Per) {
            let amount = self.literal(count, &words)?;
            let Some(Token::Word(unit)) = self.bump() else {
                return Err(self.malformed("expected a unit after 'per'"));
            };
            let unit = PerUnit::from_name(unit).ok_or_else(|| unknown(unit))?;
            return Ok(Clause::Per { amount, unit });
        }

        if self.eat(Token::On) {
            if !self.eat(Token::Card) {
                return Err(self.malformed("expected 'card' after 'on'"));
            }
            let [resource] = words.as_slice() else {
                return Err(self.malformed("'on card' takes a single resource"));
            };
            return Ok(Clause::OnCard {
                count,
                resource: (*resource).to_owned(),
            });
        }

        if let [name] = words.as_slice()
            && let Some(quantity) = Quantity::from_name(name)
        {
            return Ok(Clause::Term(Term { count, quantity }));
        }
        let placement = self.placement(&words)?;
        Ok(Clause::Placement { count, placement })
    }

    fn literal(&self, count: f64, words: &[&str]) -> Result<Term, EvalError> {
        let [name] = words else {
            return Err(self.malformed(format!("'{}' is not a single name", words.join(" "))));
        };
        let quantity = Quantity::from_name(name).ok_or_else(|| unknown(name))?;
        Ok(Term { count, quantity })
    }

    fn placement(&self, words: &[&str]) -> Result<Placement, EvalError> {
        for word in words {
            if PLACEMENT_WORDS.iter().any(|w| w == word) {
                continue;
            }
            if Quantity::from_name(word).is_some() {
                return Err(self.malformed(format!(
                    "'{}' does not name a tile placement",
                    words.join(" ")
                )));
            }
            return Err(unknown(word));
        }

        let has = |name: &str| words.iter().any(|w| *w == name);
        if has("land") && has("ocean") {
            return Ok(Placement::OceanOnLand);
        }
        if has("ocean") && has("greenery") {
            return Ok(Placement::GreeneryOnOcean);
        }
        if has("special") {
            return Ok(Placement::Special {
                ocean: has("ocean"),
            });
        }
        Err(self.malformed(format!(
            "'{}' does not name a tile placement",
            words.join(" ")
        )))
    }
}

fn unknown(token: &str) -> EvalError {
    EvalError::UnknownToken {
        token: token.to_owned(),
    }
}

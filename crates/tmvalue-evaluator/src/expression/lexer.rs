use std::fmt;

/// Lexical unit of a card expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Token<'a> {
    Number(f64),
    Word(&'a str),
    Or,
    Per,
    On,
    Card,
    Comma,
}

impl<'a> Token<'a> {
    fn from_word(word: &'a str) -> Self {
        match word {
            "or" => Token::Or,
            "per" => Token::Per,
            "on" => Token::On,
            "card" => Token::Card,
            _ => parse_number(word).map_or(Token::Word(word), Token::Number),
        }
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{n}"),
            Token::Word(w) => f.write_str(w),
            Token::Or => f.write_str("or"),
            Token::Per => f.write_str("per"),
            Token::On => f.write_str("on"),
            Token::Card => f.write_str("card"),
            Token::Comma => f.write_str(","),
        }
    }
}

// `str::parse::<f64>` also accepts words such as "inf" and "NaN".
fn parse_number(word: &str) -> Option<f64> {
    let first = word.chars().next()?;
    if !(first.is_ascii_digit() || matches!(first, '-' | '+' | '.')) {
        return None;
    }
    word.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Splits an expression into tokens. Commas separate clauses; everything
/// else is separated by whitespace.
pub(crate) fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = vec![];
    for (i, chunk) in text.split(',').enumerate() {
        if i > 0 {
            tokens.push(Token::Comma);
        }
        tokens.extend(chunk.split_whitespace().map(Token::from_word));
    }
    tokens
}

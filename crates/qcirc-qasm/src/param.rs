//! Parameter expressions: plain decimals and multiples of π.
//!
//! Two forms are accepted, tried in order:
//!
//! 1. a signed decimal, optionally with an exponent (`-0.5`, `1e-3`);
//! 2. a π-expression `[-][coefficient][*]pi[/denominator]`, valued
//!    `±coefficient · π / denominator`. `pi` is case-insensitive and the
//!    parts may be separated by whitespace.
//!
//! Formatting prefers a small table of common π fractions and otherwise
//! prints the shortest decimal that reads back to the same value.

use std::f64::consts::PI;

use crate::error::ParamError;
use crate::lexer::{Token, tokenize};

/// Absolute tolerance when matching a value against the π table.
const PI_TOLERANCE: f64 = 1e-10;

/// Common π fractions, in lookup order.
const PI_FRACTIONS: [(f64, &str); 10] = [
    (2.0 * PI, "2*pi"),
    (PI, "pi"),
    (PI / 2.0, "pi/2"),
    (PI / 3.0, "pi/3"),
    (PI / 4.0, "pi/4"),
    (PI / 6.0, "pi/6"),
    (PI / 8.0, "pi/8"),
    (3.0 * PI / 4.0, "3*pi/4"),
    (3.0 * PI / 2.0, "3*pi/2"),
    (2.0 * PI / 3.0, "2*pi/3"),
];

/// Parse a single parameter token.
pub fn parse_param(source: &str) -> Result<f64, ParamError> {
    let mut tokens = Vec::new();
    for result in tokenize(source) {
        match result {
            Ok(t) => tokens.push(t.token),
            Err((span, _)) => {
                return Err(ParamError::InvalidToken(source[span].to_string()));
            }
        }
    }
    eval_tokens(&tokens)
}

/// Parse a comma-separated parameter list.
///
/// Empty entries are skipped. One bad entry rejects the whole list.
pub fn parse_param_list(source: &str) -> Result<Vec<f64>, ParamError> {
    source
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(parse_param)
        .collect()
}

/// Evaluate the tokens of one parameter.
pub(crate) fn eval_tokens(tokens: &[Token]) -> Result<f64, ParamError> {
    if tokens.is_empty() {
        return Err(ParamError::Empty);
    }

    let (sign, rest) = match tokens {
        [Token::Minus, rest @ ..] => (-1.0, rest),
        _ => (1.0, tokens),
    };

    if let [number] = rest {
        if let Some(value) = literal(number) {
            return Ok(sign * value);
        }
    }

    match eval_pi(rest) {
        Some(result) => result.map(|v| sign * v),
        None => Err(malformed(tokens)),
    }
}

/// `[coefficient][*]pi[/denominator]`.
fn eval_pi(tokens: &[Token]) -> Option<Result<f64, ParamError>> {
    let pi_pos = tokens.iter().position(|t| *t == Token::Pi)?;
    let (before, after) = (&tokens[..pi_pos], &tokens[pi_pos + 1..]);

    let coefficient = match before {
        [] | [Token::Star] => 1.0,
        [number] | [number, Token::Star] => literal(number)?,
        _ => return None,
    };

    let denominator = match after {
        [] => 1.0,
        [Token::Slash, number] => literal(number)?,
        _ => return None,
    };

    if denominator == 0.0 {
        return Some(Err(ParamError::ZeroDenominator));
    }
    Some(Ok(coefficient * PI / denominator))
}

fn literal(token: &Token) -> Option<f64> {
    match token {
        #[allow(clippy::cast_precision_loss)]
        Token::IntLiteral(v) => Some(*v as f64),
        Token::FloatLiteral(v) => Some(*v),
        _ => None,
    }
}

fn malformed(tokens: &[Token]) -> ParamError {
    let text: Vec<String> = tokens.iter().map(ToString::to_string).collect();
    ParamError::Malformed(text.join(" "))
}

/// Format a value for output.
pub fn format_param(value: f64) -> String {
    if !value.is_finite() || value == 0.0 {
        return "0".to_string();
    }
    for (fraction, symbol) in PI_FRACTIONS {
        if (value - fraction).abs() < PI_TOLERANCE {
            return symbol.to_string();
        }
        if (value + fraction).abs() < PI_TOLERANCE {
            return format!("-{symbol}");
        }
    }
    // Shortest round-trip digits; Debug uses an exponent outside [1e-4, 1e16).
    let magnitude = value.abs();
    if (1e-4..1e16).contains(&magnitude) {
        format!("{value}")
    } else {
        format!("{value:?}")
    }
}

/// Format a parameter list as `p0, p1, ...`.
pub fn format_params(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| format_param(*v))
        .collect::<Vec<_>>()
        .join(", ")
}

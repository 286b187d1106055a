//! Line parser for the `OpenQASM` 2.0 dialect.
//!
//! Every source line is parsed on its own. Dispatch is driven by the first
//! token, so the grammar's priority order is structural: keyword statements
//! (`reset`, `barrier`, `measure`, `if`) are recognized before a gate
//! application is attempted, and gate applications are classified by operand
//! count during lowering.

mod statement;

use crate::ast::{NoiseAnnotation, Statement};
use crate::error::{ParseError, ParseResult};
use crate::lexer::{SpannedToken, Token, tokenize};

/// Parse one line. Returns `Ok(None)` for blank and comment-only lines.
pub fn parse_line(source: &str, line: usize) -> ParseResult<Option<Statement>> {
    let mut parser = Parser::new(source, line)?;
    if parser.is_eof() {
        return Ok(None);
    }
    let statement = parser.parse_statement()?;
    parser.expect_eol()?;
    Ok(Some(statement))
}

/// Parse the text following `//` as a noise annotation.
///
/// Comments that do not start with the word `noise` yield
/// [`ParseError::NotNoise`].
pub fn parse_noise_comment(comment: &str, line: usize) -> ParseResult<NoiseAnnotation> {
    let mut parser = Parser::new(comment, line)?;
    match parser.peek() {
        Some(Token::Identifier(word)) if word == "noise" => {}
        _ => return Err(ParseError::NotNoise),
    }
    parser.advance();
    let annotation = parser.parse_noise()?;
    parser.expect_eol()?;
    Ok(annotation)
}

/// Parser state for one line.
pub(crate) struct Parser {
    pub(crate) tokens: Vec<SpannedToken>,
    pub(crate) pos: usize,
    pub(crate) line: usize,
}

impl Parser {
    /// Create a parser over one line of source.
    fn new(source: &str, line: usize) -> ParseResult<Self> {
        let mut tokens = Vec::new();

        for result in tokenize(source) {
            match result {
                Ok(t) => tokens.push(t),
                Err((span, msg)) => {
                    return Err(ParseError::LexerError {
                        position: span.start,
                        message: msg,
                    });
                }
            }
        }

        Ok(Self {
            tokens,
            pos: 0,
            line,
        })
    }

    /// Check if we've reached the end of the line.
    pub(crate) fn is_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Peek at the current token.
    pub(crate) fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    /// Advance and return the current token.
    pub(crate) fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos)?.token.clone();
        self.pos += 1;
        Some(token)
    }

    /// Expect a specific token.
    #[allow(clippy::needless_pass_by_value)]
    pub(crate) fn expect(&mut self, expected: Token) -> ParseResult<()> {
        let found = self.advance().ok_or_else(|| ParseError::UnexpectedEol {
            line: self.line,
            expected: format!("expected {expected}"),
        })?;

        if std::mem::discriminant(&found) != std::mem::discriminant(&expected) {
            return Err(self.unexpected(&expected.to_string(), &found));
        }
        Ok(())
    }

    /// Check if current token matches.
    pub(crate) fn check(&self, token: &Token) -> bool {
        self.peek()
            .is_some_and(|t| std::mem::discriminant(t) == std::mem::discriminant(token))
    }

    /// Consume token if it matches.
    pub(crate) fn consume(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Accept an optional `;` and require the line to end.
    pub(crate) fn expect_eol(&mut self) -> ParseResult<()> {
        self.consume(&Token::Semicolon);
        match self.advance() {
            None => Ok(()),
            Some(extra) => Err(self.unexpected("end of line", &extra)),
        }
    }

    pub(crate) fn unexpected(&self, expected: &str, found: &Token) -> ParseError {
        ParseError::UnexpectedToken {
            line: self.line,
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }
}

//! Statement parsing.

use super::Parser;
use crate::ast::{Application, NoiseAnnotation, RegRef, Statement};
use crate::error::{ParseError, ParseResult};
use crate::lexer::Token;
use crate::param::eval_tokens;

impl Parser {
    /// Parse a statement.
    pub(super) fn parse_statement(&mut self) -> ParseResult<Statement> {
        let token = self.peek().cloned().ok_or_else(|| ParseError::UnexpectedEol {
            line: self.line,
            expected: "statement".into(),
        })?;

        match token {
            Token::OpenQasm => self.parse_version(),
            Token::Include => self.parse_include(),
            Token::QReg | Token::CReg => self.parse_register_decl(),
            Token::Reset => self.parse_reset(),
            Token::Barrier => self.parse_barrier(),
            Token::Measure => self.parse_measure(),
            Token::If => self.parse_if(),
            Token::Identifier(_) => Ok(Statement::Apply(self.parse_application()?)),
            other => Err(self.unexpected("statement", &other)),
        }
    }

    /// Parse `OPENQASM <version>`.
    fn parse_version(&mut self) -> ParseResult<Statement> {
        self.expect(Token::OpenQasm)?;
        match self.advance() {
            Some(Token::FloatLiteral(v)) => Ok(Statement::Version(format!("{v:?}"))),
            Some(Token::IntLiteral(v)) => Ok(Statement::Version(v.to_string())),
            Some(other) => Err(self.unexpected("version number", &other)),
            None => Err(self.eol("version number")),
        }
    }

    /// Parse `include "<file>"`.
    fn parse_include(&mut self) -> ParseResult<Statement> {
        self.expect(Token::Include)?;
        match self.advance() {
            Some(Token::StringLiteral(path)) => Ok(Statement::Include(path)),
            Some(other) => Err(self.unexpected("string literal", &other)),
            None => Err(self.eol("include path")),
        }
    }

    /// Parse `qreg name[size]` or `creg name[size]`.
    fn parse_register_decl(&mut self) -> ParseResult<Statement> {
        let quantum = self.check(&Token::QReg);
        self.advance();

        let name = self.parse_identifier()?;
        self.expect(Token::LBracket)?;
        let size = self.parse_index()?;
        self.expect(Token::RBracket)?;

        if quantum {
            Ok(Statement::QReg { name, size })
        } else {
            Ok(Statement::CReg { name, size })
        }
    }

    /// Parse `reset <qubit>`.
    fn parse_reset(&mut self) -> ParseResult<Statement> {
        self.expect(Token::Reset)?;
        Ok(Statement::Reset(self.parse_reg_ref()?))
    }

    /// Parse `barrier [<qubit>, ...]`.
    fn parse_barrier(&mut self) -> ParseResult<Statement> {
        self.expect(Token::Barrier)?;
        let operands = if self.check(&Token::Identifier(String::new())) {
            self.parse_operands()?
        } else {
            Vec::new()
        };
        Ok(Statement::Barrier(operands))
    }

    /// Parse `measure <qubit> -> <bit>`.
    fn parse_measure(&mut self) -> ParseResult<Statement> {
        self.expect(Token::Measure)?;
        let qubit = self.parse_reg_ref()?;
        self.expect(Token::Arrow)?;
        let bit = self.parse_reg_ref()?;
        Ok(Statement::Measure { qubit, bit })
    }

    /// Parse `if (<bit>==<value>) <application>`.
    fn parse_if(&mut self) -> ParseResult<Statement> {
        self.expect(Token::If)?;
        self.expect(Token::LParen)?;
        let bit = self.parse_reg_ref()?;
        self.expect(Token::EqEq)?;
        let value = self.parse_int()?;
        self.expect(Token::RParen)?;
        let apply = self.parse_application()?;
        Ok(Statement::Conditional { bit, value, apply })
    }

    /// Parse `name[(params)] operand, ...`.
    fn parse_application(&mut self) -> ParseResult<Application> {
        let name = self.parse_identifier()?;
        let params = if self.check(&Token::LParen) {
            Some(self.parse_params()?)
        } else {
            None
        };
        let operands = self.parse_operands()?;
        Ok(Application {
            name,
            params,
            operands,
        })
    }

    /// Parse a parenthesized, comma-separated parameter list.
    ///
    /// Empty entries are skipped; one bad entry fails the list.
    fn parse_params(&mut self) -> ParseResult<Vec<f64>> {
        self.expect(Token::LParen)?;

        let mut values = Vec::new();
        let mut current: Vec<Token> = Vec::new();
        loop {
            match self.advance() {
                Some(Token::RParen) => break,
                Some(Token::Comma) => {
                    if !current.is_empty() {
                        values.push(eval_tokens(&current)?);
                        current.clear();
                    }
                }
                Some(Token::LParen) => {
                    return Err(self.unexpected("parameter", &Token::LParen));
                }
                Some(token) => current.push(token),
                None => return Err(self.eol("closing parenthesis")),
            }
        }
        if !current.is_empty() {
            values.push(eval_tokens(&current)?);
        }
        Ok(values)
    }

    /// Parse the noise annotation body following the `noise` keyword.
    pub(super) fn parse_noise(&mut self) -> ParseResult<NoiseAnnotation> {
        let channel = self.parse_identifier()?;
        let qubit = self.parse_reg_ref()?;

        let has_param = matches!(self.peek(), Some(Token::Identifier(word)) if word == "param");
        let param = if has_param {
            self.advance();
            self.expect(Token::Eq)?;
            let rest: Vec<Token> = std::iter::from_fn(|| self.advance()).collect();
            Some(eval_tokens(&rest)?)
        } else {
            None
        };

        Ok(NoiseAnnotation {
            channel,
            qubit,
            param,
        })
    }

    /// Parse one or more comma-separated register references.
    fn parse_operands(&mut self) -> ParseResult<Vec<RegRef>> {
        let mut operands = vec![self.parse_reg_ref()?];
        while self.consume(&Token::Comma) {
            operands.push(self.parse_reg_ref()?);
        }
        Ok(operands)
    }

    /// Parse `name` or `name[index]`.
    fn parse_reg_ref(&mut self) -> ParseResult<RegRef> {
        let register = self.parse_identifier()?;
        let index = if self.consume(&Token::LBracket) {
            let index = self.parse_index()?;
            self.expect(Token::RBracket)?;
            Some(index)
        } else {
            None
        };
        Ok(RegRef { register, index })
    }

    /// Parse an identifier.
    fn parse_identifier(&mut self) -> ParseResult<String> {
        match self.advance() {
            Some(Token::Identifier(name)) => Ok(name),
            Some(other) => Err(self.unexpected("identifier", &other)),
            None => Err(self.eol("identifier")),
        }
    }

    /// Parse an integer literal.
    fn parse_int(&mut self) -> ParseResult<u64> {
        match self.advance() {
            Some(Token::IntLiteral(v)) => Ok(v),
            Some(other) => Err(self.unexpected("integer", &other)),
            None => Err(self.eol("integer")),
        }
    }

    /// Parse an integer that fits the flat index space.
    fn parse_index(&mut self) -> ParseResult<u32> {
        let value = self.parse_int()?;
        u32::try_from(value).map_err(|_| ParseError::IndexOutOfRange(value))
    }

    fn eol(&self, expected: &str) -> ParseError {
        ParseError::UnexpectedEol {
            line: self.line,
            expected: expected.to_string(),
        }
    }
}

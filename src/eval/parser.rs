use super::{error::*, functions::FunctionRegistry, lexer::*};
use crate::common::{Float, Int};
use crate::roll::Number;
use logos_iter::LogosIter;

type EResult<T = Number> = Result<T, ExpressionError>;

/// Evaluates while it parses: every rule returns the value of what it read.
pub(crate) struct Parser<'a, 'f> {
    lexer: Lexer<'a>,
    len: usize,
    functions: Option<&'f FunctionRegistry>,
    allow_floats: bool,
}

fn division_by_zero(span: std::ops::Range<usize>) -> ExpressionError {
    ExpressionError {
        kind: ExpressionErrorKind::DivisionByZero,
        span,
        slice: "/".to_string(),
    }
}

impl<'a, 'f> Parser<'a, 'f> {
    const ATOM_START: &'static [TokenKind] = &[
        TokenKind::LeftParen,
        TokenKind::Integer,
        TokenKind::Minus,
        TokenKind::Identifier,
    ];

    pub fn new(s: &'a str, functions: Option<&'f FunctionRegistry>, allow_floats: bool) -> Self {
        Self {
            lexer: lexer(s),
            len: s.len(),
            functions,
            allow_floats,
        }
    }

    pub fn parse(mut self) -> EResult {
        let value = self.parse_addition()?;
        match self.advance() {
            None => Ok(value),
            Some(TokenKind::RightParen) => self.error(ExpressionErrorKind::UnmatchedParenthesis),
            Some(_) => self.error(ExpressionErrorKind::TrailingInput),
        }
    }

    fn advance(&mut self) -> Option<TokenKind> {
        self.lexer.next()
    }

    fn matches(&mut self, kind: TokenKind) -> bool {
        self.lexer.peek().map_or(false, |&peeked| peeked == kind)
    }

    fn matches_any(&mut self, options: &[TokenKind]) -> bool {
        self.lexer
            .peek()
            .map_or(false, |peeked| options.contains(peeked))
    }

    fn at_end(&mut self) -> bool {
        self.lexer.peek().is_none()
    }

    fn consume(&mut self, expected: TokenKind) -> EResult<()> {
        if self.matches(expected) {
            self.advance();
            Ok(())
        } else {
            self.unexpected_token(&[expected])
        }
    }

    /// Reports `kind` at the token consumed last.
    fn error<T>(&mut self, kind: ExpressionErrorKind) -> EResult<T> {
        Err(ExpressionError {
            kind,
            span: self.lexer.span(),
            slice: self.lexer.slice().to_string(),
        })
    }

    fn error_at_end<T>(&self, kind: ExpressionErrorKind) -> EResult<T> {
        Err(ExpressionError {
            kind,
            span: self.len..self.len,
            slice: String::new(),
        })
    }

    fn unexpected_token<T>(&mut self, expected: &[TokenKind]) -> EResult<T> {
        let expected = expected.iter().map(TokenKind::as_str).collect();
        match self.advance() {
            None => self.error_at_end(ExpressionErrorKind::UnexpectedEnd { expected }),
            Some(_) => self.error(ExpressionErrorKind::UnexpectedToken { expected }),
        }
    }

    fn parse_addition(&mut self) -> EResult {
        let mut lhs = self.parse_multiplication()?;

        while self.matches_any(TokenKind::ADDITION_OPS) {
            let op = self.advance();
            let rhs = self.parse_multiplication()?;

            lhs = if op == Some(TokenKind::Minus) {
                lhs - rhs
            } else {
                lhs + rhs
            };
        }

        Ok(lhs)
    }

    /// Multiplies out the whole chain and divides once at the end, so
    /// `1/3*3` stays exactly 1.
    fn parse_multiplication(&mut self) -> EResult {
        let mut numerator = self.parse_unary()?;
        let mut denominator = Number::ONE;
        let mut last_division = None;

        while self.matches_any(TokenKind::MULTIPLICATION_OPS) {
            let op = self.advance();
            let span = self.lexer.span();
            let rhs = self.parse_unary()?;

            if op == Some(TokenKind::Slash) {
                if rhs.is_zero() {
                    return Err(division_by_zero(span));
                }
                denominator = denominator * rhs;
                last_division = Some(span);
            } else {
                numerator = numerator * rhs;
            }
        }

        let Some(span) = last_division else {
            return Ok(numerator);
        };
        // A product of tiny divisors can still underflow to zero.
        let quotient = numerator.quotient(denominator);
        if denominator.is_zero() || (numerator.is_finite() && !quotient.is_finite()) {
            return Err(division_by_zero(span));
        }
        Ok(quotient)
    }

    fn parse_unary(&mut self) -> EResult {
        if self.matches(TokenKind::Minus) {
            self.advance();
            Ok(-self.parse_unary()?)
        } else {
            self.parse_atom()
        }
    }

    fn parse_atom(&mut self) -> EResult {
        match self.lexer.peek() {
            Some(TokenKind::LeftParen) => self.parse_parenthesized(),
            Some(TokenKind::Integer) => self.parse_integer(),
            Some(TokenKind::Decimal) => self.parse_decimal(),
            Some(TokenKind::Identifier) => self.parse_call(),
            _ => self.unexpected_token(Self::ATOM_START),
        }
    }

    fn parse_parenthesized(&mut self) -> EResult {
        self.consume(TokenKind::LeftParen)?;
        let open = self.lexer.span();
        let value = self.parse_addition()?;
        self.close_parenthesis(open, &[TokenKind::RightParen])?;
        Ok(value)
    }

    fn close_parenthesis(&mut self, open: std::ops::Range<usize>, expected: &[TokenKind]) -> EResult<()> {
        if self.matches(TokenKind::RightParen) {
            self.advance();
            Ok(())
        } else if self.at_end() {
            Err(ExpressionError {
                kind: ExpressionErrorKind::UnclosedParenthesis,
                span: open,
                slice: "(".to_string(),
            })
        } else {
            self.unexpected_token(expected)
        }
    }

    fn parse_integer(&mut self) -> EResult {
        self.advance();
        let slice = self.lexer.slice();
        // too large for an integer: carry on in floating point
        Ok(match slice.parse::<Int>() {
            Ok(x) => Number::Int(x),
            Err(_) => Number::Float(slice.parse::<Float>().unwrap_or(Float::INFINITY)),
        })
    }

    fn parse_decimal(&mut self) -> EResult {
        self.advance();
        if !self.allow_floats {
            return self.error(ExpressionErrorKind::FloatsDisabled);
        }
        let parsed = self.lexer.slice().parse::<Float>();
        match parsed {
            Ok(x) => Ok(Number::Float(x)),
            Err(_) => self.error(ExpressionErrorKind::UnexpectedToken {
                expected: vec![TokenKind::Decimal.as_str()],
            }),
        }
    }

    fn parse_call(&mut self) -> EResult {
        self.advance();
        let name = self.lexer.slice().to_string();
        let name_span = self.lexer.span();

        let function = match self.functions.and_then(|registry| registry.get(&name)) {
            Some(function) => *function,
            None => return self.error(ExpressionErrorKind::UnknownFunction(name)),
        };

        self.consume(TokenKind::LeftParen)?;
        let open = self.lexer.span();
        let mut args = vec![self.parse_addition()?];
        while self.matches(TokenKind::Comma) {
            self.advance();
            args.push(self.parse_addition()?);
        }
        self.close_parenthesis(open, &[TokenKind::Comma, TokenKind::RightParen])?;

        if !function.arity.accepts(args.len()) {
            return Err(ExpressionError {
                kind: ExpressionErrorKind::WrongArity {
                    name: name.clone(),
                    arity: function.arity,
                    found: args.len(),
                },
                span: name_span,
                slice: name,
            });
        }

        Ok((function.call)(&args))
    }
}

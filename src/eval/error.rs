use super::functions::Arity;
use std::fmt;
use std::ops::Range;

/// The arithmetic over the resolved dice could not be evaluated.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("error at position {} ({slice:?}): {kind}", .span.start)]
pub struct ExpressionError {
    pub kind: ExpressionErrorKind,
    pub span: Range<usize>,
    pub slice: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionErrorKind {
    UnexpectedToken { expected: Vec<&'static str> },
    UnexpectedEnd { expected: Vec<&'static str> },
    UnclosedParenthesis,
    UnmatchedParenthesis,
    TrailingInput,
    DivisionByZero,
    UnknownFunction(String),
    WrongArity { name: String, arity: Arity, found: usize },
    FloatsDisabled,
}

impl fmt::Display for ExpressionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedToken { expected } => {
                write!(f, "unexpected token, expected ")?;
                fmt_expected(expected, f)
            }
            Self::UnexpectedEnd { expected } => {
                write!(f, "unexpected end of expression, expected ")?;
                fmt_expected(expected, f)
            }
            Self::UnclosedParenthesis => write!(f, "'(' is never closed"),
            Self::UnmatchedParenthesis => write!(f, "')' has no matching '('"),
            Self::TrailingInput => write!(f, "unexpected input after the end of the expression"),
            Self::DivisionByZero => write!(f, "division by zero"),
            Self::UnknownFunction(name) => write!(f, "unknown function {:?}", name),
            Self::WrongArity { name, arity, found } => {
                write!(f, "{} takes {}, found {}", name, arity, found)
            }
            Self::FloatsDisabled => write!(f, "decimal numbers are not enabled"),
        }
    }
}

fn fmt_expected(expected: &[&str], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match expected {
        [] => Ok(()),
        [only] => f.write_str(only),
        [a, b] => write!(f, "{} or {}", a, b),
        [init @ .., last] => {
            for exp in init {
                write!(f, "{}, ", exp)?;
            }
            write!(f, "or {}", last)
        }
    }
}

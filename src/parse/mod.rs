mod error;
mod lexer;
mod term;

use crate::common::Operator;
use crate::roll::Term;

pub use error::{GroupErrorKind, GroupSyntaxError};
pub use lexer::Token;
pub(crate) use term::parse_term;

/// Splits a whitespace-free expression into operators, function names and
/// dice terms. Function names are only recognized when `is_function` accepts
/// the whole alphabetic run. Never fails: anything that is not an operator
/// ends up inside a term.
pub fn tokenize<'a>(s: &'a str, is_function: impl Fn(&str) -> bool) -> Vec<Token<'a>> {
    lexer::tokens(s, is_function)
}

/// A token with its dice term parsed and bounds-checked.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Item<'a> {
    Term(Term),
    Operator(Operator),
    Function(&'a str),
}

/// Parses every dice term in the stream, stopping at the first one that is malformed.
pub(crate) fn parse<'a>(tokens: &[Token<'a>], allow_floats: bool) -> Result<Vec<Item<'a>>, GroupSyntaxError> {
    tokens
        .iter()
        .map(|token| {
            Ok(match *token {
                Token::Operator(op) => Item::Operator(op),
                Token::FunctionName(name) => Item::Function(name),
                Token::Term(text) => Item::Term(parse_term(text, allow_floats)?),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roll::{IntegerLiteral, Plain};

    #[test]
    fn test_parse_stream() {
        let tokens = tokenize("max(d6,3)", |name| name == "max");
        let items = parse(&tokens, false).unwrap();
        assert_eq!(items.len(), 6);
        assert_eq!(items[0], Item::Function("max"));
        assert!(matches!(&items[2], Item::Term(Term::Plain(Plain { .. }))));
        assert!(matches!(&items[4], Item::Term(Term::Integer(IntegerLiteral { value: 3, .. }))));
    }

    #[test]
    fn test_first_bad_term_is_reported() {
        let tokens = tokenize("3d6+2d6K5+3d", |_| false);
        let err = parse(&tokens, false).unwrap_err();
        assert_eq!(err.group, "2d6K5");
    }
}

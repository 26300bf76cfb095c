use crate::common::Operator;
use logos::Logos;
use std::fmt;

/// Splits a whitespace-free roll expression at its operator characters.
/// Everything between two operators is one run, dice term or function name.
#[derive(Logos, Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum TokenKind {
    #[regex(r"[^()+\-*/,]+")]
    Run,

    #[token("(")]
    LeftParen,
    #[token(")")]
    RightParen,
    #[token(",")]
    Comma,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,

    #[error]
    Error,
}

impl TokenKind {
    pub fn as_operator(self) -> Option<Operator> {
        Some(match self {
            Self::LeftParen => Operator::LeftParen,
            Self::RightParen => Operator::RightParen,
            Self::Comma => Operator::Comma,
            Self::Plus => Operator::Plus,
            Self::Minus => Operator::Minus,
            Self::Star => Operator::Star,
            Self::Slash => Operator::Slash,
            Self::Run | Self::Error => return None,
        })
    }
}

/// A piece of a roll expression. Concatenating the tokens in order gives
/// back the text they were cut from.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    Operator(Operator),
    FunctionName(&'a str),
    Term(&'a str),
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Operator(op) => fmt::Display::fmt(op, f),
            Self::FunctionName(s) | Self::Term(s) => f.write_str(s),
        }
    }
}

pub(crate) fn tokens<'a>(s: &'a str, is_function: impl Fn(&str) -> bool) -> Vec<Token<'a>> {
    let mut lex = TokenKind::lexer(s);
    let mut ret = Vec::new();

    while let Some(kind) = lex.next() {
        let slice = lex.slice();
        let token = match kind.as_operator() {
            Some(op) => Token::Operator(op),
            None if slice.chars().all(|c| c.is_ascii_alphabetic()) && is_function(slice) => {
                Token::FunctionName(slice)
            }
            None => Token::Term(slice),
        };
        ret.push(token);
    }

    ret
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_functions(_: &str) -> bool {
        false
    }

    fn check(s: &str, expected: &[Token<'_>]) {
        let actual = tokens(s, |name| name == "abs" || name == "max");
        assert_eq!(actual, expected);
        assert_eq!(actual.iter().map(ToString::to_string).collect::<String>(), s);
    }

    #[test]
    fn test_terms_and_operators() {
        check(
            "3d6+2",
            &[Token::Term("3d6"), Token::Operator(Operator::Plus), Token::Term("2")],
        );
        check(
            "(4d6K3)*-1",
            &[
                Token::Operator(Operator::LeftParen),
                Token::Term("4d6K3"),
                Token::Operator(Operator::RightParen),
                Token::Operator(Operator::Star),
                Token::Operator(Operator::Minus),
                Token::Term("1"),
            ],
        );
    }

    #[test]
    fn test_function_names() {
        check(
            "abs(d6,2)",
            &[
                Token::FunctionName("abs"),
                Token::Operator(Operator::LeftParen),
                Token::Term("d6"),
                Token::Operator(Operator::Comma),
                Token::Term("2"),
                Token::Operator(Operator::RightParen),
            ],
        );
        // only exact, registered names count
        check("absd6", &[Token::Term("absd6")]);
        check("floor", &[Token::Term("floor")]);
    }

    #[test]
    fn test_functions_disabled() {
        assert_eq!(tokens("abs", no_functions), vec![Token::Term("abs")]);
    }

    #[test]
    fn test_anything_else_is_a_term() {
        assert_eq!(tokens("3d6?!%", no_functions), vec![Token::Term("3d6?!%")]);
        assert!(tokens("", no_functions).is_empty());
    }
}

use crate::eval::ExpressionError;
use crate::parse::GroupSyntaxError;

/// Why a roll was rejected. The two kinds stay distinct so callers can word
/// their messages differently.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum DiceError {
    #[error(transparent)]
    GroupSyntax(#[from] GroupSyntaxError),
    #[error(transparent)]
    Expression(#[from] ExpressionError),
}

impl DiceError {
    pub fn is_group_syntax(&self) -> bool {
        matches!(self, Self::GroupSyntax(_))
    }

    pub fn is_expression(&self) -> bool {
        matches!(self, Self::Expression(_))
    }
}

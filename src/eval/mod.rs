mod error;
mod functions;
mod lexer;
mod parser;

use crate::config::RollConfig;
use crate::roll::Number;

pub use error::{ExpressionError, ExpressionErrorKind};
pub use functions::{Arity, Function, FunctionRegistry, NativeFn};

/// Evaluates plain arithmetic: `+ - * /`, parentheses, unary minus and calls
/// into a [`FunctionRegistry`].
#[derive(Debug, Clone)]
pub struct Evaluator {
    config: RollConfig,
    functions: FunctionRegistry,
}

impl Evaluator {
    pub fn new(config: RollConfig, functions: FunctionRegistry) -> Self {
        Self { config, functions }
    }

    pub fn config(&self) -> RollConfig {
        self.config
    }

    /// The functions an expression may call, if calls are enabled at all.
    pub fn functions(&self) -> Option<&FunctionRegistry> {
        self.config.allow_functions.then_some(&self.functions)
    }

    pub(crate) fn set_functions(&mut self, functions: FunctionRegistry) {
        self.functions = functions;
    }

    /// Without float mode the result is truncated toward zero, once, at the very end.
    pub fn evaluate(&self, source: &str) -> Result<Number, ExpressionError> {
        let value = parser::Parser::new(source, self.functions(), self.config.allow_floats).parse()?;
        Ok(if self.config.allow_floats {
            value
        } else {
            value.truncate()
        })
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(RollConfig::default(), FunctionRegistry::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(s: &str, expected: impl Into<Number>) {
        assert_eq!(Evaluator::default().evaluate(s).unwrap(), expected.into());
    }

    fn check_float(s: &str, expected: impl Into<Number>) {
        let evaluator = Evaluator::new(RollConfig::default().with_floats(true), FunctionRegistry::default());
        assert_eq!(evaluator.evaluate(s).unwrap(), expected.into());
    }

    fn check_err(s: &str) -> ExpressionError {
        Evaluator::default().evaluate(s).unwrap_err()
    }

    #[test]
    fn test_eval_number() {
        check("2", 2);
        check("-2", -2);
        check("--2", 2);
        check("---2", -2);
    }

    #[test]
    fn test_eval_precedence() {
        check("2+3*4", 14);
        check("(2+3)*4", 20);
        check("10-4-3", 3);
        check("2*(1-3)", -4);
        check("2*-3", -6);
    }

    #[test]
    fn test_division_truncates_at_the_end() {
        check("7/2", 3);
        check("-7/2", -3);
        check("7/2*2", 7);
        check("1/3*3", 1);
        check("49/49", 1);
        check("7/2+7/2", 7);
    }

    #[test]
    fn test_float_mode() {
        check_float("7/2", 3.5);
        check_float("1.5*2", 3);
        check_float("-0.25", -0.25);
        let err = check_err("1.5*2");
        assert_eq!(err.kind, ExpressionErrorKind::FloatsDisabled);
    }

    #[test]
    fn test_large_integers() {
        check("9223372036854775807+1", 9223372036854775808.0);
        check("100000000000000000000/100000000000000000000", 1);
    }

    #[test]
    fn test_functions() {
        check("abs(-4)", 4);
        check("max(1,5,3)", 5);
        check("min(2,-1)*3", -3);
        check("abs(2-5)+max(1,2)", 5);
    }

    #[test]
    fn test_functions_disabled() {
        let evaluator = Evaluator::new(RollConfig::default().with_functions(false), FunctionRegistry::default());
        let err = evaluator.evaluate("abs(-4)").unwrap_err();
        assert_eq!(err.kind, ExpressionErrorKind::UnknownFunction("abs".to_string()));
    }

    #[test]
    fn test_division_by_zero() {
        let err = check_err("5/0");
        assert_eq!(err.kind, ExpressionErrorKind::DivisionByZero);
        assert_eq!(err.span, 1..2);
        let err = check_err("5/(3-3)");
        assert_eq!(err.kind, ExpressionErrorKind::DivisionByZero);
    }

    #[test]
    fn test_underflowing_divisors_are_division_by_zero() {
        let evaluator = Evaluator::new(RollConfig::default().with_floats(true), FunctionRegistry::default());
        let tiny = format!("0.{}1", "0".repeat(199));
        let source = format!("1/{}/{}", tiny, tiny);
        let err = evaluator.evaluate(&source).unwrap_err();
        assert_eq!(err.kind, ExpressionErrorKind::DivisionByZero);
        assert_eq!(err.span, tiny.len() + 2..tiny.len() + 3);

        assert_eq!(evaluator.evaluate("1/0.5/0.5").unwrap(), Number::Int(4));
    }

    #[test]
    fn test_errors() {
        assert_eq!(check_err("(2+3").kind, ExpressionErrorKind::UnclosedParenthesis);
        assert_eq!(check_err("2+3)").kind, ExpressionErrorKind::UnmatchedParenthesis);
        assert_eq!(check_err("(2)3").kind, ExpressionErrorKind::TrailingInput);
        assert_eq!(check_err("floor(2)").kind, ExpressionErrorKind::UnknownFunction("floor".to_string()));
        assert!(matches!(check_err("abs(1,2)").kind, ExpressionErrorKind::WrongArity { found: 2, .. }));
        assert!(matches!(check_err("2+").kind, ExpressionErrorKind::UnexpectedEnd { .. }));
        assert!(matches!(check_err("2**3").kind, ExpressionErrorKind::UnexpectedToken { .. }));
        assert!(matches!(check_err("").kind, ExpressionErrorKind::UnexpectedEnd { .. }));
    }
}

use crate::config::RollConfig;
use crate::error::DiceError;
use crate::eval::{Evaluator, FunctionRegistry};
use crate::parse;
use crate::roll::{explanation, resolve, source, DefaultRoller, Number, RollContext, Roller};
use tracing::debug;

/// Rolls dice expressions such as `4d6K3 + 2` with a fixed configuration
/// and source of randomness.
pub struct DiceRoller<R = DefaultRoller> {
    evaluator: Evaluator,
    roller: R,
}

impl DiceRoller {
    pub fn new(config: RollConfig) -> Self {
        Self::with_roller(config, rand::thread_rng())
    }
}

impl Default for DiceRoller {
    fn default() -> Self {
        Self::new(RollConfig::default())
    }
}

impl<R: Roller> DiceRoller<R> {
    pub fn with_roller(config: RollConfig, roller: R) -> Self {
        Self {
            evaluator: Evaluator::new(config, FunctionRegistry::default()),
            roller,
        }
    }

    /// Replaces the functions expressions may call.
    pub fn with_functions(mut self, functions: FunctionRegistry) -> Self {
        self.evaluator.set_functions(functions);
        self
    }

    pub fn config(&self) -> RollConfig {
        self.evaluator.config()
    }

    /// Rolls every dice term in `expression`, then evaluates the arithmetic
    /// around them. Returns the value and an explanation showing each die.
    /// Whitespace is ignored. Every dice term is checked before any die is
    /// rolled.
    pub fn roll(&mut self, expression: &str) -> Result<(Number, String), DiceError> {
        let normalized: String = expression.split_whitespace().collect();
        debug!(expression = %normalized, "rolling");

        let tokens = match self.evaluator.functions() {
            Some(functions) => parse::tokenize(&normalized, |name| functions.contains(name)),
            None => parse::tokenize(&normalized, |_| false),
        };
        let items = parse::parse(&tokens, self.config().allow_floats).map_err(|err| {
            debug!(group = %err.group, reason = %err.kind, "rejected dice group");
            err
        })?;

        let mut ctx = RollContext::new(&mut self.roller);
        let stream = resolve(&items, &mut ctx);
        let rolls = ctx.rolls();

        let source = source(&stream);
        let value = self.evaluator.evaluate(&source).map_err(|err| {
            debug!(%source, error = %err, "rejected expression");
            err
        })?;
        let explanation = explanation(&stream);

        debug!(%value, %explanation, rolls, "rolled");
        Ok((value, explanation))
    }
}

/// Rolls `expression` with the default configuration and the thread-local
/// generator.
pub fn roll(expression: &str) -> Result<(Number, String), DiceError> {
    DiceRoller::default().roll(expression)
}

use crate::config::RollConfig;
use crate::dice::DiceRoller;
use crate::error::DiceError;
use crate::roll::{DefaultRoller, Number, Roller};

/// Holds one expression to roll again and again, remembering the last result.
pub struct DiceBag<R = DefaultRoller> {
    roller: DiceRoller<R>,
    expression: String,
    last_roll: Option<(Number, String)>,
}

impl DiceBag {
    pub fn new(expression: impl Into<String>) -> Result<Self, DiceError> {
        Self::with_roller(DiceRoller::new(RollConfig::default()), expression)
    }
}

impl Default for DiceBag {
    fn default() -> Self {
        Self {
            roller: DiceRoller::default(),
            expression: "0".to_string(),
            last_roll: None,
        }
    }
}

impl<R: Roller> DiceBag<R> {
    pub fn with_roller(roller: DiceRoller<R>, expression: impl Into<String>) -> Result<Self, DiceError> {
        let mut ret = Self {
            roller,
            expression: "0".to_string(),
            last_roll: None,
        };
        ret.set_expression(expression)?;
        Ok(ret)
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Replaces the expression, but only after a trial roll of it succeeds.
    /// On failure the old expression stays.
    pub fn set_expression(&mut self, expression: impl Into<String>) -> Result<(), DiceError> {
        let expression = expression.into();
        self.roller.roll(&expression)?;
        self.expression = expression;
        Ok(())
    }

    pub fn roll(&mut self) -> Result<&(Number, String), DiceError> {
        let result = self.roller.roll(&self.expression)?;
        Ok(self.last_roll.insert(result))
    }

    pub fn last_roll(&self) -> Option<&(Number, String)> {
        self.last_roll.as_ref()
    }
}

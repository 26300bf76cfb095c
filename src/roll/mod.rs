mod ctx;
mod num;
mod roller;
mod stringify;
mod tree;

use crate::parse::Item;

pub use ctx::{DefaultRoller, RollContext};
pub use num::Number;
pub use roller::Roller;
pub use stringify::Resolved;
pub use tree::{
    DiceGroup, DropDice, Explode, FloatLiteral, Individual, IndividualOp, IntegerLiteral, KeepDice, Mark, Plain,
    Provenance, Reroll, Resolve, RolledDie, Success, SuccessFail, Term, TermResolution,
};

pub(crate) use stringify::{explanation, source};

#[cfg(test)]
pub(crate) use roller::{SequenceRoller, StepRoller};

/// Rolls every dice term in the stream, left to right, leaving operators and
/// function names in place.
pub(crate) fn resolve<'a, R: Roller>(items: &[Item<'a>], ctx: &mut RollContext<'_, R>) -> Vec<Resolved<'a>> {
    items
        .iter()
        .map(|item| match item {
            Item::Term(term) => Resolved::Term(ctx.resolve(term)),
            Item::Operator(op) => Resolved::Operator(*op),
            Item::Function(name) => Resolved::Function(*name),
        })
        .collect()
}

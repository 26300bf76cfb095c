use super::tree::{IndividualOp, Mark, RolledDie, TermResolution};
use crate::common::{Operator, UInt};

/// One entry of a resolved roll: dice terms have become values with
/// fragments, everything else passes through.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved<'a> {
    Term(TermResolution),
    Operator(Operator),
    Function(&'a str),
}

pub(crate) fn die(die: &RolledDie) -> String {
    let mut ret = String::new();
    match die.mark {
        Mark::None => {}
        Mark::Triggered | Mark::Success => ret.push('!'),
        Mark::Failure => ret.push('*'),
    }
    let chain = die
        .history
        .iter()
        .rev()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("<-");
    ret.push_str(&chain);
    if die.penalty != 0 {
        ret.push_str(&format!("-{}", die.penalty));
    }
    ret
}

fn list(dice: &[RolledDie]) -> String {
    dice.iter().map(die).collect::<Vec<_>>().join(",")
}

/// `[3,4,5]`
pub(crate) fn dice(dice: &[RolledDie]) -> String {
    format!("[{}]", list(dice))
}

/// `[6,5 ~~ 2,1]`: the dice that count, then the ones that were set aside.
pub(crate) fn split(counted: &[RolledDie], rest: &[RolledDie]) -> String {
    format!("[{} ~~ {}]", list(counted), list(rest))
}

/// `[3a2,5a2]`
pub(crate) fn individual(dice: &[RolledDie], op: IndividualOp, operand: UInt) -> String {
    let inner = dice
        .iter()
        .map(|d| format!("{}{}{}", d.outcome(), op.letter(), operand))
        .collect::<Vec<_>>()
        .join(",");
    format!("[{}]", inner)
}

/// Renders the resolved roll back into an expression a reader can follow.
/// Binary operators get a space on each side, a minus with no operand
/// before it stays glued to what follows.
pub(crate) fn explanation(stream: &[Resolved<'_>]) -> String {
    let mut ret = String::new();
    let mut after_operand = false;

    for item in stream {
        match item {
            Resolved::Term(term) => {
                ret.push_str(&term.fragment);
                after_operand = true;
            }
            Resolved::Function(name) => {
                ret.push_str(name);
                after_operand = false;
            }
            Resolved::Operator(op) => {
                match op {
                    Operator::LeftParen => ret.push('('),
                    Operator::RightParen => ret.push(')'),
                    Operator::Comma => ret.push_str(", "),
                    op if after_operand => ret.push_str(&format!(" {} ", op)),
                    op => ret.push(op.as_char()),
                }
                after_operand = *op == Operator::RightParen;
            }
        }
    }

    ret.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Renders the resolved roll as plain arithmetic for the evaluator.
pub(crate) fn source(stream: &[Resolved<'_>]) -> String {
    let mut ret = String::new();
    for item in stream {
        match item {
            Resolved::Term(term) => ret.push_str(&term.value.to_source()),
            Resolved::Operator(op) => ret.push(op.as_char()),
            Resolved::Function(name) => ret.push_str(name),
        }
    }
    ret
}

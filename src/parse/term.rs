use super::error::{GroupErrorKind, GroupSyntaxError};
use crate::common::*;
use crate::roll::*;
use logos::Logos;

type GResult<T> = Result<T, GroupErrorKind>;

/// The pieces a single dice term is made of.
#[derive(Logos, Debug, Copy, Clone, PartialEq)]
enum Part {
    #[regex(r"[0-9]+", |lex| lex.slice().parse())]
    Integer(u64),
    #[regex(r"([0-9]+\.[0-9]*)|(\.[0-9]+)", |lex| lex.slice().parse())]
    Decimal(Float),

    #[token("d")]
    #[token("D")]
    Dice,
    #[token("!")]
    Bang,
    #[token("p")]
    Penetrate,
    #[token("<")]
    Less,
    #[token(">")]
    Greater,
    #[token("f")]
    Fail,

    #[token("K")]
    KeepHighest,
    #[token("k")]
    KeepLowest,
    #[token("X")]
    DropLowest,
    #[token("x")]
    DropHighest,
    #[token("R")]
    Reroll,
    #[token("r")]
    RerollOnce,

    #[token("a")]
    Add,
    #[token("s")]
    Sub,
    #[token("m")]
    Mul,

    #[error]
    Error,
}

impl Part {
    fn as_comparison(self) -> Option<Comparison> {
        match self {
            Self::Greater => Some(Comparison::Greater),
            Self::Less => Some(Comparison::Less),
            _ => None,
        }
    }
}

/// Turns one dice term into something ready to roll, checking every bound
/// before a single die is drawn.
pub(crate) fn parse_term(text: &str, allow_floats: bool) -> Result<Term, GroupSyntaxError> {
    parse_parts(text, allow_floats).map_err(|kind| GroupSyntaxError::new(text, kind))
}

fn parse_parts(text: &str, allow_floats: bool) -> GResult<Term> {
    let parts = Part::lexer(text)
        .map(|part| match part {
            Part::Error => Err(GroupErrorKind::Unrecognized),
            part => Ok(part),
        })
        .collect::<GResult<Vec<_>>>()?;

    match *parts.as_slice() {
        [Part::Integer(value)] => {
            let value = Int::try_from(value).map_err(|_| GroupErrorKind::LiteralOutOfRange)?;
            return Ok(IntegerLiteral {
                value,
                text: text.to_string(),
            }
            .into());
        }
        [Part::Decimal(value)] if allow_floats => {
            return Ok(FloatLiteral {
                value,
                text: text.to_string(),
            }
            .into());
        }
        [Part::Decimal(_)] => return Err(GroupErrorKind::FloatsDisabled),
        _ => {}
    }

    let (group, modifiers) = dice_group(&parts)?;
    FORMS
        .iter()
        .find_map(|form| form(group, modifiers))
        .unwrap_or(Err(GroupErrorKind::Unrecognized))
}

fn dice_group(parts: &[Part]) -> GResult<(DiceGroup, &[Part])> {
    let (count, rest) = match parts {
        [Part::Integer(n), Part::Dice, rest @ ..] => (*n, rest),
        [Part::Dice, rest @ ..] => (1, rest),
        _ => return Err(GroupErrorKind::Unrecognized),
    };
    let (sides, rest) = match rest {
        [Part::Integer(m), rest @ ..] => (*m, rest),
        _ => return Err(GroupErrorKind::MissingFaces),
    };

    let count = usize::try_from(count)
        .ok()
        .and_then(Num::new)
        .ok_or(GroupErrorKind::ZeroCount)?;
    let sides = UInt::try_from(sides)
        .ok()
        .and_then(NonZeroUInt::new)
        .ok_or(GroupErrorKind::InvalidFaces)?;

    Ok((DiceGroup { count, sides }, rest))
}

fn threshold(value: u64) -> GResult<UInt> {
    UInt::try_from(value).map_err(|_| GroupErrorKind::LiteralOutOfRange)
}

/// A trigger as written after `!`, `!p`, `R` or `r`: nothing, `V`, `>V` or `<V`.
fn trigger(parts: &[Part]) -> Option<GResult<Trigger>> {
    Some(match *parts {
        [] => Ok(Trigger::Max),
        [Part::Integer(v)] => threshold(v).map(Trigger::Equal),
        [cmp, Part::Integer(v)] => {
            let cmp = cmp.as_comparison()?;
            threshold(v).map(|v| Trigger::Compare(cmp, v))
        }
        _ => return None,
    })
}

fn select_count(parts: &[Part]) -> Option<GResult<usize>> {
    Some(match *parts {
        [] => Ok(1),
        [Part::Integer(n)] => usize::try_from(n).map_err(|_| GroupErrorKind::LiteralOutOfRange),
        _ => return None,
    })
}

type Form = fn(DiceGroup, &[Part]) -> Option<GResult<Term>>;

/// Tried in order; the first form whose shape matches decides the term.
const FORMS: &[Form] = &[
    explode,
    penetrate,
    success,
    success_fail,
    keep,
    drop,
    reroll,
    individual,
    plain,
];

fn explode(group: DiceGroup, parts: &[Part]) -> Option<GResult<Term>> {
    match parts {
        [Part::Bang, rest @ ..] => {
            let trigger = trigger(rest)?;
            Some(trigger.and_then(|t| Explode::new(group, t, false)).map(Term::from))
        }
        _ => None,
    }
}

fn penetrate(group: DiceGroup, parts: &[Part]) -> Option<GResult<Term>> {
    match parts {
        [Part::Bang, Part::Penetrate, rest @ ..] => {
            let trigger = trigger(rest)?;
            Some(trigger.and_then(|t| Explode::new(group, t, true)).map(Term::from))
        }
        _ => None,
    }
}

fn success(group: DiceGroup, parts: &[Part]) -> Option<GResult<Term>> {
    match *parts {
        [cmp, Part::Integer(v)] => {
            let cmp = cmp.as_comparison()?;
            Some(
                threshold(v)
                    .and_then(|v| Success::new(group, cmp, v))
                    .map(Term::from),
            )
        }
        _ => None,
    }
}

fn success_fail(group: DiceGroup, parts: &[Part]) -> Option<GResult<Term>> {
    match *parts {
        [cmp, Part::Integer(s), Part::Fail, fail_cmp, Part::Integer(f)] => {
            let cmp = cmp.as_comparison()?;
            if fail_cmp.as_comparison()? != cmp.flipped() {
                return None;
            }
            let result = threshold(s)
                .and_then(|s| Ok((s, threshold(f)?)))
                .and_then(|(s, f)| SuccessFail::new(group, cmp, s, f))
                .map(Term::from);
            Some(result)
        }
        _ => None,
    }
}

fn keep(group: DiceGroup, parts: &[Part]) -> Option<GResult<Term>> {
    let (highest, rest) = match parts {
        [Part::KeepHighest, rest @ ..] => (true, rest),
        [Part::KeepLowest, rest @ ..] => (false, rest),
        _ => return None,
    };
    let n = select_count(rest)?;
    Some(n.and_then(|n| KeepDice::new(group, highest, n)).map(Term::from))
}

fn drop(group: DiceGroup, parts: &[Part]) -> Option<GResult<Term>> {
    let (lowest, rest) = match parts {
        [Part::DropLowest, rest @ ..] => (true, rest),
        [Part::DropHighest, rest @ ..] => (false, rest),
        _ => return None,
    };
    let n = select_count(rest)?;
    Some(n.and_then(|n| DropDice::new(group, lowest, n)).map(Term::from))
}

fn reroll(group: DiceGroup, parts: &[Part]) -> Option<GResult<Term>> {
    let (once, rest) = match parts {
        [Part::Reroll, rest @ ..] => (false, rest),
        [Part::RerollOnce, rest @ ..] => (true, rest),
        _ => return None,
    };
    let trigger = match trigger(rest)? {
        Ok(Trigger::Max) => Ok(Trigger::Equal(1)),
        other => other,
    };
    Some(trigger.and_then(|t| Reroll::new(group, t, once)).map(Term::from))
}

fn individual(group: DiceGroup, parts: &[Part]) -> Option<GResult<Term>> {
    let (op, v) = match *parts {
        [Part::Add, Part::Integer(v)] => (IndividualOp::Add, v),
        [Part::Sub, Part::Integer(v)] => (IndividualOp::Sub, v),
        [Part::Mul, Part::Integer(v)] => (IndividualOp::Mul, v),
        _ => return None,
    };
    Some(threshold(v).map(|v| Individual::new(group, op, v).into()))
}

fn plain(group: DiceGroup, parts: &[Part]) -> Option<GResult<Term>> {
    parts.is_empty().then(|| Ok(Plain::new(group).into()))
}

use super::{num::Number, roller::Roller, stringify, RollContext};
use crate::common::*;
use crate::parse::GroupErrorKind;
use std::fmt;

type GResult<T> = Result<T, GroupErrorKind>;

/// The numeric value and explanation fragment of one resolved dice term.
#[derive(Debug, Clone, PartialEq)]
pub struct TermResolution {
    pub value: Number,
    pub fragment: String,
}

impl TermResolution {
    pub fn new(value: impl Into<Number>, fragment: String) -> Self {
        Self {
            value: value.into(),
            fragment,
        }
    }
}

/// `NdM`: how many dice, and how many faces each has.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct DiceGroup {
    pub count: Num,
    pub sides: NonZeroUInt,
}

impl fmt::Display for DiceGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)
    }
}

/// Where a die came from. Penetrating dice are penalized by it.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Provenance {
    Initial,
    Triggered,
    Rerolled,
}

/// How a die is flagged in the explanation.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Mark {
    None,
    Triggered,
    Success,
    Failure,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RolledDie {
    pub sides: NonZeroUInt,
    /// Every face this die showed, oldest first. The last one counts.
    pub history: NonEmpty<UInt>,
    pub provenance: Provenance,
    pub mark: Mark,
    pub penalty: UInt,
}

impl RolledDie {
    pub(crate) fn new(sides: NonZeroUInt, face: UInt, provenance: Provenance) -> Self {
        Self {
            sides,
            history: vec1![face],
            provenance,
            mark: Mark::None,
            penalty: 0,
        }
    }

    pub fn outcome(&self) -> UInt {
        *self.history.last()
    }

    pub fn contribution(&self) -> Int {
        Int::from(self.outcome()) - Int::from(self.penalty)
    }

    pub(crate) fn reroll(&mut self, face: UInt) {
        self.history.push(face);
        self.provenance = Provenance::Rerolled;
    }
}

fn sum(dice: &[RolledDie]) -> Number {
    dice.iter().map(|die| Number::Int(die.contribution())).sum()
}

fn sort_dice(dice: &mut [RolledDie], descending: bool) {
    if descending {
        dice.sort_by(|a, b| b.outcome().cmp(&a.outcome()));
    } else {
        dice.sort_by_key(RolledDie::outcome);
    }
}

fn check_threshold(cmp: Comparison, threshold: UInt, sides: NonZeroUInt) -> GResult<()> {
    if cmp.in_bounds(threshold, sides) {
        Ok(())
    } else {
        Err(GroupErrorKind::ThresholdOutOfRange {
            threshold: format!("{}{}", cmp, threshold),
            sides: sides.get(),
        })
    }
}

fn check_trigger(trigger: Trigger, sides: NonZeroUInt) -> GResult<()> {
    if !trigger.in_bounds(sides) {
        Err(GroupErrorKind::ThresholdOutOfRange {
            threshold: trigger.to_string(),
            sides: sides.get(),
        })
    } else if trigger.covers_all(sides) {
        Err(GroupErrorKind::NeverEnding)
    } else {
        Ok(())
    }
}

fn check_select(n: usize, group: DiceGroup) -> GResult<()> {
    let count = group.count.get();
    if 1 <= n && n < count {
        Ok(())
    } else {
        Err(GroupErrorKind::SelectCount { n, count })
    }
}

#[enum_dispatch::enum_dispatch]
pub trait Resolve {
    fn resolve<R: Roller>(&self, ctx: &mut RollContext<'_, R>) -> TermResolution;
}

/// A dice term that passed every bounds check and is ready to roll.
#[derive(Debug, Clone, PartialEq)]
#[enum_dispatch::enum_dispatch(Resolve)]
pub enum Term {
    Plain(Plain),
    Explode(Explode),
    Reroll(Reroll),
    Success(Success),
    SuccessFail(SuccessFail),
    Keep(KeepDice),
    Drop(DropDice),
    Individual(Individual),
    Integer(IntegerLiteral),
    Float(FloatLiteral),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Plain {
    pub group: DiceGroup,
}

impl Plain {
    pub fn new(group: DiceGroup) -> Self {
        Self { group }
    }
}

impl Resolve for Plain {
    fn resolve<R: Roller>(&self, ctx: &mut RollContext<'_, R>) -> TermResolution {
        let dice = ctx.roll_group(self.group);
        TermResolution::new(sum(&dice), stringify::dice(&dice))
    }
}

/// `NdM!` and `NdM!p`: every triggering die adds another. Penetrating dice
/// beyond the group's size count one less.
#[derive(Debug, Clone, PartialEq)]
pub struct Explode {
    pub group: DiceGroup,
    pub trigger: Trigger,
    pub penetrating: bool,
}

impl Explode {
    pub fn new(group: DiceGroup, trigger: Trigger, penetrating: bool) -> GResult<Self> {
        check_trigger(trigger, group.sides)?;
        Ok(Self {
            group,
            trigger,
            penetrating,
        })
    }
}

impl Resolve for Explode {
    fn resolve<R: Roller>(&self, ctx: &mut RollContext<'_, R>) -> TermResolution {
        let sides = self.group.sides;
        let penalty = UInt::from(self.penetrating);
        let mut dice = ctx.roll_group(self.group);
        let mut batch = 0;

        loop {
            let mut triggered = 0;
            for die in &mut dice[batch..] {
                if self.trigger.matches(die.outcome(), sides) {
                    die.mark = Mark::Triggered;
                    triggered += 1;
                }
            }
            if triggered == 0 {
                break;
            }

            batch = dice.len();
            dice.extend(ctx.roll_dice(triggered, sides, Provenance::Triggered));
        }

        for die in dice.iter_mut().filter(|die| die.provenance == Provenance::Triggered) {
            die.penalty = penalty;
        }

        TermResolution::new(sum(&dice), stringify::dice(&dice))
    }
}

/// `NdMR` rerolls until the trigger no longer matches, `NdMr` rerolls once.
#[derive(Debug, Clone, PartialEq)]
pub struct Reroll {
    pub group: DiceGroup,
    pub trigger: Trigger,
    pub once: bool,
}

impl Reroll {
    pub fn new(group: DiceGroup, trigger: Trigger, once: bool) -> GResult<Self> {
        if once {
            if !trigger.in_bounds(group.sides) {
                return Err(GroupErrorKind::ThresholdOutOfRange {
                    threshold: trigger.to_string(),
                    sides: group.sides.get(),
                });
            }
        } else {
            check_trigger(trigger, group.sides)?;
        }
        Ok(Self {
            group,
            trigger,
            once,
        })
    }
}

impl Resolve for Reroll {
    fn resolve<R: Roller>(&self, ctx: &mut RollContext<'_, R>) -> TermResolution {
        let sides = self.group.sides;
        let mut dice = ctx.roll_group(self.group);

        for die in &mut dice {
            if self.once {
                if self.trigger.matches(die.outcome(), sides) {
                    die.reroll(ctx.roll_one(sides));
                }
            } else {
                while self.trigger.matches(die.outcome(), sides) {
                    die.reroll(ctx.roll_one(sides));
                }
            }
        }

        TermResolution::new(sum(&dice), stringify::dice(&dice))
    }
}

/// `NdM>V` / `NdM<V`: counts the dice beating the threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct Success {
    pub group: DiceGroup,
    pub cmp: Comparison,
    pub threshold: UInt,
}

impl Success {
    pub fn new(group: DiceGroup, cmp: Comparison, threshold: UInt) -> GResult<Self> {
        check_threshold(cmp, threshold, group.sides)?;
        Ok(Self {
            group,
            cmp,
            threshold,
        })
    }
}

impl Resolve for Success {
    fn resolve<R: Roller>(&self, ctx: &mut RollContext<'_, R>) -> TermResolution {
        let mut dice = ctx.roll_group(self.group);
        let mut successes: Int = 0;
        for die in &mut dice {
            if self.cmp.test(die.outcome(), self.threshold) {
                die.mark = Mark::Success;
                successes += 1;
            }
        }
        TermResolution::new(successes, stringify::dice(&dice))
    }
}

/// `NdM>SfF` / `NdM<SfF`: successes count one, failures take one away.
/// A die meeting both thresholds counts as a success.
#[derive(Debug, Clone, PartialEq)]
pub struct SuccessFail {
    pub group: DiceGroup,
    pub cmp: Comparison,
    pub success: UInt,
    pub failure: UInt,
}

impl SuccessFail {
    pub fn new(group: DiceGroup, cmp: Comparison, success: UInt, failure: UInt) -> GResult<Self> {
        check_threshold(cmp, success, group.sides)?;
        check_threshold(cmp.flipped(), failure, group.sides)?;
        Ok(Self {
            group,
            cmp,
            success,
            failure,
        })
    }
}

impl Resolve for SuccessFail {
    fn resolve<R: Roller>(&self, ctx: &mut RollContext<'_, R>) -> TermResolution {
        let mut dice = ctx.roll_group(self.group);
        let mut value: Int = 0;
        for die in &mut dice {
            if self.cmp.test(die.outcome(), self.success) {
                die.mark = Mark::Success;
                value += 1;
            } else if self.cmp.flipped().test(die.outcome(), self.failure) {
                die.mark = Mark::Failure;
                value -= 1;
            }
        }
        TermResolution::new(value, stringify::dice(&dice))
    }
}

/// `NdMK[n]` keeps the highest n dice, `NdMk[n]` the lowest.
#[derive(Debug, Clone, PartialEq)]
pub struct KeepDice {
    pub group: DiceGroup,
    pub highest: bool,
    pub n: usize,
}

impl KeepDice {
    pub fn new(group: DiceGroup, highest: bool, n: usize) -> GResult<Self> {
        check_select(n, group)?;
        Ok(Self { group, highest, n })
    }
}

impl Resolve for KeepDice {
    fn resolve<R: Roller>(&self, ctx: &mut RollContext<'_, R>) -> TermResolution {
        let mut dice = ctx.roll_group(self.group);
        sort_dice(&mut dice, self.highest);
        let (kept, rest) = dice.split_at(self.n);
        TermResolution::new(sum(kept), stringify::split(kept, rest))
    }
}

/// `NdMX[n]` drops the lowest n dice, `NdMx[n]` the highest.
#[derive(Debug, Clone, PartialEq)]
pub struct DropDice {
    pub group: DiceGroup,
    pub lowest: bool,
    pub n: usize,
}

impl DropDice {
    pub fn new(group: DiceGroup, lowest: bool, n: usize) -> GResult<Self> {
        check_select(n, group)?;
        Ok(Self { group, lowest, n })
    }
}

impl Resolve for DropDice {
    fn resolve<R: Roller>(&self, ctx: &mut RollContext<'_, R>) -> TermResolution {
        let mut dice = ctx.roll_group(self.group);
        sort_dice(&mut dice, !self.lowest);
        let (dropped, retained) = dice.split_at(self.n);
        TermResolution::new(sum(retained), stringify::split(retained, dropped))
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum IndividualOp {
    Add,
    Sub,
    Mul,
}

impl IndividualOp {
    pub const fn letter(self) -> char {
        match self {
            Self::Add => 'a',
            Self::Sub => 's',
            Self::Mul => 'm',
        }
    }

    fn apply(self, face: Number, operand: Number) -> Number {
        match self {
            Self::Add => face + operand,
            Self::Sub => face - operand,
            Self::Mul => face * operand,
        }
    }
}

/// `NdMaV`, `NdMsV`, `NdMmV`: adjusts every die before summing.
#[derive(Debug, Clone, PartialEq)]
pub struct Individual {
    pub group: DiceGroup,
    pub op: IndividualOp,
    pub operand: UInt,
}

impl Individual {
    pub fn new(group: DiceGroup, op: IndividualOp, operand: UInt) -> Self {
        Self { group, op, operand }
    }
}

impl Resolve for Individual {
    fn resolve<R: Roller>(&self, ctx: &mut RollContext<'_, R>) -> TermResolution {
        let dice = ctx.roll_group(self.group);
        let operand = Number::Int(Int::from(self.operand));
        let value: Number = dice
            .iter()
            .map(|die| self.op.apply(Number::Int(die.contribution()), operand))
            .sum();
        TermResolution::new(value, stringify::individual(&dice, self.op, self.operand))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntegerLiteral {
    pub value: Int,
    pub text: String,
}

impl Resolve for IntegerLiteral {
    fn resolve<R: Roller>(&self, _ctx: &mut RollContext<'_, R>) -> TermResolution {
        TermResolution::new(self.value, self.text.clone())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FloatLiteral {
    pub value: Float,
    pub text: String,
}

impl Resolve for FloatLiteral {
    fn resolve<R: Roller>(&self, _ctx: &mut RollContext<'_, R>) -> TermResolution {
        TermResolution::new(self.value, self.text.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roll::roller::SequenceRoller;

    fn group(count: usize, sides: UInt) -> DiceGroup {
        DiceGroup {
            count: Num::new(count).unwrap(),
            sides: NonZeroUInt::new(sides).unwrap(),
        }
    }

    fn resolve(term: impl Into<Term>, faces: &[UInt]) -> (Number, String) {
        let mut roller = SequenceRoller::new(faces);
        let mut ctx = RollContext::new(&mut roller);
        let TermResolution { value, fragment } = ctx.resolve(&term.into());
        (value, fragment)
    }

    #[test]
    fn test_plain() {
        let (value, fragment) = resolve(Plain::new(group(3, 6)), &[3, 4, 5]);
        assert_eq!(value, Number::Int(12));
        assert_eq!(fragment, "[3,4,5]");
    }

    #[test]
    fn test_explode_on_max() {
        let term = Explode::new(group(3, 6), Trigger::Max, false).unwrap();
        let (value, fragment) = resolve(term, &[6, 2, 3, 6, 1]);
        assert_eq!(value, Number::Int(18));
        assert_eq!(fragment, "[!6,2,3,!6,1]");
    }

    #[test]
    fn test_explode_threshold() {
        let term = Explode::new(group(2, 6), Trigger::Compare(Comparison::Greater, 4), false).unwrap();
        let (value, fragment) = resolve(term, &[5, 1, 6, 2]);
        assert_eq!(value, Number::Int(14));
        assert_eq!(fragment, "[!5,1,!6,2]");
    }

    #[test]
    fn test_penetrate() {
        let term = Explode::new(group(2, 6), Trigger::Max, true).unwrap();
        let (value, fragment) = resolve(term, &[6, 3, 6, 2]);
        // 6 + 3 + (6 - 1) + (2 - 1)
        assert_eq!(value, Number::Int(15));
        assert_eq!(fragment, "[!6,3,!6-1,2-1]");
    }

    #[test]
    fn test_provenance() {
        let mut roller = SequenceRoller::new(&[6, 2]);
        let mut ctx = RollContext::new(&mut roller);
        let mut dice = ctx.roll_group(group(1, 6));
        assert_eq!(dice[0].provenance, Provenance::Initial);
        dice[0].reroll(3);
        assert_eq!(dice[0].provenance, Provenance::Rerolled);
        let extra = ctx.roll_dice(1, NonZeroUInt::new(6).unwrap(), Provenance::Triggered);
        assert_eq!(extra[0].provenance, Provenance::Triggered);
    }

    #[test]
    fn test_explode_rejects_endless_trigger() {
        assert_eq!(
            Explode::new(group(1, 1), Trigger::Max, false),
            Err(GroupErrorKind::NeverEnding)
        );
        assert!(Explode::new(group(1, 6), Trigger::Equal(7), false).is_err());
    }

    #[test]
    fn test_reroll_until_clear() {
        let term = Reroll::new(group(2, 6), Trigger::Equal(1), false).unwrap();
        let (value, fragment) = resolve(term, &[1, 5, 1, 4]);
        assert_eq!(value, Number::Int(9));
        assert_eq!(fragment, "[4<-1<-1,5]");
    }

    #[test]
    fn test_reroll_once() {
        let term = Reroll::new(group(2, 6), Trigger::Compare(Comparison::Less, 3), true).unwrap();
        let (value, fragment) = resolve(term, &[1, 5, 2]);
        assert_eq!(value, Number::Int(7));
        assert_eq!(fragment, "[2<-1,5]");
    }

    #[test]
    fn test_reroll_once_allows_full_cover() {
        assert!(Reroll::new(group(1, 1), Trigger::Equal(1), true).is_ok());
        assert_eq!(
            Reroll::new(group(1, 1), Trigger::Equal(1), false),
            Err(GroupErrorKind::NeverEnding)
        );
    }

    #[test]
    fn test_success() {
        let term = Success::new(group(3, 6), Comparison::Greater, 4).unwrap();
        let (value, fragment) = resolve(term, &[5, 2, 6]);
        assert_eq!(value, Number::Int(2));
        assert_eq!(fragment, "[!5,2,!6]");
    }

    #[test]
    fn test_success_bounds() {
        assert!(Success::new(group(3, 6), Comparison::Greater, 6).is_err());
        assert!(Success::new(group(3, 6), Comparison::Less, 1).is_err());
        assert!(Success::new(group(3, 6), Comparison::Less, 6).is_ok());
    }

    #[test]
    fn test_success_fail() {
        let term = SuccessFail::new(group(4, 6), Comparison::Greater, 4, 2).unwrap();
        let (value, fragment) = resolve(term, &[5, 1, 3, 1]);
        assert_eq!(value, Number::Int(-1));
        assert_eq!(fragment, "[!5,*1,3,*1]");
    }

    #[test]
    fn test_keep_highest() {
        let term = KeepDice::new(group(4, 6), true, 2).unwrap();
        let (value, fragment) = resolve(term, &[2, 6, 1, 5]);
        assert_eq!(value, Number::Int(11));
        assert_eq!(fragment, "[6,5 ~~ 2,1]");
    }

    #[test]
    fn test_keep_lowest() {
        let term = KeepDice::new(group(2, 20), false, 1).unwrap();
        let (value, fragment) = resolve(term, &[15, 4]);
        assert_eq!(value, Number::Int(4));
        assert_eq!(fragment, "[4 ~~ 15]");
    }

    #[test]
    fn test_drop_lowest() {
        let term = DropDice::new(group(4, 6), true, 1).unwrap();
        let (value, fragment) = resolve(term, &[4, 1, 6, 5]);
        assert_eq!(value, Number::Int(15));
        assert_eq!(fragment, "[4,5,6 ~~ 1]");
    }

    #[test]
    fn test_drop_highest() {
        let term = DropDice::new(group(3, 6), false, 1).unwrap();
        let (value, fragment) = resolve(term, &[4, 1, 6]);
        assert_eq!(value, Number::Int(5));
        assert_eq!(fragment, "[4,1 ~~ 6]");
    }

    #[test]
    fn test_select_count_bounds() {
        assert_eq!(
            KeepDice::new(group(2, 6), true, 5),
            Err(GroupErrorKind::SelectCount { n: 5, count: 2 })
        );
        assert!(KeepDice::new(group(2, 6), true, 2).is_err());
        assert!(DropDice::new(group(2, 6), true, 0).is_err());
    }

    #[test]
    fn test_individual() {
        let (value, fragment) = resolve(Individual::new(group(2, 6), IndividualOp::Add, 2), &[3, 5]);
        assert_eq!(value, Number::Int(12));
        assert_eq!(fragment, "[3a2,5a2]");

        let (value, _) = resolve(Individual::new(group(2, 6), IndividualOp::Sub, 4), &[1, 2]);
        assert_eq!(value, Number::Int(-5));

        let (value, _) = resolve(Individual::new(group(2, 6), IndividualOp::Mul, 3), &[1, 2]);
        assert_eq!(value, Number::Int(9));
    }

    #[test]
    fn test_individual_overflow_falls_back_to_float() {
        let term = Individual::new(group(1, UInt::MAX), IndividualOp::Mul, UInt::MAX);
        let (value, _) = resolve(term, &[UInt::MAX]);
        let exact = Float::from(UInt::MAX) * Float::from(UInt::MAX);
        assert!(matches!(value, Number::Float(x) if x == exact));
        assert!(value > Number::Int(Int::MAX));
    }

    #[test]
    fn test_literals() {
        let int = IntegerLiteral {
            value: 42,
            text: "42".to_string(),
        };
        assert_eq!(resolve(int, &[1]), (Number::Int(42), "42".to_string()));

        let float = FloatLiteral {
            value: 2.5,
            text: "2.5".to_string(),
        };
        assert_eq!(resolve(float, &[1]), (Number::Float(2.5), "2.5".to_string()));
    }
}

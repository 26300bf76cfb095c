use super::{roller::Roller, tree::*};
use crate::common::*;
use tracing::trace;

pub type DefaultRoller = rand::prelude::ThreadRng;

/// Hands out dice from a [`Roller`] for the terms of one roll, counting every draw.
pub struct RollContext<'r, R> {
    rolls: usize,
    roller: &'r mut R,
}

impl<'r, R: Roller> RollContext<'r, R> {
    pub fn new(roller: &'r mut R) -> Self {
        Self { rolls: 0, roller }
    }

    /// How many faces have been drawn so far.
    pub fn rolls(&self) -> usize {
        self.rolls
    }

    pub fn roll_one(&mut self, sides: NonZeroUInt) -> UInt {
        self.rolls += 1;
        self.roller.roll(sides)
    }

    pub fn roll_dice(&mut self, num: usize, sides: NonZeroUInt, provenance: Provenance) -> Vec<RolledDie> {
        self.rolls += num;
        self.roller
            .roll_iter(num, sides)
            .map(move |face| RolledDie::new(sides, face, provenance))
            .collect()
    }

    pub fn roll_group(&mut self, group: DiceGroup) -> Vec<RolledDie> {
        self.roll_dice(group.count.get(), group.sides, Provenance::Initial)
    }

    pub fn resolve(&mut self, term: &Term) -> TermResolution {
        let before = self.rolls;
        let resolution = term.resolve(self);
        trace!(
            value = %resolution.value,
            fragment = %resolution.fragment,
            draws = self.rolls - before,
            "resolved dice term"
        );
        resolution
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roll::{roller::StepRoller, Number};

    fn mock_roller() -> StepRoller {
        StepRoller::new(NonZeroUInt::new(10).unwrap(), 1)
    }

    fn d(sides: UInt) -> NonZeroUInt {
        NonZeroUInt::new(sides).unwrap()
    }

    #[test]
    fn test_roll_group() {
        let mut roller = mock_roller();
        let mut ctx = RollContext::new(&mut roller);
        let group = DiceGroup {
            count: Num::new(3).unwrap(),
            sides: d(6),
        };
        let faces: Vec<_> = ctx.roll_group(group).iter().map(RolledDie::outcome).collect();
        assert_eq!(faces, vec![4, 5, 6]);
        assert_eq!(ctx.rolls(), 3);
    }

    #[test]
    fn test_rolls_are_counted() {
        let mut roller = mock_roller();
        let mut ctx = RollContext::new(&mut roller);
        assert_eq!(ctx.roll_one(d(20)), 10);
        ctx.roll_dice(4, d(8), Provenance::Triggered);
        assert_eq!(ctx.rolls(), 5);
    }

    #[test]
    fn test_resolve_counts_explosions() {
        let mut roller = mock_roller();
        let mut ctx = RollContext::new(&mut roller);
        let group = DiceGroup {
            count: Num::new(1).unwrap(),
            sides: d(4),
        };
        // 10 wraps to 2 on a d4, then 3, then 4 explodes into 1
        let term: Term = Explode::new(group, Trigger::Max, false).unwrap().into();
        let first = ctx.resolve(&term);
        assert_eq!(first.value, Number::Int(2));
        let second = ctx.resolve(&term);
        assert_eq!(second.value, Number::Int(3));
        let third = ctx.resolve(&term);
        assert_eq!(third.value, Number::Int(5));
        assert_eq!(third.fragment, "[!4,1]");
        assert_eq!(ctx.rolls(), 4);
    }
}

use std::fmt::{self, Write};
use std::num::{NonZeroU32, NonZeroUsize};
pub use vec1::vec1;

pub type Int = i64;
pub type UInt = u32;
pub type NonZeroUInt = NonZeroU32;

pub type Float = f64;

pub type Num = NonZeroUsize;

pub type NonEmpty<T> = vec1::Vec1<T>;

/// A strict threshold comparison, as written after a dice group (`>4`, `<2`).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Comparison {
    Greater,
    Less,
}

impl Comparison {
    pub fn test(self, value: UInt, threshold: UInt) -> bool {
        match self {
            Self::Greater => value > threshold,
            Self::Less => value < threshold,
        }
    }

    pub const fn flipped(self) -> Self {
        match self {
            Self::Greater => Self::Less,
            Self::Less => Self::Greater,
        }
    }

    /// Thresholds must leave at least one face on each side of the comparison:
    /// `>V` needs `0 < V < sides`, `<V` needs `1 < V <= sides`.
    pub fn in_bounds(self, threshold: UInt, sides: NonZeroUInt) -> bool {
        match self {
            Self::Greater => 0 < threshold && threshold < sides.get(),
            Self::Less => 1 < threshold && threshold <= sides.get(),
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Self::Greater => '>',
            Self::Less => '<',
        };
        f.write_char(c)
    }
}

/// What makes a die explode, penetrate or get rerolled.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Trigger {
    Max,
    Equal(UInt),
    Compare(Comparison, UInt),
}

impl Trigger {
    pub fn matches(self, value: UInt, sides: NonZeroUInt) -> bool {
        match self {
            Self::Max => value == sides.get(),
            Self::Equal(x) => value == x,
            Self::Compare(cmp, x) => cmp.test(value, x),
        }
    }

    pub fn in_bounds(self, sides: NonZeroUInt) -> bool {
        match self {
            Self::Max => true,
            Self::Equal(x) => 0 < x && x <= sides.get(),
            Self::Compare(cmp, x) => cmp.in_bounds(x, sides),
        }
    }

    /// True when no face can escape the trigger, so a repeating loop would never end.
    pub fn covers_all(self, sides: NonZeroUInt) -> bool {
        match self {
            Self::Max => sides.get() == 1,
            Self::Equal(x) => sides.get() == 1 && x == 1,
            Self::Compare(Comparison::Greater, x) => x == 0,
            Self::Compare(Comparison::Less, x) => x > sides.get(),
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Max => Ok(()),
            Self::Equal(x) => write!(f, "{}", x),
            Self::Compare(cmp, x) => write!(f, "{}{}", cmp, x),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Operator {
    Plus,
    Minus,
    Star,
    Slash,
    LeftParen,
    RightParen,
    Comma,
}

impl Operator {
    pub const fn from_char(c: char) -> Option<Self> {
        Some(match c {
            '+' => Self::Plus,
            '-' => Self::Minus,
            '*' => Self::Star,
            '/' => Self::Slash,
            '(' => Self::LeftParen,
            ')' => Self::RightParen,
            ',' => Self::Comma,
            _ => return None,
        })
    }

    pub const fn as_char(self) -> char {
        match self {
            Self::Plus => '+',
            Self::Minus => '-',
            Self::Star => '*',
            Self::Slash => '/',
            Self::LeftParen => '(',
            Self::RightParen => ')',
            Self::Comma => ',',
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(self.as_char())
    }
}

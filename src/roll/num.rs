use crate::common::*;
use std::fmt;

/// The value of a term or a whole roll: integral unless float mode produced a fraction.
#[derive(Debug, Copy, Clone)]
pub enum Number {
    Int(Int),
    Float(Float),
}

impl Number {
    pub const ZERO: Self = Self::Int(0);
    pub const ONE: Self = Self::Int(1);

    pub fn as_float(self) -> Float {
        match self {
            Self::Int(x) => x as Float,
            Self::Float(x) => x,
        }
    }

    pub fn is_zero(self) -> bool {
        match self {
            Self::Int(x) => x == 0,
            Self::Float(x) => x == 0.0,
        }
    }

    pub fn is_finite(self) -> bool {
        match self {
            Self::Int(_) => true,
            Self::Float(x) => x.is_finite(),
        }
    }

    /// Drops any fractional part, rounding toward zero.
    pub(crate) fn truncate(self) -> Self {
        match self {
            Self::Int(_) => self,
            Self::Float(x) if x.trunc() >= Int::MIN as Float && x.trunc() < Int::MAX as Float => {
                Self::Int(x.trunc() as Int)
            }
            Self::Float(x) => Self::Float(x.trunc()),
        }
    }

    pub fn abs(self) -> Self {
        match self {
            Self::Int(x) => x.checked_abs().map_or(Self::Float((x as Float).abs()), Self::Int),
            Self::Float(x) => Self::Float(x.abs()),
        }
    }

    /// Divides, keeping integers integral when the quotient is exact.
    /// The caller has already rejected a zero divisor.
    pub(crate) fn quotient(self, divisor: Self) -> Self {
        match (self, divisor) {
            (Self::Int(x), Self::Int(y)) if y != 0 && x.checked_rem(y) == Some(0) => {
                x.checked_div(y).map_or(Self::Float(x as Float / y as Float), Self::Int)
            }
            (x, y) => Self::Float(x.as_float() / y.as_float()),
        }
    }

    /// Renders the value so the arithmetic lexer reads it back unchanged.
    pub(crate) fn to_source(self) -> String {
        match self {
            Self::Int(x) => x.to_string(),
            Self::Float(x) if x.fract() == 0.0 && x.abs() < 1e15 => format!("{}", x as Int),
            Self::Float(x) => format!("{}", x),
        }
    }
}

impl std::ops::Neg for Number {
    type Output = Self;

    fn neg(self) -> Self::Output {
        match self {
            Self::Int(x) => x.checked_neg().map_or(Self::Float(-(x as Float)), Self::Int),
            Self::Float(x) => Self::Float(-x),
        }
    }
}

macro_rules! num_impl_bin_op {
    ($Name:ident, $fn_name:ident, $checked:ident) => {
        impl std::ops::$Name for Number {
            type Output = Self;

            fn $fn_name(self, rhs: Self) -> Self::Output {
                match (self, rhs) {
                    (Self::Int(x), Self::Int(y)) => x
                        .$checked(y)
                        .map_or_else(|| Self::Float(std::ops::$Name::$fn_name(x as Float, y as Float)), Self::Int),
                    (x, y) => Self::Float(std::ops::$Name::$fn_name(x.as_float(), y.as_float())),
                }
            }
        }
    };
}

num_impl_bin_op!(Add, add, checked_add);
num_impl_bin_op!(Sub, sub, checked_sub);
num_impl_bin_op!(Mul, mul, checked_mul);

impl std::iter::Sum for Number {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |a, b| a + b)
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Int(x), Self::Int(y)) => x == y,
            (x, y) => x.as_float().eq(&y.as_float()),
        }
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        match (self, other) {
            (Self::Int(x), Self::Int(y)) => x.partial_cmp(y),
            (x, y) => x.as_float().partial_cmp(&y.as_float()),
        }
    }
}

impl From<Int> for Number {
    fn from(x: Int) -> Self {
        Self::Int(x)
    }
}

impl From<Float> for Number {
    fn from(x: Float) -> Self {
        Self::Float(x)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(x) => fmt::Display::fmt(x, f),
            Self::Float(x) => fmt::Debug::fmt(x, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_arithmetic_stays_integral() {
        assert_eq!(Number::Int(2) + Number::Int(3), Number::Int(5));
        assert!(matches!(Number::Int(2) * Number::Int(3), Number::Int(6)));
        assert!(matches!(-Number::Int(4), Number::Int(-4)));
    }

    #[test]
    fn test_overflow_falls_back_to_float() {
        let big = Number::Int(Int::MAX);
        assert!(matches!(big + Number::ONE, Number::Float(_)));
        assert!(matches!(-Number::Int(Int::MIN), Number::Float(_)));
    }

    #[test]
    fn test_quotient() {
        assert!(matches!(Number::Int(49).quotient(Number::Int(49)), Number::Int(1)));
        assert_eq!(Number::Int(7).quotient(Number::Int(2)), Number::Float(3.5));
    }

    #[test]
    fn test_truncate() {
        assert!(matches!(Number::Float(3.9).truncate(), Number::Int(3)));
        assert!(matches!(Number::Float(-3.9).truncate(), Number::Int(-3)));
    }

    #[test]
    fn test_to_source() {
        assert_eq!(Number::Int(-3).to_source(), "-3");
        assert_eq!(Number::Float(2.0).to_source(), "2");
        assert_eq!(Number::Float(0.25).to_source(), "0.25");
        assert_eq!(Number::Float(1e20).to_source(), "100000000000000000000");
    }

    #[test]
    fn test_display() {
        assert_eq!(Number::Int(7).to_string(), "7");
        assert_eq!(Number::Float(2.0).to_string(), "2.0");
    }
}

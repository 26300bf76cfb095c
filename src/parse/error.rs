use crate::common::UInt;
use std::fmt;
use thiserror::Error;

/// A dice term that matched no form, or matched one but broke its bounds.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{group:?} is not a valid dice group: {kind}")]
pub struct GroupSyntaxError {
    pub group: String,
    pub kind: GroupErrorKind,
}

impl GroupSyntaxError {
    pub(crate) fn new(group: impl Into<String>, kind: GroupErrorKind) -> Self {
        Self {
            group: group.into(),
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupErrorKind {
    Unrecognized,
    MissingFaces,
    ZeroCount,
    InvalidFaces,
    ThresholdOutOfRange { threshold: String, sides: UInt },
    SelectCount { n: usize, count: usize },
    NeverEnding,
    FloatsDisabled,
    LiteralOutOfRange,
}

impl fmt::Display for GroupErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unrecognized => write!(f, "unrecognized dice notation"),
            Self::MissingFaces => write!(f, "expected the number of faces after 'd'"),
            Self::ZeroCount => write!(f, "at least one die must be rolled"),
            Self::InvalidFaces => write!(f, "dice need between 1 and {} faces", UInt::MAX),
            Self::ThresholdOutOfRange { threshold, sides } => {
                write!(f, "threshold {} is out of range for a d{}", threshold, sides)
            }
            Self::SelectCount { n, count } => write!(
                f,
                "can only keep or drop between 1 and {} of {} dice, not {}",
                count.saturating_sub(1),
                count,
                n
            ),
            Self::NeverEnding => write!(f, "every face matches the trigger, so the roll would never end"),
            Self::FloatsDisabled => write!(f, "decimal numbers are not enabled"),
            Self::LiteralOutOfRange => write!(f, "number is too large"),
        }
    }
}

//! Rolls dice expressions like `4d6K3 + 2` or `abs(1d20 - 10) * 2`, returning
//! the value together with an explanation that shows every die.
//!
//! ```no_run
//! let (value, explanation) = rolldice::roll("4d6K3 + 2").unwrap();
//! println!("{} = {}", explanation, value);
//! ```
//!
//! Each dice term supports one modifier:
//!
//! | Notation | Meaning |
//! |---|---|
//! | `NdM` | sum of N M-sided dice (`N` defaults to 1) |
//! | `NdM!`, `NdM!V`, `NdM!>V`, `NdM!<V` | exploding dice |
//! | `NdM!p` (same triggers) | penetrating dice, added dice count one less |
//! | `NdM>V`, `NdM<V` | number of successes |
//! | `NdM>SfF`, `NdM<SfF` | successes minus failures |
//! | `NdMK[n]`, `NdMk[n]` | keep the highest / lowest n |
//! | `NdMX[n]`, `NdMx[n]` | drop the lowest / highest n |
//! | `NdMR[V]`, `NdMr[V]` | reroll matching dice until clear / once |
//! | `NdMaV`, `NdMsV`, `NdMmV` | add to / subtract from / multiply each die |

mod bag;
mod common;
mod config;
mod dice;
mod error;
pub mod eval;
pub mod parse;
pub mod roll;

pub use bag::DiceBag;
pub use common::{Comparison, Float, Int, NonZeroUInt, Operator, Trigger, UInt};
pub use config::RollConfig;
pub use dice::{roll, DiceRoller};
pub use error::DiceError;
pub use eval::{Arity, Evaluator, ExpressionError, FunctionRegistry};
pub use parse::{tokenize, GroupSyntaxError, Token};
pub use roll::{DefaultRoller, Number, Roller};

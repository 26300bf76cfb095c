use crate::roll::Number;
use std::collections::HashMap;
use std::fmt;

pub type NativeFn = fn(&[Number]) -> Number;

/// How many arguments a function accepts.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Arity {
    Exactly(usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(self, n: usize) -> bool {
        match self {
            Self::Exactly(x) => n == x,
            Self::AtLeast(x) => n >= x,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exactly(1) => write!(f, "exactly 1 argument"),
            Self::Exactly(n) => write!(f, "exactly {} arguments", n),
            Self::AtLeast(1) => write!(f, "at least 1 argument"),
            Self::AtLeast(n) => write!(f, "at least {} arguments", n),
        }
    }
}

#[derive(Copy, Clone)]
pub struct Function {
    pub arity: Arity,
    pub call: NativeFn,
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function").field("arity", &self.arity).finish_non_exhaustive()
    }
}

/// Named functions an expression may call, like `abs(1d6-4)`.
#[derive(Debug, Clone)]
pub struct FunctionRegistry {
    functions: HashMap<String, Function>,
}

impl FunctionRegistry {
    /// A registry with nothing in it.
    pub fn empty() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }

    pub fn register(&mut self, name: impl Into<String>, arity: Arity, call: NativeFn) -> &mut Self {
        self.functions.insert(name.into(), Function { arity, call });
        self
    }

    pub fn get(&self, name: &str) -> Option<&Function> {
        self.functions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }
}

/// `abs`, `min` and `max`.
impl Default for FunctionRegistry {
    fn default() -> Self {
        let mut ret = Self::empty();
        ret.register("abs", Arity::Exactly(1), abs)
            .register("min", Arity::AtLeast(1), min)
            .register("max", Arity::AtLeast(1), max);
        ret
    }
}

fn abs(args: &[Number]) -> Number {
    args.first().map_or(Number::ZERO, |x| x.abs())
}

fn min(args: &[Number]) -> Number {
    args.iter()
        .copied()
        .reduce(|a, b| if b < a { b } else { a })
        .unwrap_or(Number::ZERO)
}

fn max(args: &[Number]) -> Number {
    args.iter()
        .copied()
        .reduce(|a, b| if b > a { b } else { a })
        .unwrap_or(Number::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let registry = FunctionRegistry::default();
        let mut names: Vec<_> = registry.names().collect();
        names.sort_unstable();
        assert_eq!(names, vec!["abs", "max", "min"]);

        let abs = registry.get("abs").unwrap();
        assert_eq!((abs.call)(&[Number::Int(-4)]), Number::Int(4));
        let max = registry.get("max").unwrap();
        assert_eq!((max.call)(&[Number::Int(2), Number::Float(2.5), Number::Int(-1)]), Number::Float(2.5));
        let min = registry.get("min").unwrap();
        assert_eq!((min.call)(&[Number::Int(2), Number::Int(-1)]), Number::Int(-1));
    }

    #[test]
    fn test_names_are_exact() {
        let registry = FunctionRegistry::default();
        assert!(registry.contains("abs"));
        assert!(!registry.contains("ABS"));
        assert!(!registry.contains("ab"));
    }

    #[test]
    fn test_arity() {
        assert!(Arity::Exactly(1).accepts(1));
        assert!(!Arity::Exactly(1).accepts(2));
        assert!(Arity::AtLeast(1).accepts(3));
        assert!(!Arity::AtLeast(1).accepts(0));
        assert_eq!(Arity::AtLeast(2).to_string(), "at least 2 arguments");
    }

    #[test]
    fn test_register() {
        fn double(args: &[Number]) -> Number {
            args[0] * Number::Int(2)
        }

        let mut registry = FunctionRegistry::empty();
        registry.register("double", Arity::Exactly(1), double);
        assert!(registry.contains("double"));
        assert!(!registry.contains("abs"));
    }
}

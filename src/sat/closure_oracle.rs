use super::{CadicalOracle, UnitPropagator};
use std::{
    fmt::Display,
    num::{NonZeroIsize, NonZeroUsize},
    rc::Rc,
};

/// A variable in a propositional oracle.
///
/// A variable is represented by a non-null positive integer.
/// It can be obtained through the [From] trait from an integer type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Variable(NonZeroUsize);

macro_rules! impl_var_from {
    ($t: ty) => {
        impl From<$t> for Variable {
            fn from(v: $t) -> Self {
                Self(NonZeroUsize::try_from(v as usize).unwrap())
            }
        }
    };
}
impl_var_from!(usize);
impl_var_from!(u64);
impl_var_from!(u32);

macro_rules! impl_var_from_neg {
    ($t: ty) => {
        impl From<$t> for Variable {
            fn from(v: $t) -> Self {
                if v < 0 {
                    panic!("cannot build a variable from a negative integer")
                }
                Self(NonZeroUsize::try_from(v as usize).unwrap())
            }
        }
    };
}
impl_var_from_neg!(isize);
impl_var_from_neg!(i64);
impl_var_from_neg!(i32);

impl From<Variable> for usize {
    fn from(v: Variable) -> Self {
        v.0.into()
    }
}

/// A literal in a propositional oracle.
///
/// A literal is represented by a non-null integer.
/// It can be obtained through the [From] trait from a signed integer type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Literal(NonZeroIsize);

impl Literal {
    /// Builds the positive literal of a variable.
    pub fn positive(v: Variable) -> Self {
        Self::from(usize::from(v) as isize)
    }

    /// Returns the opposite literal.
    pub fn negate(self) -> Self {
        Self::from(-self.0.get())
    }

    /// Returns the variable of this literal.
    pub fn var(&self) -> Variable {
        Variable(self.0.unsigned_abs())
    }

    /// Returns `true` iff this literal is positive.
    pub fn is_positive(&self) -> bool {
        self.0.get() > 0
    }
}

macro_rules! impl_lit_from {
    ($t: ty) => {
        impl From<$t> for Literal {
            fn from(l: $t) -> Self {
                Self(NonZeroIsize::try_from(l as isize).unwrap())
            }
        }
    };
}
impl_lit_from!(isize);
impl_lit_from!(i64);
impl_lit_from!(i32);

impl From<Literal> for isize {
    fn from(l: Literal) -> Self {
        l.0.into()
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Builds a clause from a list of integers.
#[macro_export]
macro_rules! clause {
    () => (
        vec![] as Vec<$crate::sat::Literal>
    );
    ($($x:expr),+ $(,)?) => (
        [$($x),+].into_iter().map($crate::sat::Literal::from).collect::<Vec<$crate::sat::Literal>>()
    );
}

/// A trait for incremental oracles answering unit propagation queries.
///
/// Clauses are loaded once; each query is made under a list of assumed literals,
/// and does not alter the clause set, so the same oracle can answer any number of queries.
pub trait ClosureOracle {
    /// Adds a clause to this oracle.
    fn add_clause(&mut self, cl: Vec<Literal>);

    /// Returns the literals forced to true by the clauses under the provided assumptions, assumptions included.
    ///
    /// In case a conflict arises, the literals forced before the conflict are returned.
    fn propagate(&mut self, assumptions: &[Literal]) -> Vec<Literal>;

    /// Returns the highest variable index involved in the clauses added so far.
    fn n_vars(&self) -> usize;
}

/// A trait for objects building [`ClosureOracle`] instances.
///
/// A framework keeps its factory to rebuild its oracle when its rules change.
pub trait ClosureOracleFactory {
    /// Builds a new, empty, oracle.
    fn new_oracle(&self) -> Box<dyn ClosureOracle>;
}

/// A factory for the embedded unit propagator.
#[derive(Default)]
pub struct DefaultClosureOracleFactory;

impl ClosureOracleFactory for DefaultClosureOracleFactory {
    fn new_oracle(&self) -> Box<dyn ClosureOracle> {
        Box::<UnitPropagator>::default()
    }
}

/// A factory for the oracle backed by the CaDiCaL SAT solver.
#[derive(Default)]
pub struct CadicalClosureOracleFactory;

impl ClosureOracleFactory for CadicalClosureOracleFactory {
    fn new_oracle(&self) -> Box<dyn ClosureOracle> {
        Box::<CadicalOracle>::default()
    }
}

/// Returns the factory used by frameworks that are not given one explicitly.
pub fn default_oracle_factory() -> Rc<dyn ClosureOracleFactory> {
    Rc::new(DefaultClosureOracleFactory)
}

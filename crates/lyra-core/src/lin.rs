//! Sparse linear expressions

use crate::var::Var;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Add, Neg, Sub};

/// A linear expression `Σ c_i · x_i + k` with exact rational coefficients.
///
/// Coefficients are kept in a `BTreeMap` ordered by variable id, which gives
/// every expression a single canonical form: iteration order is deterministic,
/// and [`Lin::to_string`](fmt::Display) renders structurally identical
/// expressions identically (the solver's expression cache keys on it).
///
/// Invariant: stored coefficients are nonzero. All mutating operations go
/// through [`Lin::add_scaled`], which drops entries that cancel to zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lin {
    /// Variable coefficients, nonzero, ordered by variable id
    pub vars: BTreeMap<Var, BigRational>,
    /// The constant term
    pub known_term: BigRational,
}

impl Default for Lin {
    fn default() -> Self {
        Lin {
            vars: BTreeMap::new(),
            known_term: BigRational::zero(),
        }
    }
}

impl Lin {
    /// The empty expression `0`
    pub fn new() -> Self {
        Lin::default()
    }

    /// The single-variable expression `x`
    pub fn var(x: Var) -> Self {
        Lin::term(x, BigRational::one())
    }

    /// The single-term expression `c·x` (empty when `c` is zero)
    pub fn term(x: Var, c: BigRational) -> Self {
        let mut vars = BTreeMap::new();
        if !c.is_zero() {
            vars.insert(x, c);
        }
        Lin {
            vars,
            known_term: BigRational::zero(),
        }
    }

    /// The constant expression `k`
    pub fn constant(k: BigRational) -> Self {
        Lin {
            vars: BTreeMap::new(),
            known_term: k,
        }
    }

    /// The coefficient of `x`, if present
    #[inline]
    pub fn coef(&self, x: Var) -> Option<&BigRational> {
        self.vars.get(&x)
    }

    /// Add `factor · other` into this expression, dropping coefficients that
    /// cancel to zero.
    ///
    /// This is the one primitive all row arithmetic reduces to: expression
    /// sums, basic-variable substitution and pivot row rewrites are all
    /// `add_scaled` with different factors.
    pub fn add_scaled(&mut self, other: &Lin, factor: &BigRational) {
        if factor.is_zero() {
            return;
        }
        for (x, c) in &other.vars {
            let scaled = c * factor;
            match self.vars.entry(*x) {
                std::collections::btree_map::Entry::Occupied(mut e) => {
                    *e.get_mut() += scaled;
                    if e.get().is_zero() {
                        e.remove();
                    }
                }
                std::collections::btree_map::Entry::Vacant(e) => {
                    e.insert(scaled);
                }
            }
        }
        self.known_term += &other.known_term * factor;
    }
}

impl From<Var> for Lin {
    fn from(x: Var) -> Self {
        Lin::var(x)
    }
}

impl From<i64> for Lin {
    fn from(n: i64) -> Self {
        Lin::constant(BigRational::from_integer(BigInt::from(n)))
    }
}

impl From<BigRational> for Lin {
    fn from(q: BigRational) -> Self {
        Lin::constant(q)
    }
}

impl Add for Lin {
    type Output = Lin;

    fn add(mut self, rhs: Lin) -> Lin {
        self.add_scaled(&rhs, &BigRational::one());
        self
    }
}

impl Sub for Lin {
    type Output = Lin;

    fn sub(mut self, rhs: Lin) -> Lin {
        self.add_scaled(&rhs, &-BigRational::one());
        self
    }
}

impl Add<i64> for Lin {
    type Output = Lin;

    fn add(mut self, rhs: i64) -> Lin {
        self.known_term += BigRational::from_integer(BigInt::from(rhs));
        self
    }
}

impl Sub<i64> for Lin {
    type Output = Lin;

    fn sub(self, rhs: i64) -> Lin {
        self + (-rhs)
    }
}

impl Neg for Lin {
    type Output = Lin;

    fn neg(self) -> Lin {
        let mut out = Lin::new();
        out.add_scaled(&self, &-BigRational::one());
        out
    }
}

impl fmt::Display for Lin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn write_term(
            f: &mut fmt::Formatter<'_>,
            magnitude: &BigRational,
            x: Var,
        ) -> fmt::Result {
            if magnitude.is_one() {
                write!(f, "{}", x)
            } else {
                write!(f, "{}*{}", magnitude, x)
            }
        }

        let mut first = true;
        for (x, c) in &self.vars {
            if first {
                if c.is_negative() {
                    write!(f, "-")?;
                }
                write_term(f, &c.abs(), *x)?;
                first = false;
            } else {
                write!(f, " {} ", if c.is_negative() { '-' } else { '+' })?;
                write_term(f, &c.abs(), *x)?;
            }
        }
        if first {
            write!(f, "{}", self.known_term)
        } else if self.known_term.is_zero() {
            Ok(())
        } else {
            write!(
                f,
                " {} {}",
                if self.known_term.is_negative() { '-' } else { '+' },
                self.known_term.abs()
            )
        }
    }
}

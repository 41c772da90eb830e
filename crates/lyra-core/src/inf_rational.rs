//! Rationals augmented with an infinitesimal coordinate

use crate::rational::Rational;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub};

/// A rational extended with a symbolic infinitesimal: `q + k·ε`.
///
/// ε is a positive quantity smaller than every positive rational, so the
/// derived lexicographic order gives `q - ε < q < q + ε` for every `q`.
/// Strict inequalities become non-strict ones over this type: `x < c` is
/// `x ≤ c - ε`, which keeps the pivoting machinery identical for strict and
/// non-strict constraints.
///
/// The rational coordinate may be infinite (unbounded variables); the
/// infinitesimal coefficient is always finite.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct InfRational {
    rational: Rational,
    infinitesimal: BigRational,
}

impl InfRational {
    /// Build a value with a zero infinitesimal part
    pub fn new(rational: impl Into<Rational>) -> Self {
        InfRational {
            rational: rational.into(),
            infinitesimal: BigRational::zero(),
        }
    }

    /// Build a value with an explicit infinitesimal coefficient
    pub fn with_infinitesimal(rational: impl Into<Rational>, infinitesimal: BigRational) -> Self {
        InfRational {
            rational: rational.into(),
            infinitesimal,
        }
    }

    /// `rational - ε`, the greatest value strictly below `rational`
    /// expressible with a unit infinitesimal
    pub fn just_below(rational: impl Into<Rational>) -> Self {
        InfRational::with_infinitesimal(rational, -BigRational::one())
    }

    /// `rational + ε`, the least value strictly above `rational`
    /// expressible with a unit infinitesimal
    pub fn just_above(rational: impl Into<Rational>) -> Self {
        InfRational::with_infinitesimal(rational, BigRational::one())
    }

    /// The zero value
    pub fn zero() -> Self {
        InfRational::new(Rational::zero())
    }

    /// The `-inf` sentinel
    pub fn negative_infinite() -> Self {
        InfRational::new(Rational::NegativeInfinite)
    }

    /// The `+inf` sentinel
    pub fn positive_infinite() -> Self {
        InfRational::new(Rational::PositiveInfinite)
    }

    /// The rational coordinate
    #[inline]
    pub fn rational(&self) -> &Rational {
        &self.rational
    }

    /// The infinitesimal coefficient
    #[inline]
    pub fn infinitesimal(&self) -> &BigRational {
        &self.infinitesimal
    }

    /// Check whether this is exactly zero (both coordinates)
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.rational.is_zero() && self.infinitesimal.is_zero()
    }

    /// Check whether this is strictly positive in the lexicographic order
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.rational.is_positive()
            || (self.rational.is_zero() && self.infinitesimal.is_positive())
    }

    /// Check whether this is strictly negative in the lexicographic order
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.rational.is_negative()
            || (self.rational.is_zero() && self.infinitesimal.is_negative())
    }

    /// Check whether the rational coordinate is infinite
    #[inline]
    pub fn is_infinite(&self) -> bool {
        self.rational.is_infinite()
    }
}

impl Default for InfRational {
    fn default() -> Self {
        InfRational::zero()
    }
}

impl From<i64> for InfRational {
    fn from(n: i64) -> Self {
        InfRational::new(Rational::from_integer(n))
    }
}

impl From<BigRational> for InfRational {
    fn from(q: BigRational) -> Self {
        InfRational::new(Rational::Finite(q))
    }
}

impl From<Rational> for InfRational {
    fn from(r: Rational) -> Self {
        InfRational::new(r)
    }
}

impl Add for InfRational {
    type Output = InfRational;

    fn add(self, rhs: InfRational) -> InfRational {
        InfRational {
            rational: self.rational + rhs.rational,
            infinitesimal: self.infinitesimal + rhs.infinitesimal,
        }
    }
}

impl AddAssign for InfRational {
    fn add_assign(&mut self, rhs: InfRational) {
        let lhs = std::mem::replace(self, InfRational::zero());
        *self = lhs + rhs;
    }
}

impl Sub for InfRational {
    type Output = InfRational;

    fn sub(self, rhs: InfRational) -> InfRational {
        self + (-rhs)
    }
}

impl Neg for InfRational {
    type Output = InfRational;

    fn neg(self) -> InfRational {
        InfRational {
            rational: -self.rational,
            infinitesimal: -self.infinitesimal,
        }
    }
}

impl Mul<&BigRational> for InfRational {
    type Output = InfRational;

    fn mul(self, rhs: &BigRational) -> InfRational {
        InfRational {
            rational: self.rational * rhs,
            infinitesimal: self.infinitesimal * rhs,
        }
    }
}

impl Div<&BigRational> for InfRational {
    type Output = InfRational;

    fn div(self, rhs: &BigRational) -> InfRational {
        InfRational {
            rational: self.rational / rhs,
            infinitesimal: self.infinitesimal / rhs,
        }
    }
}

impl fmt::Display for InfRational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.infinitesimal.is_zero() {
            return write!(f, "{}", self.rational);
        }
        write!(f, "{}", self.rational)?;
        let abs = self.infinitesimal.abs();
        let sign = if self.infinitesimal.is_negative() {
            '-'
        } else {
            '+'
        };
        if abs.is_one() {
            write!(f, " {} ε", sign)
        } else {
            write!(f, " {} {}*ε", sign, abs)
        }
    }
}

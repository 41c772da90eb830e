//! Exact rationals with distinguished infinities

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, Zero};
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// An exact rational number extended with `-inf` and `+inf` sentinels.
///
/// The infinities exist so that unbounded variables can report their bounds
/// through the same type as bounded ones. Arithmetic involving opposite
/// infinities (`+inf + -inf`, scaling an infinity by zero) has no meaningful
/// result; such combinations are logic errors and are `debug_assert!`ed.
///
/// The derived order is total: `NegativeInfinite < Finite(q) < PositiveInfinite`,
/// with finite values compared exactly.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rational {
    /// The `-inf` sentinel, less than every finite rational
    NegativeInfinite,
    /// A finite exact rational
    Finite(BigRational),
    /// The `+inf` sentinel, greater than every finite rational
    PositiveInfinite,
}

impl Rational {
    /// The rational zero
    pub fn zero() -> Self {
        Rational::Finite(BigRational::zero())
    }

    /// Build a finite rational from an integer
    pub fn from_integer(n: i64) -> Self {
        Rational::Finite(BigRational::from_integer(BigInt::from(n)))
    }

    /// Build a finite rational `num / den`
    ///
    /// `den` must be nonzero.
    pub fn new(num: i64, den: i64) -> Self {
        Rational::Finite(BigRational::new(BigInt::from(num), BigInt::from(den)))
    }

    /// Check whether this is the finite zero
    #[inline]
    pub fn is_zero(&self) -> bool {
        matches!(self, Rational::Finite(q) if q.is_zero())
    }

    /// Check whether this is strictly positive (including `+inf`)
    #[inline]
    pub fn is_positive(&self) -> bool {
        match self {
            Rational::NegativeInfinite => false,
            Rational::Finite(q) => q.is_positive(),
            Rational::PositiveInfinite => true,
        }
    }

    /// Check whether this is strictly negative (including `-inf`)
    #[inline]
    pub fn is_negative(&self) -> bool {
        match self {
            Rational::NegativeInfinite => true,
            Rational::Finite(q) => q.is_negative(),
            Rational::PositiveInfinite => false,
        }
    }

    /// Check whether this is one of the infinity sentinels
    #[inline]
    pub fn is_infinite(&self) -> bool {
        !matches!(self, Rational::Finite(_))
    }

    /// View the finite value, if any
    #[inline]
    pub fn as_finite(&self) -> Option<&BigRational> {
        match self {
            Rational::Finite(q) => Some(q),
            _ => None,
        }
    }
}

impl From<BigRational> for Rational {
    fn from(q: BigRational) -> Self {
        Rational::Finite(q)
    }
}

impl From<i64> for Rational {
    fn from(n: i64) -> Self {
        Rational::from_integer(n)
    }
}

impl Add for Rational {
    type Output = Rational;

    fn add(self, rhs: Rational) -> Rational {
        use Rational::*;
        match (self, rhs) {
            (Finite(a), Finite(b)) => Finite(a + b),
            (PositiveInfinite, NegativeInfinite) | (NegativeInfinite, PositiveInfinite) => {
                debug_assert!(false, "adding opposite infinities");
                PositiveInfinite
            }
            (PositiveInfinite, _) | (_, PositiveInfinite) => PositiveInfinite,
            (NegativeInfinite, _) | (_, NegativeInfinite) => NegativeInfinite,
        }
    }
}

impl Sub for Rational {
    type Output = Rational;

    fn sub(self, rhs: Rational) -> Rational {
        self + (-rhs)
    }
}

impl Neg for Rational {
    type Output = Rational;

    fn neg(self) -> Rational {
        match self {
            Rational::NegativeInfinite => Rational::PositiveInfinite,
            Rational::Finite(q) => Rational::Finite(-q),
            Rational::PositiveInfinite => Rational::NegativeInfinite,
        }
    }
}

impl Mul<&BigRational> for Rational {
    type Output = Rational;

    fn mul(self, rhs: &BigRational) -> Rational {
        match self {
            Rational::Finite(q) => Rational::Finite(q * rhs),
            inf => {
                debug_assert!(!rhs.is_zero(), "scaling an infinity by zero");
                if rhs.is_negative() {
                    -inf
                } else {
                    inf
                }
            }
        }
    }
}

impl Div<&BigRational> for Rational {
    type Output = Rational;

    fn div(self, rhs: &BigRational) -> Rational {
        debug_assert!(!rhs.is_zero(), "division by zero");
        match self {
            Rational::Finite(q) => Rational::Finite(q / rhs),
            inf => {
                if rhs.is_negative() {
                    -inf
                } else {
                    inf
                }
            }
        }
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rational::NegativeInfinite => write!(f, "-inf"),
            Rational::Finite(q) => write!(f, "{}", q),
            Rational::PositiveInfinite => write!(f, "+inf"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_total_order() {
        assert!(Rational::NegativeInfinite < Rational::from_integer(-1_000_000));
        assert!(Rational::from_integer(1_000_000) < Rational::PositiveInfinite);
        assert!(Rational::new(1, 3) < Rational::new(1, 2));
        assert!(Rational::NegativeInfinite < Rational::PositiveInfinite);
    }

    #[test]
    fn test_predicates() {
        assert!(Rational::zero().is_zero());
        assert!(Rational::PositiveInfinite.is_positive());
        assert!(Rational::NegativeInfinite.is_negative());
        assert!(Rational::PositiveInfinite.is_infinite());
        assert!(!Rational::new(-3, 4).is_infinite());
        assert!(Rational::new(-3, 4).is_negative());
    }

    #[test]
    fn test_infinity_absorbs_finite() {
        let sum = Rational::PositiveInfinite + Rational::from_integer(42);
        assert_eq!(sum, Rational::PositiveInfinite);
        let sum = Rational::NegativeInfinite + Rational::NegativeInfinite;
        assert_eq!(sum, Rational::NegativeInfinite);
    }

    #[test]
    fn test_scaling_flips_sign() {
        let minus_two = BigRational::from_integer((-2).into());
        assert_eq!(
            Rational::PositiveInfinite * &minus_two,
            Rational::NegativeInfinite
        );
        assert_eq!(Rational::new(1, 2) * &minus_two, Rational::from_integer(-1));
    }

    proptest! {
        #[test]
        fn prop_add_commutes(a in -1000i64..1000, b in -1000i64..1000) {
            let x = Rational::from_integer(a) + Rational::from_integer(b);
            let y = Rational::from_integer(b) + Rational::from_integer(a);
            prop_assert_eq!(x, y);
        }

        #[test]
        fn prop_neg_involutive(n in -1000i64..1000, d in 1i64..100) {
            let q = Rational::new(n, d);
            prop_assert_eq!(-(-q.clone()), q);
        }

        #[test]
        fn prop_order_matches_integers(a in -1000i64..1000, b in -1000i64..1000) {
            prop_assert_eq!(
                Rational::from_integer(a) < Rational::from_integer(b),
                a < b
            );
        }
    }
}

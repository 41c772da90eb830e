//! Lyra simplex - incremental, retractable linear feasibility over the rationals
//!
//! Answers: does a real assignment exist for a dynamic set of variables
//! satisfying every currently asserted linear (in)equality? Built on the
//! general simplex with bounds of Dutertre and de Moura, extended with:
//!
//! - **strict inequalities** through δ-symbolic infinitesimals
//!   (`x < c` is `x ≤ c - ε`, so the pivot loop never special-cases
//!   strictness);
//! - **reason-tagged multi-set bounds**, so constraints can be retracted in
//!   any order: each bound value tracks the set of reasons asserting it,
//!   and a dominating bound stays effective as long as one reason survives;
//! - **slack reuse**: structurally identical compound expressions are
//!   interned to a single slack variable and tableau row.
//!
//! The solver keeps a sound valuation available at all times, and when a
//! [`Solver::check`] fails it explains itself with a small jointly
//! inconsistent subset of the asserted constraints.
//!
//! ## Example
//!
//! ```
//! use lyra_simplex::{Lin, Solver};
//!
//! let mut s = Solver::new();
//! let x = s.new_var();
//! let y = s.new_var();
//!
//! let c0 = s.new_constraint();
//! let c1 = s.new_constraint();
//! assert!(s.new_gt(Lin::var(x) + Lin::var(y), Lin::from(1), false, Some(c0)));
//! assert!(s.new_lt(Lin::var(x) + Lin::var(y), Lin::from(0), false, Some(c1)));
//!
//! assert!(!s.check());
//! assert_eq!(s.conflict(), &[c0, c1]);
//!
//! s.retract(c0);
//! assert!(s.check());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod bounds;
pub mod constraint;
pub mod solver;
mod tableau;

pub use constraint::ConstraintRef;
pub use solver::Solver;

pub use lyra_core::{InfRational, Lin, Rational, Var};

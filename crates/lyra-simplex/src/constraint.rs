//! Constraint handles and their recorded bounds

use lyra_core::{InfRational, Var};
use std::collections::BTreeMap;
use std::fmt;

/// Handle to a retractable constraint.
///
/// The solver allocates handles through
/// [`Solver::new_constraint`](crate::Solver::new_constraint) and records,
/// per handle, which variable bounds were installed on its behalf. The handle is the currency of the
/// whole retraction machinery: assertions are tagged with it, conflict sets
/// cite it, and [`Solver::retract`](crate::Solver::retract) undoes exactly
/// the bounds recorded under it.
///
/// A handle stays valid for the life of the solver and may be asserted,
/// retracted and re-asserted any number of times, in any order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConstraintRef(pub u32);

impl ConstraintRef {
    /// Get the index for dense per-constraint arrays
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ConstraintRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// The bounds a constraint currently has installed: one lower and one upper
/// bound at most per variable. A re-assertion through the same handle
/// replaces the handle's previous bound on that variable.
///
/// Retraction removes these bounds from the variables but keeps the record,
/// so [`Solver::add_constraint`](crate::Solver::add_constraint) can replay
/// it later.
#[derive(Debug, Clone, Default)]
pub(crate) struct ConstraintState {
    /// Lower bounds installed on behalf of this constraint
    pub lbs: BTreeMap<Var, InfRational>,
    /// Upper bounds installed on behalf of this constraint
    pub ubs: BTreeMap<Var, InfRational>,
}

//! Per-variable state: current value and reason-tagged bound multisets

use crate::constraint::ConstraintRef;
use hashbrown::HashSet;
use lyra_core::InfRational;
use std::collections::BTreeMap;

/// The state of one variable: its current value and two ordered multisets of
/// bound assertions.
///
/// Each bound value maps to the set of reasons that asserted it. The
/// effective lower bound is the greatest `lbs` key (`-inf` when empty), the
/// effective upper bound the least `ubs` key (`+inf` when empty). Dominated
/// entries are kept: when the dominating bound loses its last reason, the
/// next entry silently becomes effective, which is what makes retraction
/// order-independent.
///
/// An entry with an empty reason set is an anonymous tightening; it never
/// contributes to conflicts and nothing can retract it.
#[derive(Debug, Clone)]
pub(crate) struct VarState {
    /// The current value of this variable
    pub val: InfRational,
    lbs: BTreeMap<InfRational, HashSet<ConstraintRef>>,
    ubs: BTreeMap<InfRational, HashSet<ConstraintRef>>,
}

impl VarState {
    pub fn new(val: InfRational) -> Self {
        VarState {
            val,
            lbs: BTreeMap::new(),
            ubs: BTreeMap::new(),
        }
    }

    /// The effective lower bound
    pub fn lb(&self) -> InfRational {
        self.lbs
            .last_key_value()
            .map(|(v, _)| v.clone())
            .unwrap_or_else(InfRational::negative_infinite)
    }

    /// The effective upper bound
    pub fn ub(&self) -> InfRational {
        self.ubs
            .first_key_value()
            .map(|(v, _)| v.clone())
            .unwrap_or_else(InfRational::positive_infinite)
    }

    /// Record a lower bound.
    ///
    /// With a reason, the entry at `v` gains that reason; dominated entries
    /// survive so the reason can be retracted later. Without a reason this is
    /// an anonymous tightening: every entry at `v` or below is discarded and
    /// `v` is installed with an empty reason set.
    ///
    /// The caller has already checked `v` against the upper bound.
    pub fn set_lb(&mut self, v: InfRational, reason: Option<ConstraintRef>) {
        debug_assert!(v <= self.ub());
        match reason {
            Some(c) => {
                self.lbs.entry(v).or_default().insert(c);
            }
            None => {
                self.lbs.retain(|k, _| k > &v);
                self.lbs.insert(v, HashSet::new());
            }
        }
    }

    /// Record an upper bound; dual of [`VarState::set_lb`].
    pub fn set_ub(&mut self, v: InfRational, reason: Option<ConstraintRef>) {
        debug_assert!(v >= self.lb());
        match reason {
            Some(c) => {
                self.ubs.entry(v).or_default().insert(c);
            }
            None => {
                self.ubs.retain(|k, _| k < &v);
                self.ubs.insert(v, HashSet::new());
            }
        }
    }

    /// Withdraw `reason` from the lower-bound entry at `v`, dropping the
    /// entry when its reason set empties. A no-op when the entry or the
    /// reason is already gone, so retracting twice is the same as retracting
    /// once.
    pub fn unset_lb(&mut self, v: &InfRational, reason: ConstraintRef) {
        if let Some(set) = self.lbs.get_mut(v) {
            if set.remove(&reason) && set.is_empty() {
                self.lbs.remove(v);
            }
        }
    }

    /// Withdraw `reason` from the upper-bound entry at `v`; dual of
    /// [`VarState::unset_lb`].
    pub fn unset_ub(&mut self, v: &InfRational, reason: ConstraintRef) {
        if let Some(set) = self.ubs.get_mut(v) {
            if set.remove(&reason) && set.is_empty() {
                self.ubs.remove(v);
            }
        }
    }

    /// The reasons recorded at the effective lower bound
    pub fn lb_reasons(&self) -> impl Iterator<Item = ConstraintRef> + '_ {
        self.lbs
            .last_key_value()
            .into_iter()
            .flat_map(|(_, set)| set.iter().copied())
    }

    /// The reasons recorded at the effective upper bound
    pub fn ub_reasons(&self) -> impl Iterator<Item = ConstraintRef> + '_ {
        self.ubs
            .first_key_value()
            .into_iter()
            .flat_map(|(_, set)| set.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ir(n: i64) -> InfRational {
        InfRational::from(n)
    }

    #[test]
    fn test_empty_bounds_are_infinite() {
        let s = VarState::new(InfRational::zero());
        assert_eq!(s.lb(), InfRational::negative_infinite());
        assert_eq!(s.ub(), InfRational::positive_infinite());
    }

    #[test]
    fn test_dominated_bound_survives_until_retracted() {
        let mut s = VarState::new(InfRational::zero());
        let (c0, c1) = (ConstraintRef(0), ConstraintRef(1));
        s.set_lb(ir(1), Some(c0));
        s.set_lb(ir(3), Some(c1));
        assert_eq!(s.lb(), ir(3));
        // retracting the dominating bound exposes the dominated one
        s.unset_lb(&ir(3), c1);
        assert_eq!(s.lb(), ir(1));
        s.unset_lb(&ir(1), c0);
        assert_eq!(s.lb(), InfRational::negative_infinite());
    }

    #[test]
    fn test_shared_bound_needs_all_reasons_gone() {
        let mut s = VarState::new(InfRational::zero());
        let (c0, c1) = (ConstraintRef(0), ConstraintRef(1));
        s.set_lb(ir(2), Some(c0));
        s.set_lb(ir(2), Some(c1));
        s.unset_lb(&ir(2), c0);
        assert_eq!(s.lb(), ir(2));
        s.unset_lb(&ir(2), c1);
        assert_eq!(s.lb(), InfRational::negative_infinite());
    }

    #[test]
    fn test_anonymous_tightening_purges_weaker_entries() {
        let mut s = VarState::new(InfRational::zero());
        s.set_lb(ir(1), Some(ConstraintRef(0)));
        s.set_lb(ir(5), None);
        assert_eq!(s.lb(), ir(5));
        // the purged reasoned entry is gone; unsetting it is a no-op
        s.unset_lb(&ir(1), ConstraintRef(0));
        assert_eq!(s.lb(), ir(5));
        assert_eq!(s.lb_reasons().count(), 0);
    }

    #[test]
    fn test_anonymous_tightening_keeps_stronger_entries() {
        let mut s = VarState::new(InfRational::zero());
        s.set_ub(ir(2), Some(ConstraintRef(0)));
        s.set_ub(ir(7), None);
        // the reasoned ub at 2 dominates the anonymous one at 7
        assert_eq!(s.ub(), ir(2));
        s.unset_ub(&ir(2), ConstraintRef(0));
        assert_eq!(s.ub(), ir(7));
    }

    #[test]
    fn test_unset_is_idempotent() {
        let mut s = VarState::new(InfRational::zero());
        let c0 = ConstraintRef(0);
        s.set_ub(ir(4), Some(c0));
        s.unset_ub(&ir(4), c0);
        s.unset_ub(&ir(4), c0);
        assert_eq!(s.ub(), InfRational::positive_infinite());
    }

    #[test]
    fn test_effective_reasons_only() {
        let mut s = VarState::new(InfRational::zero());
        let (c0, c1) = (ConstraintRef(0), ConstraintRef(1));
        s.set_lb(ir(1), Some(c0));
        s.set_lb(ir(3), Some(c1));
        let reasons: Vec<_> = s.lb_reasons().collect();
        assert_eq!(reasons, vec![c1]);
    }
}

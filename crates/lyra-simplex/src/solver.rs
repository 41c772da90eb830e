//! The incremental feasibility solver

use crate::bounds::VarState;
use crate::constraint::{ConstraintRef, ConstraintState};
use crate::tableau::Tableau;
use hashbrown::HashMap;
use lyra_core::{InfRational, Lin, Rational, Var};
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use serde_json::{json, Value};
use std::collections::BTreeSet;
use std::fmt;
use tracing::{debug, trace};

/// Which side of its bounds a basic variable violates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Violation {
    BelowLower,
    AboveUpper,
}

/// An incremental, retractable linear feasibility solver over the rationals.
///
/// The solver maintains a set of variables with reason-tagged bounds, a
/// simplex tableau in the general form of Dutertre and de Moura, and a
/// value assignment that is kept consistent with the tableau at all times.
/// Constraints are asserted through [`Solver::new_eq`], [`Solver::new_lt`]
/// and [`Solver::new_gt`], optionally tagged with a [`ConstraintRef`];
/// [`Solver::check`] repairs feasibility by pivoting or reports a conflict,
/// and [`Solver::retract`] withdraws a constraint's bounds in any order.
///
/// Strict inequalities are handled symbolically: `x < c` becomes
/// `x ≤ c - ε` over [`InfRational`], so the pivoting machinery never
/// distinguishes strict from non-strict.
///
/// The solver is single-threaded and synchronous; no operation blocks.
#[derive(Debug, Default)]
pub struct Solver {
    /// Per-variable value and bound multisets, indexed by variable id
    vars: Vec<VarState>,
    /// Canonical expression string -> slack variable already naming it
    exprs: HashMap<String, Var>,
    /// Rows and the watch index
    tableau: Tableau,
    /// Per-handle recorded bounds, indexed by constraint id
    constraints: Vec<ConstraintState>,
    /// The last conflict explanation, sorted and deduplicated
    cnfl: Vec<ConstraintRef>,
}

impl Solver {
    /// Create an empty solver
    pub fn new() -> Self {
        Solver::default()
    }

    fn alloc_var(&mut self, val: InfRational) -> Var {
        let x = Var(self.vars.len() as u32);
        self.vars.push(VarState::new(val));
        self.tableau.add_var();
        x
    }

    /// Create a fresh unbounded variable
    pub fn new_var(&mut self) -> Var {
        self.alloc_var(InfRational::zero())
    }

    /// Create a fresh variable bounded to `[lb, ub]`.
    ///
    /// Finite bounds are installed anonymously (nothing can retract them).
    /// The initial value is zero clamped into the interval. `lb ≤ ub` is a
    /// precondition, checked in debug builds.
    pub fn new_var_with_bounds(&mut self, lb: InfRational, ub: InfRational) -> Var {
        debug_assert!(lb <= ub, "variable bounds must be ordered");
        let zero = InfRational::zero();
        let val = if lb > zero {
            lb.clone()
        } else if ub < zero {
            ub.clone()
        } else {
            zero
        };
        let x = self.alloc_var(val);
        let state = &mut self.vars[x.index()];
        if !lb.is_infinite() {
            state.set_lb(lb, None);
        }
        if !ub.is_infinite() {
            state.set_ub(ub, None);
        }
        x
    }

    /// Create (or reuse) a slack variable naming the linear combination in
    /// `l`.
    ///
    /// The expression is first reduced against the tableau. Structurally
    /// identical combinations share a single slack: asserting bounds on the
    /// same compound expression twice introduces at most one row. The
    /// constant term of `l` does not participate; the returned variable
    /// names `Σ c_i · x_i` only, and constants belong in the assertions
    /// bounding it.
    pub fn new_slack(&mut self, l: Lin) -> Var {
        let mut e = l;
        self.tableau.reduce(&mut e);
        e.known_term = BigRational::zero();
        if e.vars.is_empty() {
            return self.new_var();
        }
        if e.vars.len() == 1 {
            let (x, c) = e.vars.iter().next().map(|(x, c)| (*x, c.clone())).unwrap();
            if c.is_one() {
                return x;
            }
        }
        self.slack(e)
    }

    /// Fresh-or-cached slack for a reduced, constant-free expression
    fn slack(&mut self, e: Lin) -> Var {
        debug_assert!(e.known_term.is_zero());
        let key = e.to_string();
        if let Some(&s) = self.exprs.get(&key) {
            return s;
        }
        let val = self.val_lin(&e);
        let s = self.alloc_var(val);
        debug!("new slack {s} = {key}");
        self.tableau.install_row(s, e);
        self.exprs.insert(key, s);
        s
    }

    /// Allocate a fresh constraint handle.
    ///
    /// The handle starts empty; it accumulates recorded bounds as it is
    /// passed to assertions, and can be retracted and re-asserted freely.
    pub fn new_constraint(&mut self) -> ConstraintRef {
        let c = ConstraintRef(self.constraints.len() as u32);
        self.constraints.push(ConstraintState::default());
        c
    }

    /// The effective lower bound of `x`
    pub fn lb(&self, x: Var) -> InfRational {
        self.vars[x.index()].lb()
    }

    /// The effective upper bound of `x`
    pub fn ub(&self, x: Var) -> InfRational {
        self.vars[x.index()].ub()
    }

    /// The current value of `x`
    pub fn val(&self, x: Var) -> InfRational {
        self.vars[x.index()].val.clone()
    }

    /// The lower bound of an expression, derived from the bounds of its
    /// variables by coefficient sign
    pub fn lb_lin(&self, l: &Lin) -> InfRational {
        let mut b = InfRational::from(l.known_term.clone());
        for (x, c) in &l.vars {
            let bound = if c.is_positive() { self.lb(*x) } else { self.ub(*x) };
            b += bound * c;
        }
        b
    }

    /// The upper bound of an expression; dual of [`Solver::lb_lin`]
    pub fn ub_lin(&self, l: &Lin) -> InfRational {
        let mut b = InfRational::from(l.known_term.clone());
        for (x, c) in &l.vars {
            let bound = if c.is_positive() { self.ub(*x) } else { self.lb(*x) };
            b += bound * c;
        }
        b
    }

    /// The current value of an expression
    pub fn val_lin(&self, l: &Lin) -> InfRational {
        let mut b = InfRational::from(l.known_term.clone());
        for (x, c) in &l.vars {
            b += self.vars[x.index()].val.clone() * c;
        }
        b
    }

    /// Check whether the bounds on `l0 - l1` admit zero, i.e. whether the
    /// two expressions can still take the same value
    pub fn matches(&self, l0: &Lin, l1: &Lin) -> bool {
        let e = l0.clone() - l1.clone();
        !self.lb_lin(&e).is_positive() && !self.ub_lin(&e).is_negative()
    }

    /// Assert `lhs = rhs`, optionally tagged with `reason`.
    ///
    /// Returns `true` if the assertion was installed consistently, `false`
    /// if it is trivially or immediately inconsistent (in which case nothing
    /// is installed and the conflict set is untouched).
    pub fn new_eq(&mut self, lhs: Lin, rhs: Lin, reason: Option<ConstraintRef>) -> bool {
        let mut e = lhs - rhs;
        self.tableau.reduce(&mut e);
        debug!("assert {e} == 0");
        match e.vars.len() {
            0 => e.known_term.is_zero(),
            1 => {
                let (x, c) = e.vars.pop_first().unwrap();
                let v = InfRational::from(-e.known_term / c);
                self.set_lb(x, v.clone(), reason) && self.set_ub(x, v, reason)
            }
            _ => {
                let k = std::mem::replace(&mut e.known_term, BigRational::zero());
                let s = self.slack(e);
                let v = InfRational::from(-k);
                self.set_lb(s, v.clone(), reason) && self.set_ub(s, v, reason)
            }
        }
    }

    /// Assert `lhs < rhs` (strict) or `lhs ≤ rhs`, optionally tagged with
    /// `reason`.
    ///
    /// Strictness is encoded as an infinitesimal offset on the installed
    /// bound. Returns `false` without installing anything when the
    /// assertion is immediately inconsistent.
    pub fn new_lt(
        &mut self,
        lhs: Lin,
        rhs: Lin,
        strict: bool,
        reason: Option<ConstraintRef>,
    ) -> bool {
        let mut e = lhs - rhs;
        self.tableau.reduce(&mut e);
        debug!("assert {} {} 0", e, if strict { "<" } else { "<=" });
        match e.vars.len() {
            0 => {
                if strict {
                    e.known_term.is_negative()
                } else {
                    !e.known_term.is_positive()
                }
            }
            1 => {
                let (x, c) = e.vars.pop_first().unwrap();
                let positive = c.is_positive();
                let v = Rational::Finite(-e.known_term / c);
                if positive {
                    let ub = if strict {
                        InfRational::just_below(v)
                    } else {
                        InfRational::new(v)
                    };
                    self.set_ub(x, ub, reason)
                } else {
                    let lb = if strict {
                        InfRational::just_above(v)
                    } else {
                        InfRational::new(v)
                    };
                    self.set_lb(x, lb, reason)
                }
            }
            _ => {
                let k = std::mem::replace(&mut e.known_term, BigRational::zero());
                let s = self.slack(e);
                let v = Rational::Finite(-k);
                let ub = if strict {
                    InfRational::just_below(v)
                } else {
                    InfRational::new(v)
                };
                self.set_ub(s, ub, reason)
            }
        }
    }

    /// Assert `lhs > rhs` (strict) or `lhs ≥ rhs`; the mirror of
    /// [`Solver::new_lt`]
    pub fn new_gt(
        &mut self,
        lhs: Lin,
        rhs: Lin,
        strict: bool,
        reason: Option<ConstraintRef>,
    ) -> bool {
        self.new_lt(rhs, lhs, strict, reason)
    }

    /// Replay every bound recorded in `c`.
    ///
    /// Together with [`Solver::retract`] this makes constraints re-addable:
    /// retracting and re-adding a handle restores the solver's verdict. A
    /// handle that never recorded anything is a no-op success.
    pub fn add_constraint(&mut self, c: ConstraintRef) -> bool {
        let state = &self.constraints[c.index()];
        let lbs: Vec<(Var, InfRational)> =
            state.lbs.iter().map(|(x, v)| (*x, v.clone())).collect();
        let ubs: Vec<(Var, InfRational)> =
            state.ubs.iter().map(|(x, v)| (*x, v.clone())).collect();
        for (x, v) in lbs {
            if !self.set_lb(x, v, Some(c)) {
                return false;
            }
        }
        for (x, v) in ubs {
            if !self.set_ub(x, v, Some(c)) {
                return false;
            }
        }
        true
    }

    /// Withdraw every bound installed on behalf of `c`.
    ///
    /// Bounds shared with other reasons stay effective; dominated bounds
    /// that `c` was masking become effective again. Values are left where
    /// they are; the next [`Solver::check`] repairs feasibility. Retracting
    /// an already-retracted handle is a no-op, and the recorded bounds are
    /// kept so the handle can be re-added.
    pub fn retract(&mut self, c: ConstraintRef) {
        debug!("retract {c}");
        let state = &self.constraints[c.index()];
        let lbs: Vec<(Var, InfRational)> =
            state.lbs.iter().map(|(x, v)| (*x, v.clone())).collect();
        let ubs: Vec<(Var, InfRational)> =
            state.ubs.iter().map(|(x, v)| (*x, v.clone())).collect();
        for (x, v) in lbs {
            self.vars[x.index()].unset_lb(&v, c);
        }
        for (x, v) in ubs {
            self.vars[x.index()].unset_ub(&v, c);
        }
    }

    /// Drive the assignment to feasibility.
    ///
    /// Repeatedly takes the smallest-id basic variable out of bounds and
    /// pivots it against the smallest-id usable non-basic variable in its
    /// row (Bland's rule, which guarantees termination). Returns `true` once
    /// every bound is satisfied; returns `false` when some row proves
    /// infeasibility, in which case [`Solver::conflict`] explains it.
    pub fn check(&mut self) -> bool {
        self.cnfl.clear();
        loop {
            let Some((x_i, viol)) = self.first_violation() else {
                debug!("check: feasible");
                return true;
            };
            let target = match viol {
                Violation::BelowLower => self.lb(x_i),
                Violation::AboveUpper => self.ub(x_i),
            };
            match self.entering_var(x_i, viol) {
                Some(x_j) => {
                    trace!("pivot {x_i} with {x_j}");
                    self.pivot_and_update(x_i, x_j, target);
                }
                None => {
                    self.record_conflict(x_i, viol);
                    debug!("check: infeasible");
                    return false;
                }
            }
        }
    }

    /// The reasons recorded at the last failing [`Solver::check`], sorted by
    /// handle id. Empty if the last check succeeded (or none ran yet).
    pub fn conflict(&self) -> &[ConstraintRef] {
        &self.cnfl
    }

    /// The smallest-id basic variable violating one of its bounds
    fn first_violation(&self) -> Option<(Var, Violation)> {
        for (x, _) in self.tableau.rows() {
            let s = &self.vars[x.index()];
            if s.val < s.lb() {
                return Some((x, Violation::BelowLower));
            }
            if s.val > s.ub() {
                return Some((x, Violation::AboveUpper));
            }
        }
        None
    }

    /// The smallest-id non-basic variable in the row of `x_i` whose value
    /// can still move in the direction that repairs `x_i`
    fn entering_var(&self, x_i: Var, viol: Violation) -> Option<Var> {
        for (x_j, a_ij) in &self.tableau.row(x_i).vars {
            let s = &self.vars[x_j.index()];
            let movable = match viol {
                Violation::BelowLower => {
                    (a_ij.is_positive() && s.val < s.ub())
                        || (a_ij.is_negative() && s.val > s.lb())
                }
                Violation::AboveUpper => {
                    (a_ij.is_negative() && s.val < s.ub())
                        || (a_ij.is_positive() && s.val > s.lb())
                }
            };
            if movable {
                return Some(*x_j);
            }
        }
        None
    }

    /// Collect the reasons proving the row of `x_i` infeasible: the reasons
    /// at the violated bound of `x_i`, plus for every variable in the row
    /// the reasons at the bound that blocks its movement
    fn record_conflict(&mut self, x_i: Var, viol: Violation) {
        let mut reasons = BTreeSet::new();
        let s_i = &self.vars[x_i.index()];
        match viol {
            Violation::BelowLower => reasons.extend(s_i.lb_reasons()),
            Violation::AboveUpper => reasons.extend(s_i.ub_reasons()),
        }
        for (x_j, a_ij) in &self.tableau.row(x_i).vars {
            let s_j = &self.vars[x_j.index()];
            let blocked_at_ub = (viol == Violation::BelowLower) == a_ij.is_positive();
            if blocked_at_ub {
                reasons.extend(s_j.ub_reasons());
            } else {
                reasons.extend(s_j.lb_reasons());
            }
        }
        self.cnfl = reasons.into_iter().collect();
    }

    /// Install a lower bound on `x`, recording it under `reason` when one is
    /// given. Fails (installing nothing) iff the bound crosses the current
    /// upper bound. Repairs the value of a non-basic `x` that the new bound
    /// leaves behind.
    fn set_lb(&mut self, x: Var, v: InfRational, reason: Option<ConstraintRef>) -> bool {
        if v > self.vars[x.index()].ub() {
            return false;
        }
        match reason {
            Some(c) => {
                // one lower bound per reason per variable: a re-assertion
                // through the same handle replaces the previous one
                if let Some(old) = self.constraints[c.index()].lbs.insert(x, v.clone()) {
                    if old != v {
                        self.vars[x.index()].unset_lb(&old, c);
                    }
                }
                self.vars[x.index()].set_lb(v, Some(c));
            }
            None => self.vars[x.index()].set_lb(v, None),
        }
        if !self.tableau.is_basic(x) {
            let lb = self.vars[x.index()].lb();
            if self.vars[x.index()].val < lb {
                self.update(x, lb);
            }
        }
        true
    }

    /// Install an upper bound on `x`; dual of [`Solver::set_lb`]
    fn set_ub(&mut self, x: Var, v: InfRational, reason: Option<ConstraintRef>) -> bool {
        if v < self.vars[x.index()].lb() {
            return false;
        }
        match reason {
            Some(c) => {
                if let Some(old) = self.constraints[c.index()].ubs.insert(x, v.clone()) {
                    if old != v {
                        self.vars[x.index()].unset_ub(&old, c);
                    }
                }
                self.vars[x.index()].set_ub(v, Some(c));
            }
            None => self.vars[x.index()].set_ub(v, None),
        }
        if !self.tableau.is_basic(x) {
            let ub = self.vars[x.index()].ub();
            if self.vars[x.index()].val > ub {
                self.update(x, ub);
            }
        }
        true
    }

    /// Assign `v` to the non-basic `x`, propagating the delta to every row
    /// watching it so the row invariant is preserved without touching the
    /// tableau structure
    fn update(&mut self, x: Var, v: InfRational) {
        trace!("update {x} := {v}");
        let delta = v.clone() - self.vars[x.index()].val.clone();
        let watchers: Vec<Var> = self.tableau.watchers(x).iter().copied().collect();
        for r in watchers {
            let c = self
                .tableau
                .row(r)
                .coef(x)
                .expect("watched row lacks the watched variable")
                .clone();
            let inc = delta.clone() * &c;
            self.vars[r.index()].val += inc;
        }
        self.vars[x.index()].val = v;
    }

    /// Repair the value of the basic `x_i` to `v` by moving the non-basic
    /// `x_j`, then swap the two in the tableau
    fn pivot_and_update(&mut self, x_i: Var, x_j: Var, v: InfRational) {
        let a_ij = self
            .tableau
            .row(x_i)
            .coef(x_j)
            .expect("entering variable not in leaving row")
            .clone();
        let theta = (v.clone() - self.vars[x_i.index()].val.clone()) / &a_ij;
        self.vars[x_i.index()].val = v;
        self.vars[x_j.index()].val += theta.clone();
        let watchers: Vec<Var> = self.tableau.watchers(x_j).iter().copied().collect();
        for r in watchers {
            if r == x_i {
                continue;
            }
            let c = self
                .tableau
                .row(r)
                .coef(x_j)
                .expect("watched row lacks the watched variable")
                .clone();
            let inc = theta.clone() * &c;
            self.vars[r.index()].val += inc;
        }
        self.tableau.pivot(x_i, x_j);
    }

    /// Render the solver state as JSON: every variable with its value and
    /// finite bounds, and the tableau rows as canonical expression strings.
    /// Observability only; the format is not a contract.
    pub fn to_json(&self) -> Value {
        let vars: Vec<Value> = self
            .vars
            .iter()
            .map(|s| {
                let mut v = json!({ "val": inf_rational_json(&s.val) });
                let lb = s.lb();
                if !lb.is_infinite() {
                    v["lb"] = inf_rational_json(&lb);
                }
                let ub = s.ub();
                if !ub.is_infinite() {
                    v["ub"] = inf_rational_json(&ub);
                }
                v
            })
            .collect();
        let tableau: serde_json::Map<String, Value> = self
            .tableau
            .rows()
            .map(|(x, l)| (x.to_string(), Value::String(l.to_string())))
            .collect();
        json!({ "vars": vars, "tableau": tableau })
    }
}

fn rational_json(q: &BigRational) -> Value {
    json!({ "num": q.numer().to_string(), "den": q.denom().to_string() })
}

fn inf_rational_json(v: &InfRational) -> Value {
    match v.rational().as_finite() {
        Some(q) => {
            let mut j = rational_json(q);
            if !v.infinitesimal().is_zero() {
                j["inf"] = rational_json(v.infinitesimal());
            }
            j
        }
        None => Value::String(v.rational().to_string()),
    }
}

impl fmt::Display for Solver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, s) in self.vars.iter().enumerate() {
            writeln!(f, "x{} = {} [{}, {}]", i, s.val, s.lb(), s.ub())?;
        }
        for (x, l) in self.tableau.rows() {
            writeln!(f, "{} = {}", x, l)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;
    use proptest::prelude::*;

    fn q(n: i64) -> BigRational {
        BigRational::from_integer(BigInt::from(n))
    }

    /// Check the state invariants: non-basic values within bounds, basic
    /// values equal to their row valuation, watch index exact.
    fn assert_coherent(s: &Solver) {
        for (i, st) in s.vars.iter().enumerate() {
            let x = Var(i as u32);
            if !s.tableau.is_basic(x) {
                assert!(
                    st.lb() <= st.val && st.val <= st.ub(),
                    "non-basic {x} out of bounds: {} not in [{}, {}]",
                    st.val,
                    st.lb(),
                    st.ub()
                );
            }
        }
        for (x, l) in s.tableau.rows() {
            assert_eq!(
                s.vars[x.index()].val,
                s.val_lin(l),
                "basic {x} out of sync with its row"
            );
        }
        assert!(s.tableau.watches_consistent(), "watch index broken");
    }

    fn assert_all_bounds_satisfied(s: &Solver) {
        for (i, st) in s.vars.iter().enumerate() {
            assert!(
                st.lb() <= st.val && st.val <= st.ub(),
                "x{i} violates its bounds after a successful check"
            );
        }
    }

    #[derive(Debug, Clone)]
    struct Assertion {
        kind: u8, // 0 = lt, 1 = gt, 2 = eq
        terms: Vec<(usize, i64)>,
        k: i64,
        strict: bool,
    }

    fn assertion_strategy() -> impl Strategy<Value = Assertion> {
        (
            0u8..3,
            prop::collection::vec((0usize..4, -3i64..=3), 1..4),
            -8i64..=8,
            any::<bool>(),
        )
            .prop_map(|(kind, terms, k, strict)| Assertion {
                kind,
                terms,
                k,
                strict,
            })
    }

    fn lin_of(terms: &[(usize, i64)], vars: &[Var]) -> Lin {
        let mut l = Lin::new();
        for (i, c) in terms {
            l = l + Lin::term(vars[*i], q(*c));
        }
        l
    }

    fn apply(s: &mut Solver, a: &Assertion, vars: &[Var], reason: Option<ConstraintRef>) -> bool {
        let lhs = lin_of(&a.terms, vars);
        let rhs = Lin::from(a.k);
        match a.kind {
            0 => s.new_lt(lhs, rhs, a.strict, reason),
            1 => s.new_gt(lhs, rhs, a.strict, reason),
            _ => s.new_eq(lhs, rhs, reason),
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_invariants_hold_after_any_sequence(
            ops in prop::collection::vec((assertion_strategy(), any::<bool>()), 1..8)
        ) {
            let mut s = Solver::new();
            let vars: Vec<Var> = (0..4).map(|_| s.new_var()).collect();
            for (a, check_after) in &ops {
                apply(&mut s, a, &vars, None);
                assert_coherent(&s);
                if *check_after {
                    let feasible = s.check();
                    assert_coherent(&s);
                    if feasible {
                        assert_all_bounds_satisfied(&s);
                    }
                }
            }
            if s.check() {
                assert_all_bounds_satisfied(&s);
            }
            assert_coherent(&s);
        }

        #[test]
        fn prop_retracting_everything_restores_feasibility(
            ops in prop::collection::vec(assertion_strategy(), 1..8)
        ) {
            let mut s = Solver::new();
            let vars: Vec<Var> = (0..4).map(|_| s.new_var()).collect();
            let mut reasons = Vec::new();
            for a in &ops {
                let c = s.new_constraint();
                apply(&mut s, a, &vars, Some(c));
                reasons.push(c);
            }
            s.check();
            for c in reasons {
                s.retract(c);
            }
            assert!(s.check(), "a solver with every reason retracted must be feasible");
            assert_coherent(&s);
        }

        #[test]
        fn prop_retraction_is_idempotent(
            ops in prop::collection::vec(assertion_strategy(), 1..6)
        ) {
            let mut s = Solver::new();
            let vars: Vec<Var> = (0..4).map(|_| s.new_var()).collect();
            let c = s.new_constraint();
            for a in &ops {
                apply(&mut s, a, &vars, Some(c));
            }
            s.check();
            s.retract(c);
            let snapshot = s.to_string();
            s.retract(c);
            prop_assert_eq!(s.to_string(), snapshot);
        }

        #[test]
        fn prop_retract_then_readd_preserves_verdict(
            ops in prop::collection::vec(assertion_strategy(), 1..6)
        ) {
            let mut s = Solver::new();
            let vars: Vec<Var> = (0..4).map(|_| s.new_var()).collect();
            let c = s.new_constraint();
            for a in &ops {
                apply(&mut s, a, &vars, Some(c));
            }
            let before = s.check();
            s.retract(c);
            prop_assert!(s.add_constraint(c), "replaying recorded bounds cannot fail");
            prop_assert_eq!(s.check(), before);
        }

        #[test]
        fn prop_conflicts_are_jointly_inconsistent(
            ops in prop::collection::vec(assertion_strategy(), 1..8)
        ) {
            let mut s = Solver::new();
            let vars: Vec<Var> = (0..4).map(|_| s.new_var()).collect();
            let mut reasons = Vec::new();
            for a in &ops {
                let c = s.new_constraint();
                apply(&mut s, a, &vars, Some(c));
                reasons.push(c);
            }
            if !s.check() {
                let conflict = s.conflict().to_vec();
                prop_assert!(!conflict.is_empty());
                // the cited subset alone must still be infeasible
                let mut fresh = Solver::new();
                let fresh_vars: Vec<Var> = (0..4).map(|_| fresh.new_var()).collect();
                for (a, orig) in ops.iter().zip(&reasons) {
                    if conflict.contains(orig) {
                        let c = fresh.new_constraint();
                        prop_assert!(apply(&mut fresh, a, &fresh_vars, Some(c)));
                    }
                }
                prop_assert!(!fresh.check(), "conflict subset turned out satisfiable");
            }
        }
    }

    #[test]
    fn test_conflict_cleared_by_successful_check() {
        let mut s = Solver::new();
        let x = s.new_var();
        let y = s.new_var();
        let c0 = s.new_constraint();
        let c1 = s.new_constraint();
        assert!(s.new_gt(Lin::var(x) + Lin::var(y), Lin::from(1), false, Some(c0)));
        assert!(s.new_lt(Lin::var(x) + Lin::var(y), Lin::from(0), false, Some(c1)));
        assert!(!s.check());
        assert!(!s.conflict().is_empty());
        s.retract(c1);
        assert!(s.check());
        assert!(s.conflict().is_empty());
    }
}

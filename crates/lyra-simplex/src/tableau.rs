//! Sparse simplex tableau with a watch index

use hashbrown::HashSet;
use lyra_core::{Lin, Var};
use num_traits::Zero;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// The tableau: one row `x_i = Σ a_ij · x_j` per basic variable, plus an
/// inverted watch index mapping every variable to the basic rows that
/// mention it.
///
/// Rows only ever mention non-basic variables, and their known terms are
/// zero once installed (constants are absorbed into slack bounds at birth).
/// The watch index is maintained incrementally on row install and pivot; it
/// is what keeps value propagation proportional to the number of affected
/// rows rather than the tableau size.
///
/// Rows are keyed in a `BTreeMap` so that feasibility scans see basic
/// variables in ascending id order, which Bland's rule needs for
/// termination.
#[derive(Debug, Default)]
pub(crate) struct Tableau {
    rows: BTreeMap<Var, Lin>,
    watches: Vec<HashSet<Var>>,
}

impl Tableau {
    pub fn new() -> Self {
        Tableau::default()
    }

    /// Register a freshly allocated variable
    pub fn add_var(&mut self) {
        self.watches.push(HashSet::new());
    }

    /// Check whether `x` currently heads a row
    #[inline]
    pub fn is_basic(&self, x: Var) -> bool {
        self.rows.contains_key(&x)
    }

    /// The row of a basic variable.
    ///
    /// Panics if `x` is not basic; callers hold that invariant.
    #[inline]
    pub fn row(&self, x: Var) -> &Lin {
        &self.rows[&x]
    }

    /// Iterate the rows in ascending basic-variable id order
    pub fn rows(&self) -> impl Iterator<Item = (Var, &Lin)> {
        self.rows.iter().map(|(x, l)| (*x, l))
    }

    /// The basic variables whose row mentions `x`
    #[inline]
    pub fn watchers(&self, x: Var) -> &HashSet<Var> {
        &self.watches[x.index()]
    }

    /// Substitute every basic variable occurring in `l` by its row, leaving
    /// an expression over non-basic variables only.
    pub fn reduce(&self, l: &mut Lin) {
        let basics: Vec<Var> = l
            .vars
            .keys()
            .copied()
            .filter(|x| self.is_basic(*x))
            .collect();
        for x in basics {
            if let Some(c) = l.vars.remove(&x) {
                l.add_scaled(&self.rows[&x], &c);
            }
        }
    }

    /// Install the row `x = l` and watch every variable it mentions.
    ///
    /// `x` must be fresh (never basic before) and `l` must mention only
    /// non-basic variables.
    pub fn install_row(&mut self, x: Var, l: Lin) {
        debug_assert!(!self.is_basic(x));
        debug_assert!(l.vars.keys().all(|y| !self.is_basic(*y)));
        for y in l.vars.keys() {
            self.watches[y.index()].insert(x);
        }
        self.rows.insert(x, l);
    }

    /// Swap basic `x_i` with non-basic `x_j`.
    ///
    /// The `x_i` row is solved for `x_j`, every other row mentioning `x_j`
    /// is rewritten against the new row, and the watch index follows every
    /// coefficient that appears or cancels.
    pub fn pivot(&mut self, x_i: Var, x_j: Var) {
        debug_assert!(
            self.watches[x_i.index()].is_empty(),
            "leaving variable is still watched"
        );
        let mut l = self
            .rows
            .remove(&x_i)
            .expect("pivot requires a basic leaving variable");
        for y in l.vars.keys() {
            self.watches[y.index()].remove(&x_i);
        }
        let a = l
            .vars
            .remove(&x_j)
            .expect("pivot requires a nonzero pivot coefficient");

        // x_i = a·x_j + l  =>  x_j = (1/a)·x_i - (1/a)·l
        let inv = a.recip();
        let mut row_j = Lin::term(x_i, inv.clone());
        row_j.add_scaled(&l, &-inv);
        debug_assert!(row_j.known_term.is_zero(), "tableau rows carry no constant");

        // fold the new row into every remaining row that mentions x_j
        let watchers = std::mem::take(&mut self.watches[x_j.index()]);
        for r in watchers {
            let row_r = self
                .rows
                .get_mut(&r)
                .expect("watch index references a basic row");
            let b = row_r
                .vars
                .remove(&x_j)
                .expect("watched row lacks the watched variable");
            for (y, c) in &row_j.vars {
                let scaled = c * &b;
                match row_r.vars.entry(*y) {
                    Entry::Occupied(mut e) => {
                        *e.get_mut() += scaled;
                        if e.get().is_zero() {
                            e.remove();
                            self.watches[y.index()].remove(&r);
                        }
                    }
                    Entry::Vacant(e) => {
                        e.insert(scaled);
                        self.watches[y.index()].insert(r);
                    }
                }
            }
        }

        for y in row_j.vars.keys() {
            self.watches[y.index()].insert(x_j);
        }
        self.rows.insert(x_j, row_j);
    }

    /// Verify the watch index against the rows (used for verification)
    #[cfg(test)]
    pub fn watches_consistent(&self) -> bool {
        for (i, set) in self.watches.iter().enumerate() {
            let x = Var(i as u32);
            for r in set {
                match self.rows.get(r) {
                    Some(l) if l.coef(x).is_some() => {}
                    _ => return false,
                }
            }
        }
        for (r, l) in &self.rows {
            for y in l.vars.keys() {
                if self.is_basic(*y) || !self.watches[y.index()].contains(r) {
                    return false;
                }
            }
        }
        true
    }
}

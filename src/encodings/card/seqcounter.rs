//! # Sequential Counter Encoding
//!
//! A counter register `s(i, j)` over the input literals `x(0), ..., x(n-1)` where `s(i, j)`
//! represents "at least `j + 1` of `x(0), ..., x(i)` are true". Register cells with `j > i` are
//! constant false and never get a variable. Upper bounds use the clauses propagating counts
//! upwards (Sinz, lines 1 to 6), lower bounds use the reverse direction, so that an output cell
//! of the last row enforces either bound as a unit.
//!
//! ## References
//!
//! - Carsten Sinz: _Towards an Optimal CNF Encoding of Boolean Cardinality Constraints_, CP 2005.

use std::cmp;
use std::ops::RangeBounds;

use crate::{
    encodings::{atomics, CollectClauses, EncodeStats, Error},
    instances::ManageVars,
    types::{Clause, Lit},
};

use super::{BoundLower, BoundUpper, Encode};

/// Implementation of the sequential counter encoding
///
/// # References
///
/// - Carsten Sinz: _Towards an Optimal CNF Encoding of Boolean Cardinality Constraints_, CP 2005.
#[derive(Default, Debug, Clone)]
pub struct SequentialCounter {
    /// Input literals to the counter
    in_lits: Vec<Lit>,
    /// Register literals, `regs[i][j]` is `s(i, j)`
    regs: Vec<Vec<Lit>>,
    /// Number of register columns with upward clauses
    ub_cols: usize,
    /// Number of register columns with downward clauses
    lb_cols: usize,
    /// The number of variables in the counter
    n_vars: u32,
    /// The number of clauses in the counter
    n_clauses: usize,
}

impl SequentialCounter {
    fn reg(&self, i: usize, j: usize) -> Option<Lit> {
        self.regs.get(i).and_then(|row| row.get(j)).copied()
    }

    /// Makes sure that the first `width` register columns have variables
    fn reserve_cols(&mut self, width: usize, var_manager: &mut dyn ManageVars) {
        for (i, row) in self.regs.iter_mut().enumerate() {
            let row_width = cmp::min(width, i + 1);
            while row.len() < row_width {
                row.push(var_manager.new_var().pos_lit());
                self.n_vars += 1;
            }
        }
    }

    /// Clauses `(count >= j + 1) -> s(i, j)` for all rows and the columns in `cols`
    fn upward_clauses(&self, cols: std::ops::Range<usize>) -> Vec<Clause> {
        let mut clauses = vec![];
        for (i, &x) in self.in_lits.iter().enumerate() {
            for j in cols.start..cmp::min(cols.end, i + 1) {
                let s = self.regs[i][j];
                if j == 0 {
                    // Sinz p828: line 1 and 3
                    clauses.push(atomics::lit_impl_lit(x, s));
                } else {
                    // Sinz p828: line 5
                    clauses.push(atomics::cube_impl_lit(&[x, self.regs[i - 1][j - 1]], s));
                }
                if let Some(prev) = i.checked_sub(1).and_then(|p| self.reg(p, j)) {
                    // Sinz p828: line 6
                    clauses.push(atomics::lit_impl_lit(prev, s));
                }
            }
        }
        clauses
    }

    /// Clauses `s(i, j) -> (count >= j + 1)` for all rows and the columns in `cols`
    fn downward_clauses(&self, cols: std::ops::Range<usize>) -> Vec<Clause> {
        let mut clauses = vec![];
        for (i, &x) in self.in_lits.iter().enumerate() {
            for j in cols.start..cmp::min(cols.end, i + 1) {
                let s = self.regs[i][j];
                let prev_same = i.checked_sub(1).and_then(|p| self.reg(p, j));
                // s(i, j) -> s(i-1, j) | x(i)
                match prev_same {
                    Some(prev) => clauses.push(atomics::lit_impl_clause(s, &[prev, x])),
                    None => clauses.push(atomics::lit_impl_lit(s, x)),
                }
                if j > 0 {
                    // s(i, j) -> s(i-1, j) | s(i-1, j-1)
                    let prev_lower = self.regs[i - 1][j - 1];
                    match prev_same {
                        Some(prev) => {
                            clauses.push(atomics::lit_impl_clause(s, &[prev, prev_lower]));
                        }
                        None => clauses.push(atomics::lit_impl_lit(s, prev_lower)),
                    }
                }
            }
        }
        clauses
    }

    fn output(&self, j: usize) -> Option<Lit> {
        self.in_lits.len().checked_sub(1).and_then(|last| self.reg(last, j))
    }
}

impl Encode for SequentialCounter {
    fn n_lits(&self) -> usize {
        self.in_lits.len()
    }
}

impl BoundUpper for SequentialCounter {
    fn encode_ub<Col, R>(&mut self, range: R, collector: &mut Col, var_manager: &mut dyn ManageVars)
    where
        Col: CollectClauses,
        R: RangeBounds<usize>,
    {
        let range = super::prepare_ub_range(self, range);
        if range.is_empty() {
            return;
        }
        // enforcing `ub` needs column `ub`
        let width = range.end;
        if width <= self.ub_cols {
            return;
        }
        let n_clauses_before = collector.n_clauses();
        self.reserve_cols(width, var_manager);
        collector.extend(self.upward_clauses(self.ub_cols..width));
        self.ub_cols = width;
        self.n_clauses += collector.n_clauses() - n_clauses_before;
    }

    fn enforce_ub(&self, ub: usize) -> Result<Vec<Lit>, Error> {
        if ub >= self.n_lits() {
            return Ok(vec![]);
        }
        if ub >= self.ub_cols {
            return Err(Error::NotEncoded);
        }
        self.output(ub).map(|s| vec![!s]).ok_or(Error::NotEncoded)
    }
}

impl BoundLower for SequentialCounter {
    fn encode_lb<Col, R>(&mut self, range: R, collector: &mut Col, var_manager: &mut dyn ManageVars)
    where
        Col: CollectClauses,
        R: RangeBounds<usize>,
    {
        let range = super::prepare_lb_range(self, range);
        if range.is_empty() {
            return;
        }
        // enforcing `lb` needs column `lb - 1`
        let width = range.end - 1;
        if width <= self.lb_cols {
            return;
        }
        let n_clauses_before = collector.n_clauses();
        self.reserve_cols(width, var_manager);
        collector.extend(self.downward_clauses(self.lb_cols..width));
        self.lb_cols = width;
        self.n_clauses += collector.n_clauses() - n_clauses_before;
    }

    fn enforce_lb(&self, lb: usize) -> Result<Vec<Lit>, Error> {
        if lb == 0 {
            return Ok(vec![]);
        }
        if lb > self.n_lits() {
            return Err(Error::Unsat);
        }
        if lb > self.lb_cols {
            return Err(Error::NotEncoded);
        }
        self.output(lb - 1).map(|s| vec![s]).ok_or(Error::NotEncoded)
    }
}

impl EncodeStats for SequentialCounter {
    fn n_clauses(&self) -> usize {
        self.n_clauses
    }

    fn n_vars(&self) -> u32 {
        self.n_vars
    }
}

impl FromIterator<Lit> for SequentialCounter {
    fn from_iter<T: IntoIterator<Item = Lit>>(iter: T) -> Self {
        let in_lits: Vec<Lit> = iter.into_iter().collect();
        let regs = vec![vec![]; in_lits.len()];
        Self {
            in_lits,
            regs,
            ..Default::default()
        }
    }
}

impl From<Vec<Lit>> for SequentialCounter {
    fn from(lits: Vec<Lit>) -> Self {
        Self::from_iter(lits)
    }
}

#[cfg(test)]
mod tests {
    use super::SequentialCounter;
    use crate::{
        encodings::{
            card::{BoundLower, BoundUpper},
            EncodeStats, Error,
        },
        instances::{BasicVarManager, Cnf, ManageVars},
        lit,
        types::{Assignment, Lit, TernaryVal},
        var,
    };

    /// Checks whether some assignment of the auxiliary variables satisfies `cnf` and `units`,
    /// with the inputs fixed by `inputs`
    fn extendable(cnf: &Cnf, units: &[Lit], inputs: u32, n_in: u32, n_total: u32) -> bool {
        let n_aux = n_total - n_in;
        (0..1u32 << n_aux).any(|aux| {
            let mut assign = Assignment::default();
            for v in 0..n_in {
                assign.assign_var(var![v], TernaryVal::from((inputs >> v) & 1 == 1));
            }
            for v in 0..n_aux {
                assign.assign_var(var![n_in + v], TernaryVal::from((aux >> v) & 1 == 1));
            }
            cnf.iter().all(|cl| cl.is_sat(&assign))
                && units
                    .iter()
                    .all(|&l| assign.lit_value(l) == TernaryVal::True)
        })
    }

    fn in_lits(n: u32) -> Vec<Lit> {
        (0..n).map(|v| var![v].pos_lit()).collect()
    }

    #[test]
    fn ub_exhaustive() {
        for n in 1..=4u32 {
            for ub in 0..n as usize {
                let mut enc = SequentialCounter::from(in_lits(n));
                let mut vm = BasicVarManager::from_next_free(var![n]);
                let mut cnf = Cnf::new();
                enc.encode_ub(ub..=ub, &mut cnf, &mut vm);
                let units = enc.enforce_ub(ub).unwrap();
                let n_total = vm.n_used();
                assert!(n_total - n <= 10);
                for inputs in 0..1u32 << n {
                    let count = inputs.count_ones() as usize;
                    assert_eq!(
                        extendable(&cnf, &units, inputs, n, n_total),
                        count <= ub,
                        "n={n} ub={ub} inputs={inputs:b}"
                    );
                }
            }
        }
    }

    #[test]
    fn lb_exhaustive() {
        for n in 1..=4u32 {
            for lb in 1..=n as usize {
                let mut enc = SequentialCounter::from(in_lits(n));
                let mut vm = BasicVarManager::from_next_free(var![n]);
                let mut cnf = Cnf::new();
                enc.encode_lb(lb..=lb, &mut cnf, &mut vm);
                let units = enc.enforce_lb(lb).unwrap();
                let n_total = vm.n_used();
                for inputs in 0..1u32 << n {
                    let count = inputs.count_ones() as usize;
                    assert_eq!(
                        extendable(&cnf, &units, inputs, n, n_total),
                        count >= lb,
                        "n={n} lb={lb} inputs={inputs:b}"
                    );
                }
            }
        }
    }

    #[test]
    fn negated_inputs() {
        let lits = vec![!lit![0], lit![1], !lit![2]];
        let mut enc = SequentialCounter::from(lits);
        let mut vm = BasicVarManager::from_next_free(var![3]);
        let mut cnf = Cnf::new();
        enc.encode_lb(2..=2, &mut cnf, &mut vm);
        let units = enc.enforce_lb(2).unwrap();
        let n_total = vm.n_used();
        // x0 = 0, x1 = 0, x2 = 0 -> two true literals
        assert!(extendable(&cnf, &units, 0b000, 3, n_total));
        // x0 = 1, x1 = 0, x2 = 0 -> one true literal
        assert!(!extendable(&cnf, &units, 0b001, 3, n_total));
    }

    #[test]
    fn enforce_errors() {
        let mut enc = SequentialCounter::from(in_lits(4));
        assert_eq!(enc.enforce_ub(1), Err(Error::NotEncoded));
        assert_eq!(enc.enforce_ub(4), Ok(vec![]));
        assert_eq!(enc.enforce_lb(0), Ok(vec![]));
        assert_eq!(enc.enforce_lb(5), Err(Error::Unsat));
        let mut vm = BasicVarManager::from_next_free(var![4]);
        let mut cnf = Cnf::new();
        enc.encode_ub(..2, &mut cnf, &mut vm);
        assert!(enc.enforce_ub(1).is_ok());
        assert_eq!(enc.enforce_ub(2), Err(Error::NotEncoded));
        assert_eq!(enc.enforce_lb(1), Err(Error::NotEncoded));
    }

    #[test]
    fn lazy_extension() {
        let mut enc = SequentialCounter::from(in_lits(5));
        let mut vm = BasicVarManager::from_next_free(var![5]);
        let mut cnf = Cnf::new();
        enc.encode_ub(1..=1, &mut cnf, &mut vm);
        let n_clauses = cnf.len();
        let n_vars = enc.n_vars();
        assert_eq!(enc.n_clauses(), n_clauses);
        // encoding the same bound again adds nothing
        enc.encode_ub(0..=1, &mut cnf, &mut vm);
        assert_eq!(cnf.len(), n_clauses);
        enc.encode_ub(3..=3, &mut cnf, &mut vm);
        assert!(cnf.len() > n_clauses);
        assert!(enc.n_vars() > n_vars);
        assert_eq!(enc.n_clauses(), cnf.len());
        assert_eq!(vm.n_used(), 5 + enc.n_vars());
    }
}

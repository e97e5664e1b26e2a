//! # Clause-Satisfaction Indicators
//!
//! Introduces one fresh indicator variable `v(i)` per clause `C(i)` of a [`Formula`] together
//! with clauses enforcing `v(i) <-> C(i)`:
//!
//! - forward `v(i) -> C(i)`: the single clause `(!v(i) | l1 | ... | lj)`, which is the unit
//!   `(!v(i))` for the empty clause,
//! - backward `C(i) -> v(i)`: one binary clause `(!lk | v(i))` per literal `lk`.
//!
//! The indicator of clause `i` is the variable with index `n_vars + i`, i.e., the DIMACS
//! variable `n_vars + i + 1`.

use crate::{
    instances::{BasicVarManager, Cnf, Formula, ManageVars},
    types::{Lit, Var},
};

/// The indicator variables of a formula and the clauses defining them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Indicators {
    /// Indicator variables, in clause order
    vars: Vec<Var>,
    /// The bicondition clauses
    clauses: Cnf,
}

impl Indicators {
    /// Encodes the indicators of all clauses of a formula
    #[must_use]
    pub fn encode(formula: &Formula) -> Self {
        let mut var_manager = BasicVarManager::from_next_free(Var::new(formula.n_vars()));
        let mut vars = Vec::with_capacity(formula.n_clauses());
        let n_lits: usize = formula.iter().map(|cl| cl.len()).sum();
        let mut clauses = Cnf::with_capacity(formula.n_clauses() + n_lits);
        for cl in formula.iter() {
            let ind = var_manager.new_var();
            clauses.add_lit_impl_clause(ind.pos_lit(), cl.lits());
            clauses.add_clause_impl_lit(cl.lits(), ind.pos_lit());
            vars.push(ind);
        }
        Indicators { vars, clauses }
    }

    /// Gets the number of indicators, which equals the number of clauses
    #[must_use]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Checks whether there are no indicators
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Gets the indicator variable of clause `idx`
    ///
    /// # Panics
    ///
    /// If `idx` is not a clause index.
    #[must_use]
    pub fn var(&self, idx: usize) -> Var {
        self.vars[idx]
    }

    /// Gets the clause index that an indicator variable stands for
    #[must_use]
    pub fn clause_idx(&self, var: Var) -> Option<usize> {
        let first = self.vars.first()?;
        let idx = var.idx().checked_sub(first.idx())?;
        (idx < self.vars.len()).then_some(idx)
    }

    /// Gets the indicator variables in clause order
    #[must_use]
    pub fn vars(&self) -> &[Var] {
        &self.vars
    }

    /// Gets the positive indicator literals in clause order
    #[must_use]
    pub fn lits(&self) -> Vec<Lit> {
        self.vars.iter().map(|v| v.pos_lit()).collect()
    }

    /// Gets the clauses defining the indicators
    #[must_use]
    pub fn clauses(&self) -> &Cnf {
        &self.clauses
    }

    /// Gets the highest variable of the formula and its indicators
    #[must_use]
    pub fn max_var(&self) -> Option<Var> {
        self.vars.last().copied()
    }

    /// Creates a variable manager handing out variables after the last indicator, for the
    /// auxiliary variables of cardinality encodings over the indicators
    #[must_use]
    pub fn var_manager(&self, formula: &Formula) -> BasicVarManager {
        let next_free = self
            .max_var()
            .map_or_else(|| Var::new(formula.n_vars()), |v| v + 1);
        BasicVarManager::from_next_free(next_free)
    }
}

#[cfg(test)]
mod tests {
    use super::Indicators;
    use crate::{
        clause,
        instances::{Formula, ManageVars},
        lit,
        types::{Assignment, Clause, TernaryVal},
        var,
    };

    fn formula() -> Formula {
        Formula::new(
            vec![
                clause![lit![0], !lit![1]],
                Clause::new(),
                clause![lit![2]],
                clause![!lit![0], lit![1], lit![2]],
            ],
            3,
        )
    }

    #[test]
    fn indicator_vars() {
        let form = formula();
        let inds = Indicators::encode(&form);
        assert_eq!(inds.len(), 4);
        assert_eq!(inds.vars(), &[var![3], var![4], var![5], var![6]]);
        assert_eq!(inds.var(2).to_ipasir(), 3 + 2 + 1);
        assert_eq!(inds.clause_idx(var![5]), Some(2));
        assert_eq!(inds.clause_idx(var![1]), None);
        assert_eq!(inds.clause_idx(var![7]), None);
        assert_eq!(inds.var_manager(&form).max_var(), Some(var![6]));
    }

    #[test]
    fn bicondition_clauses() {
        let inds = Indicators::encode(&formula());
        let cls = inds.clauses();
        // 4 forward clauses and one backward clause per literal
        assert_eq!(cls.len(), 4 + 2 + 0 + 1 + 3);
        assert_eq!(cls[0], clause![!lit![3], lit![0], !lit![1]]);
        assert_eq!(cls[1], clause![!lit![0], lit![3]]);
        assert_eq!(cls[2], clause![lit![1], lit![3]]);
        // empty clause: only the forward unit
        assert_eq!(cls[3], clause![!lit![4]]);
        assert_eq!(cls[4], clause![!lit![5], lit![2]]);
    }

    #[test]
    fn indicators_match_clause_satisfaction() {
        let form = formula();
        let inds = Indicators::encode(&form);
        for orig in 0..1u32 << 3 {
            for ind in 0..1u32 << 4 {
                let mut assign = Assignment::default();
                for v in 0..3 {
                    assign.assign_var(var![v], TernaryVal::from((orig >> v) & 1 == 1));
                }
                for i in 0..4 {
                    assign.assign_var(inds.var(i), TernaryVal::from((ind >> i) & 1 == 1));
                }
                let bicond_sat = inds.clauses().iter().all(|cl| cl.is_sat(&assign));
                let inds_match = form.iter().enumerate().all(|(i, cl)| {
                    cl.is_sat(&assign) == (assign.var_value(inds.var(i)) == TernaryVal::True)
                });
                assert_eq!(bicond_sat, inds_match, "orig={orig:b} ind={ind:b}");
            }
        }
    }

    #[test]
    fn no_clauses() {
        let form = Formula::new(vec![], 2);
        let inds = Indicators::encode(&form);
        assert!(inds.is_empty());
        assert!(inds.clauses().is_empty());
        assert_eq!(inds.var_manager(&form).max_var(), Some(var![1]));
    }
}

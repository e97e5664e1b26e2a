//! # Exact Branch and Bound
//!
//! An oracle-independent MaxSAT solver for cross-checking the probing strategies. Depth-first
//! search over the formula's variables in index order with incremental per-clause counters.
//! A branch is cut as soon as it falsifies as many clauses as the best complete assignment
//! found so far. Only suitable for small formulas.

use crate::{instances::Formula, types::Assignment};

/// Branch and bound MaxSAT solver
#[derive(Debug, Clone)]
pub struct BranchAndBound<'f> {
    formula: &'f Formula,
    /// Per variable: clause index and literal polarity of each occurrence
    occurrences: Vec<Vec<(usize, bool)>>,
}

impl<'f> BranchAndBound<'f> {
    /// Prepares the search for a formula
    #[must_use]
    pub fn new(formula: &'f Formula) -> Self {
        let mut occurrences = vec![vec![]; formula.n_vars() as usize];
        for (idx, cl) in formula.iter().enumerate() {
            for lit in cl {
                occurrences[lit.vidx()].push((idx, lit.is_pos()));
            }
        }
        BranchAndBound {
            formula,
            occurrences,
        }
    }

    /// Finds the minimum number of falsified clauses and an assignment achieving it
    #[must_use]
    pub fn solve(&self) -> (usize, Assignment) {
        let n_vars = self.occurrences.len();
        let mut search = Search {
            occurrences: &self.occurrences,
            n_true: vec![0; self.formula.n_clauses()],
            n_open: self.formula.iter().map(|cl| cl.len()).collect(),
            falsified: self.formula.iter().filter(|cl| cl.is_empty()).count(),
            assign: vec![false; n_vars],
            best: 0,
            best_assign: vec![false; n_vars],
        };
        search.best = self
            .formula
            .cost_of(&Assignment::from(search.best_assign.clone()));
        search.dfs(0);
        (search.best, Assignment::from(search.best_assign))
    }
}

struct Search<'a> {
    occurrences: &'a [Vec<(usize, bool)>],
    n_true: Vec<usize>,
    n_open: Vec<usize>,
    falsified: usize,
    assign: Vec<bool>,
    best: usize,
    best_assign: Vec<bool>,
}

impl Search<'_> {
    fn dfs(&mut self, var: usize) {
        if self.falsified >= self.best {
            return;
        }
        if var == self.assign.len() {
            self.best = self.falsified;
            self.best_assign.clone_from(&self.assign);
            return;
        }
        for val in [true, false] {
            self.set(var, val);
            self.dfs(var + 1);
            self.unset(var, val);
        }
    }

    fn set(&mut self, var: usize, val: bool) {
        self.assign[var] = val;
        for &(cl, pos) in &self.occurrences[var] {
            self.n_open[cl] -= 1;
            if pos == val {
                self.n_true[cl] += 1;
            } else if self.n_true[cl] == 0 && self.n_open[cl] == 0 {
                self.falsified += 1;
            }
        }
    }

    fn unset(&mut self, var: usize, val: bool) {
        for &(cl, pos) in self.occurrences[var].iter().rev() {
            if pos == val {
                self.n_true[cl] -= 1;
            } else if self.n_true[cl] == 0 && self.n_open[cl] == 0 {
                self.falsified -= 1;
            }
            self.n_open[cl] += 1;
        }
    }
}

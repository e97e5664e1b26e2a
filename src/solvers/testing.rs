//! Small oracles for unit tests

use anyhow::anyhow;

use super::{Solve, SolverError, SolverResult, SolverState};
use crate::types::{Clause, Lit, TernaryVal};

/// A plain DPLL solver with unit propagation
#[derive(Debug, Default)]
pub struct Dpll {
    clauses: Vec<Clause>,
    n_vars: usize,
    state: Option<SolverState>,
    model: Vec<bool>,
}

fn dpll(clauses: &[Clause], assign: &mut [Option<bool>]) -> bool {
    let mut trail = vec![];
    let undo = |assign: &mut [Option<bool>], trail: &[usize]| {
        trail.iter().for_each(|&v| assign[v] = None);
    };
    loop {
        let mut changed = false;
        for cl in clauses {
            let mut sat = false;
            let mut open: Option<Lit> = None;
            let mut n_open = 0;
            for &lit in cl {
                match assign[lit.vidx()] {
                    Some(val) if val == lit.is_pos() => {
                        sat = true;
                        break;
                    }
                    Some(_) => (),
                    None => {
                        n_open += 1;
                        open = Some(lit);
                    }
                }
            }
            if sat {
                continue;
            }
            match (n_open, open) {
                (0, _) => {
                    undo(assign, &trail);
                    return false;
                }
                (1, Some(lit)) => {
                    assign[lit.vidx()] = Some(lit.is_pos());
                    trail.push(lit.vidx());
                    changed = true;
                }
                _ => (),
            }
        }
        if !changed {
            break;
        }
    }
    let Some(var) = assign.iter().position(Option::is_none) else {
        return true;
    };
    for val in [false, true] {
        assign[var] = Some(val);
        if dpll(clauses, assign) {
            return true;
        }
    }
    assign[var] = None;
    undo(assign, &trail);
    false
}

impl Extend<Clause> for Dpll {
    fn extend<T: IntoIterator<Item = Clause>>(&mut self, iter: T) {
        iter.into_iter()
            .for_each(|cl| self.add_clause(cl).expect("adding never fails"));
    }
}

impl Solve for Dpll {
    fn signature(&self) -> &'static str {
        "test-dpll"
    }

    fn reserve(&mut self, max_var: crate::types::Var) -> anyhow::Result<()> {
        self.n_vars = self.n_vars.max(max_var.idx() + 1);
        Ok(())
    }

    fn solve(&mut self) -> anyhow::Result<SolverResult> {
        let mut assign = vec![None; self.n_vars];
        if dpll(&self.clauses, &mut assign) {
            self.model = assign.into_iter().map(|v| v.unwrap_or(false)).collect();
            self.state = Some(SolverState::Sat);
            Ok(SolverResult::Sat)
        } else {
            self.state = Some(SolverState::Unsat);
            Ok(SolverResult::Unsat)
        }
    }

    fn lit_val(&self, lit: Lit) -> anyhow::Result<TernaryVal> {
        match self.state {
            Some(SolverState::Sat) => Ok(self
                .model
                .get(lit.vidx())
                .map_or(TernaryVal::DontCare, |&val| {
                    TernaryVal::from(val == lit.is_pos())
                })),
            state => Err(SolverError::State(
                state.unwrap_or(SolverState::Input),
                SolverState::Sat,
            )
            .into()),
        }
    }

    fn add_clause_ref(&mut self, clause: &Clause) -> anyhow::Result<()> {
        if let Some(max) = clause.iter().map(|l| l.vidx() + 1).max() {
            self.n_vars = self.n_vars.max(max);
        }
        self.clauses.push(clause.clone());
        self.state = Some(SolverState::Input);
        Ok(())
    }
}

/// An oracle that is always interrupted
#[derive(Debug, Default)]
pub struct Interrupting;

impl Extend<Clause> for Interrupting {
    fn extend<T: IntoIterator<Item = Clause>>(&mut self, _iter: T) {}
}

impl Solve for Interrupting {
    fn signature(&self) -> &'static str {
        "test-interrupting"
    }

    fn solve(&mut self) -> anyhow::Result<SolverResult> {
        Ok(SolverResult::Interrupted)
    }

    fn lit_val(&self, _lit: Lit) -> anyhow::Result<TernaryVal> {
        Err(SolverError::State(SolverState::Input, SolverState::Sat).into())
    }

    fn add_clause_ref(&mut self, _clause: &Clause) -> anyhow::Result<()> {
        Ok(())
    }
}

/// An oracle that rejects every clause
#[derive(Debug, Default)]
pub struct Failing;

impl Extend<Clause> for Failing {
    fn extend<T: IntoIterator<Item = Clause>>(&mut self, _iter: T) {}
}

impl Solve for Failing {
    fn signature(&self) -> &'static str {
        "test-failing"
    }

    fn solve(&mut self) -> anyhow::Result<SolverResult> {
        Err(anyhow!("out of memory"))
    }

    fn lit_val(&self, _lit: Lit) -> anyhow::Result<TernaryVal> {
        Err(anyhow!("out of memory"))
    }

    fn add_clause_ref(&mut self, _clause: &Clause) -> anyhow::Result<()> {
        Err(anyhow!("out of memory"))
    }
}

#[cfg(test)]
mod tests {
    use super::Dpll;
    use crate::{
        clause, lit,
        solvers::{Solve, SolverResult},
        types::{Clause, TernaryVal},
    };

    #[test]
    fn sat_and_unsat() {
        let mut solver = Dpll::default();
        solver.add_clause(clause![lit![0], lit![1]]).unwrap();
        solver.add_clause(clause![!lit![0]]).unwrap();
        assert!(solver.lit_val(lit![0]).is_err());
        assert_eq!(solver.solve().unwrap(), SolverResult::Sat);
        assert_eq!(solver.lit_val(lit![1]).unwrap(), TernaryVal::True);
        solver.add_clause(clause![!lit![1]]).unwrap();
        assert_eq!(solver.solve().unwrap(), SolverResult::Unsat);
        let mut solver = Dpll::default();
        solver.add_clause(Clause::new()).unwrap();
        assert_eq!(solver.solve().unwrap(), SolverResult::Unsat);
    }
}

//! # maxsat-reduce-batsat - BatSat as an Oracle for maxsat-reduce
//!
//! Interface to the [BatSat](https://github.com/c-cube/batsat) SAT solver to be used as the
//! oracle of the `maxsat-reduce` search strategies.
//!
//! BatSat is fully implemented in Rust, so no C toolchain is needed to build it.
//!
//! # BatSat Version
//!
//! The version of BatSat in this crate is Version 0.6.0.

#![warn(clippy::pedantic)]
#![warn(missing_docs)]

use batsat::{intmap::AsIndex, lbool, Callbacks, SolverInterface};
use maxsat_reduce::{
    solvers::{Solve, SolverError, SolverResult, SolverState},
    types::{Clause, Lit, TernaryVal, Var},
};

/// Oracle wrapper for [`batsat::BasicSolver`]
pub type BasicSolver = Solver<batsat::BasicCallbacks>;

/// Oracle wrapper for a [`batsat::Solver`] Solver from BatSat
///
/// BatSat variable `i + 1` represents variable `i`, BatSat variable `0` is unused.
#[derive(Default)]
pub struct Solver<Cb: Callbacks> {
    internal: batsat::Solver<Cb>,
    state: Option<SolverState>,
}

impl<Cb: Callbacks> Solver<Cb> {
    /// Gets a reference to the internal [`batsat::Solver`]
    #[must_use]
    pub fn batsat_ref(&self) -> &batsat::Solver<Cb> {
        &self.internal
    }

    fn external_state(&self) -> SolverState {
        self.state.unwrap_or(SolverState::Input)
    }
}

impl<Cb: Callbacks> Extend<Clause> for Solver<Cb> {
    fn extend<T: IntoIterator<Item = Clause>>(&mut self, iter: T) {
        iter.into_iter()
            .for_each(|cl| self.add_clause(cl).expect("Error adding clause in extend"));
    }
}

impl<Cb: Callbacks> Solve for Solver<Cb> {
    fn signature(&self) -> &'static str {
        "BatSat 0.6.0"
    }

    fn reserve(&mut self, max_var: Var) -> anyhow::Result<()> {
        self.internal.var_of_int(max_var.idx32() + 1);
        Ok(())
    }

    fn solve(&mut self) -> anyhow::Result<SolverResult> {
        let ret = match self.internal.solve_limited(&[]) {
            x if x == lbool::TRUE => {
                self.state = Some(SolverState::Sat);
                SolverResult::Sat
            }
            x if x == lbool::FALSE => {
                self.state = Some(SolverState::Unsat);
                SolverResult::Unsat
            }
            x if x == lbool::UNDEF => {
                self.state = Some(SolverState::Input);
                SolverResult::Interrupted
            }
            _ => unreachable!(),
        };
        Ok(ret)
    }

    fn lit_val(&self, lit: Lit) -> anyhow::Result<TernaryVal> {
        if self.external_state() != SolverState::Sat {
            return Err(SolverError::State(self.external_state(), SolverState::Sat).into());
        }
        let l = batsat::Lit::new(batsat::Var::from_index(lit.vidx() + 1), lit.is_pos());

        match self.internal.value_lit(l) {
            x if x == lbool::TRUE => Ok(TernaryVal::True),
            x if x == lbool::FALSE => Ok(TernaryVal::False),
            x if x == lbool::UNDEF => Ok(TernaryVal::DontCare),
            _ => unreachable!(),
        }
    }

    fn add_clause_ref(&mut self, clause: &Clause) -> anyhow::Result<()> {
        self.state = Some(SolverState::Input);

        let mut c: Vec<_> = clause
            .iter()
            .map(|l| batsat::Lit::new(self.internal.var_of_int(l.vidx32() + 1), l.is_pos()))
            .collect();

        self.internal.add_clause_reuse(&mut c);

        Ok(())
    }
}

//! # Interfaces to SAT Oracles
//!
//! The search strategies treat the SAT solver as an external decision procedure. Every oracle
//! they use implements [`Solve`]; a fresh instance is obtained for each query through an
//! [`Initialize`] implementation.
//!
//! ## Available Oracles
//!
//! ### BatSat
//!
//! [BatSat](https://github.com/c-cube/batsat) is a SAT solver fully implemented in Rust. It is
//! available through the `maxsat-reduce-batsat` crate of this workspace.
//!
//! Oracles outside of this workspace can implement [`Solve`] to be used with the search
//! strategies.

use std::fmt;

use thiserror::Error;

use crate::{
    clause,
    instances::Cnf,
    types::{Assignment, Clause, Lit, TernaryVal, Var},
};

#[cfg(test)]
pub(crate) mod testing;

/// Trait for all SAT oracles in this library.
pub trait Solve: Extend<Clause> {
    /// Gets a signature of the solver implementation
    fn signature(&self) -> &'static str;
    /// Reserves memory in the solver until a maximum variables, if the solver
    /// supports it
    ///
    /// # Errors
    ///
    /// A specific implementation might fail.
    fn reserve(&mut self, _max_var: Var) -> anyhow::Result<()> {
        Ok(())
    }
    /// Solves the internal CNF formula without any assumptions.
    ///
    /// # Errors
    ///
    /// A specific implementation might fail.
    fn solve(&mut self) -> anyhow::Result<SolverResult>;
    /// Gets a solution found by the solver.
    ///
    /// # Errors
    ///
    /// - If the solver is not in the satisfied state
    /// - A specific implementation might return other errors
    fn solution(&self, high_var: Var) -> anyhow::Result<Assignment> {
        let len = high_var.idx32() + 1;
        let mut assignment = Vec::with_capacity(len as usize);
        for idx in 0..len {
            assignment.push(self.lit_val(Lit::positive(idx))?);
        }
        Ok(Assignment::from(assignment))
    }
    /// Same as [`Solve::lit_val`], but for variables.
    ///
    /// # Errors
    ///
    /// See [`Solve::lit_val`].
    fn var_val(&self, var: Var) -> anyhow::Result<TernaryVal> {
        self.lit_val(var.pos_lit())
    }
    /// Gets an assignment of a variable in the solver.
    ///
    /// # Errors
    ///
    /// - If the solver is not in the satisfied state
    /// - A specific implementation might return other errors
    fn lit_val(&self, lit: Lit) -> anyhow::Result<TernaryVal>;
    /// Adds a clause to the solver by reference
    ///
    /// # Errors
    ///
    /// A specific implementation might fail.
    fn add_clause_ref(&mut self, clause: &Clause) -> anyhow::Result<()>;
    /// Adds a clause to the solver.
    ///
    /// # Errors
    ///
    /// See [`Solve::add_clause_ref`].
    fn add_clause(&mut self, clause: Clause) -> anyhow::Result<()> {
        self.add_clause_ref(&clause)
    }
    /// Like [`Solve::add_clause`] but for unit clauses (clauses with one literal).
    ///
    /// # Errors
    ///
    /// See [`Solve::add_clause_ref`].
    fn add_unit(&mut self, lit: Lit) -> anyhow::Result<()> {
        self.add_clause(clause![lit])
    }
    /// Like [`Solve::add_clause`] but for clauses with two literals.
    ///
    /// # Errors
    ///
    /// See [`Solve::add_clause_ref`].
    fn add_binary(&mut self, lit1: Lit, lit2: Lit) -> anyhow::Result<()> {
        self.add_clause(clause![lit1, lit2])
    }
    /// Adds all clauses from a [`Cnf`] instance.
    ///
    /// # Errors
    ///
    /// See [`Solve::add_clause_ref`].
    fn add_cnf(&mut self, cnf: Cnf) -> anyhow::Result<()> {
        cnf.into_iter().try_for_each(|cl| self.add_clause(cl))
    }
    /// Adds all clauses from a [`Cnf`] instance by reference.
    ///
    /// # Errors
    ///
    /// See [`Solve::add_clause_ref`].
    fn add_cnf_ref(&mut self, cnf: &Cnf) -> anyhow::Result<()> {
        cnf.iter().try_for_each(|cl| self.add_clause_ref(cl))
    }
}

/// Trait for creating fresh oracle instances
pub trait Initialize<S> {
    /// Creates a new, empty oracle
    fn init() -> S;
}

/// Initializer for every oracle implementing [`Default`]
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultInitializer;

impl<S: Default> Initialize<S> for DefaultInitializer {
    fn init() -> S {
        S::default()
    }
}

/// States that the solver can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverState {
    /// Input state, while adding clauses.
    Input,
    /// The query was found satisfiable.
    Sat,
    /// The query was found unsatisfiable.
    Unsat,
}

impl fmt::Display for SolverState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverState::Input => write!(f, "INPUT"),
            SolverState::Sat => write!(f, "SAT"),
            SolverState::Unsat => write!(f, "UNSAT"),
        }
    }
}

/// Return value for solving queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolverResult {
    /// The query was found satisfiable.
    Sat,
    /// The query was found unsatisfiable.
    Unsat,
    /// The query was prematurely interrupted.
    Interrupted,
}

impl fmt::Display for SolverResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverResult::Sat => write!(f, "SAT"),
            SolverResult::Unsat => write!(f, "UNSAT"),
            SolverResult::Interrupted => write!(f, "Interrupted"),
        }
    }
}

/// Type representing solver errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolverError {
    /// The solver was expected to be in the second [`SolverState`], but it is in the first.
    #[error("solver needs to be in state {1} but was in state {0}")]
    State(SolverState, SolverState),
}

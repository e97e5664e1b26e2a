//! # MaxSAT by Cardinality Probing
//!
//! Unit-weight MaxSAT solved through a sequence of SAT queries. A plain satisfiability check of
//! the formula comes first; if the formula is unsatisfiable, every clause `C(i)` gets an
//! indicator `v(i) <-> C(i)` and the strategies probe bounds `sum v(i) >= k` to find the largest
//! satisfiable `k`. The cost is the number of clauses minus that `k`.
//!
//! All strategies return the same cost on the same formula. They differ in the order in which
//! they test bounds:
//!
//! - [`Strategy::DescendingRelaxation`] tests `k = n-1, ..., 0` and stops at the first
//!   satisfiable bound,
//! - [`Strategy::AscendingTightening`] tests `k = 0, 1, ...` and stops at the first
//!   unsatisfiable bound,
//! - [`Strategy::BinarySearch`] bisects `[0, n-1]`, relying on satisfiability of `sum v(i) >= k`
//!   being antitone in `k`.
//!
//! Every query runs in a fresh oracle, see [`CardinalityProbe`].
//!
//! ## Example Usage
//!
//! ```
//! use maxsat_reduce::{algs::maxsat::Strategy, instances::Formula};
//! use maxsat_reduce_batsat::BasicSolver;
//!
//! let formula: Formula = "p cnf 1 2\n1 0\n-1 0\n".parse().unwrap();
//! let res = Strategy::BinarySearch.solve::<BasicSolver>(&formula).unwrap();
//! assert_eq!(res.cost, 1);
//! ```

use core::time::Duration;
use std::fmt;

use log::info;
use thiserror::Error;

use crate::{
    encodings::{
        self,
        card::{BoundBoth, DefBothBounding},
        indicator::Indicators,
    },
    instances::Formula,
    solvers::{DefaultInitializer, Initialize, Solve},
    types::{Assignment, Lit},
};

mod ascending;
mod binary;
pub mod bnb;
mod descending;
pub mod probe;

pub use bnb::BranchAndBound;
pub use probe::{CardinalityProbe, ProbeResult};

/// Errors during a MaxSAT search
#[derive(Error, Debug)]
pub enum Error {
    /// The oracle failed or was interrupted. The query outcome is unknown.
    #[error("oracle unavailable: {0}")]
    OracleUnavailable(String),
    /// The cardinality encoding could not enforce a bound
    #[error("encoding error: {0}")]
    Encoding(#[from] encodings::Error),
    /// The oracle found the indicator clauses without any bound unsatisfiable
    #[error("oracle reported the trivial bound as unsatisfiable")]
    Inconsistent,
}

/// The search strategies
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Linear search from the number of clauses downwards
    DescendingRelaxation,
    /// Linear search from zero upwards
    AscendingTightening,
    /// Binary search over the bounds
    BinarySearch,
}

impl Strategy {
    /// All strategies
    pub const ALL: [Strategy; 3] = [
        Strategy::DescendingRelaxation,
        Strategy::AscendingTightening,
        Strategy::BinarySearch,
    ];

    /// Solves a formula with oracle `S`, the default cardinality encoding and a default
    /// initialized oracle per query
    ///
    /// # Errors
    ///
    /// [`Error::OracleUnavailable`] if any oracle call fails or is interrupted.
    pub fn solve<S>(self, formula: &Formula) -> Result<SearchResult, Error>
    where
        S: Solve + Default,
    {
        self.solve_with::<S, DefBothBounding, DefaultInitializer>(formula)
    }

    /// Solves a formula with oracle `S` obtained from initializer `I` and cardinality encoding
    /// `CE`
    ///
    /// # Errors
    ///
    /// [`Error::OracleUnavailable`] if any oracle call fails or is interrupted.
    pub fn solve_with<S, CE, I>(self, formula: &Formula) -> Result<SearchResult, Error>
    where
        S: Solve,
        CE: BoundBoth + FromIterator<Lit>,
        I: Initialize<S>,
    {
        let mut stats = SearchStats::default();
        if let Some(witness) = probe::check_sat::<S, I>(formula, &mut stats)? {
            info!("{self}: formula satisfiable, cost 0");
            return Ok(SearchResult {
                cost: 0,
                witness: Some(restrict(witness, formula)),
                stats,
            });
        }

        let indicators = Indicators::encode(formula);
        let mut probe = CardinalityProbe::<S, CE, I>::new(formula, &indicators);
        let (best, witness) = match self {
            Strategy::DescendingRelaxation => descending::search(&mut probe)?,
            Strategy::AscendingTightening => ascending::search(&mut probe)?,
            Strategy::BinarySearch => binary::search(&mut probe)?,
        };
        stats += probe.into_stats();

        let cost = formula.n_clauses() - best;
        info!(
            "{self}: cost {cost} of {} clauses after {} probes",
            formula.n_clauses(),
            stats.probes
        );
        Ok(SearchResult {
            cost,
            witness: Some(restrict(witness, formula)),
            stats,
        })
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::DescendingRelaxation => write!(f, "descending-relaxation"),
            Strategy::AscendingTightening => write!(f, "ascending-tightening"),
            Strategy::BinarySearch => write!(f, "binary-search"),
        }
    }
}

/// Solves a formula with a given strategy and oracle `S`
///
/// # Errors
///
/// [`Error::OracleUnavailable`] if any oracle call fails or is interrupted.
pub fn solve<S>(formula: &Formula, strategy: Strategy) -> Result<SearchResult, Error>
where
    S: Solve + Default,
{
    strategy.solve::<S>(formula)
}

/// The outcome of a search
#[derive(Clone, Debug, PartialEq)]
pub struct SearchResult {
    /// The minimum number of falsified clauses
    pub cost: usize,
    /// An assignment of the formula's variables falsifying exactly `cost` clauses
    pub witness: Option<Assignment>,
    /// Statistics of the search
    pub stats: SearchStats,
}

/// Statistics of a search
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// The number of cardinality probes
    pub probes: usize,
    /// The number of oracle calls, including the plain satisfiability check
    pub oracle_calls: usize,
    /// The number of satisfiable oracle calls
    pub n_sat: usize,
    /// The number of unsatisfiable oracle calls
    pub n_unsat: usize,
    /// The CPU time spent in oracle calls
    pub oracle_cpu_time: Duration,
}

impl std::ops::AddAssign for SearchStats {
    fn add_assign(&mut self, rhs: Self) {
        self.probes += rhs.probes;
        self.oracle_calls += rhs.oracle_calls;
        self.n_sat += rhs.n_sat;
        self.n_unsat += rhs.n_unsat;
        self.oracle_cpu_time += rhs.oracle_cpu_time;
    }
}

/// Restricts an oracle witness to the variables of the formula
fn restrict(witness: Assignment, formula: &Formula) -> Assignment {
    match formula.max_var() {
        Some(max_var) => witness.truncate(max_var),
        None => Assignment::default(),
    }
}

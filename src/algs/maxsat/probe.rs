//! # Cardinality Probes
//!
//! A probe asks a fresh oracle whether the indicator clauses of a formula together with a
//! cardinality bound `sum v(i) >= k` (or `<= k`) over the indicators are satisfiable. The
//! original clauses only enter in relaxed form, through the indicator clauses. Nothing is kept
//! between probes.

use std::{fmt, marker::PhantomData};

use cpu_time::ProcessTime;
use log::{debug, trace};

use super::{Error, SearchStats};
use crate::{
    encodings::{
        card::{self, BoundBoth, DefBothBounding},
        indicator::Indicators,
    },
    instances::{Cnf, Formula, ManageVars},
    solvers::{DefaultInitializer, Initialize, Solve, SolverResult},
    types::{
        constraints::{BoundMode, CardConstraint},
        Assignment, Clause, Lit, Var,
    },
};

/// The outcome of a probe
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProbeResult {
    /// The bound is satisfiable. The witness assigns every variable of the query, including
    /// indicators and auxiliary encoding variables.
    Sat(Assignment),
    /// The bound is unsatisfiable
    Unsat,
}

impl ProbeResult {
    /// Checks whether the probe was satisfiable
    #[must_use]
    pub fn is_sat(&self) -> bool {
        matches!(self, ProbeResult::Sat(_))
    }
}

/// Probes cardinality bounds over the indicators of a formula
///
/// # Generics
///
/// - `S`: the oracle type
/// - `CE`: the cardinality encoding for the bounds
/// - `I`: an initializer for `S`, implementing [`Initialize`]
pub struct CardinalityProbe<'f, S, CE = DefBothBounding, I = DefaultInitializer> {
    formula: &'f Formula,
    indicators: &'f Indicators,
    stats: SearchStats,
    _oracle: PhantomData<fn() -> (S, CE, I)>,
}

impl<'f, S, CE, I> CardinalityProbe<'f, S, CE, I>
where
    S: Solve,
    CE: BoundBoth + FromIterator<Lit>,
    I: Initialize<S>,
{
    /// Creates a probe for a formula and its indicators
    #[must_use]
    pub fn new(formula: &'f Formula, indicators: &'f Indicators) -> Self {
        CardinalityProbe {
            formula,
            indicators,
            stats: SearchStats::default(),
            _oracle: PhantomData,
        }
    }

    /// Gets the number of clauses, the largest valid bound
    #[must_use]
    pub fn n_clauses(&self) -> usize {
        self.indicators.len()
    }

    /// Checks whether at least (or at most) `bound` clauses can be satisfied simultaneously
    ///
    /// # Panics
    ///
    /// If `bound` is larger than the number of clauses.
    ///
    /// # Errors
    ///
    /// [`Error::OracleUnavailable`] if the oracle fails or is interrupted, [`Error::Encoding`] if
    /// the encoding `CE` fails to enforce the bound.
    pub fn probe(&mut self, bound: usize, mode: BoundMode) -> Result<ProbeResult, Error> {
        assert!(
            bound <= self.n_clauses(),
            "invalid bound {bound} for {} clauses",
            self.n_clauses()
        );
        let mut var_manager = self.indicators.var_manager(self.formula);
        let mut card_clauses = Cnf::new();
        card::encode_cardinality_constraint::<CE, _>(
            CardConstraint::new(self.indicators.lits(), bound, mode),
            &mut card_clauses,
            &mut var_manager,
        )?;
        self.stats.probes += 1;
        let res = query::<S, I, _>(
            self.indicators.clauses().iter().chain(card_clauses.iter()),
            var_manager.max_var(),
            Query::Bound(bound, mode),
            &mut self.stats,
        )?;
        debug!(
            "probe {mode} {bound}: {} ({} indicator + {} cardinality clauses)",
            if res.is_some() { "SAT" } else { "UNSAT" },
            self.indicators.clauses().len(),
            card_clauses.len()
        );
        Ok(match res {
            Some(witness) => ProbeResult::Sat(witness),
            None => ProbeResult::Unsat,
        })
    }

    /// Gets the statistics of the probes so far
    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Consumes the probe and returns its statistics
    #[must_use]
    pub fn into_stats(self) -> SearchStats {
        self.stats
    }
}

/// Checks plain satisfiability of a formula in a fresh oracle. Returns a witness over the
/// formula's variables if satisfiable.
///
/// # Errors
///
/// [`Error::OracleUnavailable`] if the oracle fails or is interrupted.
pub fn check_sat<S, I>(
    formula: &Formula,
    stats: &mut SearchStats,
) -> Result<Option<Assignment>, Error>
where
    S: Solve,
    I: Initialize<S>,
{
    let res = query::<S, I, _>(formula.iter(), formula.max_var(), Query::Plain, stats)?;
    debug!(
        "plain check of {} clauses: {}",
        formula.n_clauses(),
        if res.is_some() { "SAT" } else { "UNSAT" }
    );
    Ok(res)
}

/// What an oracle is used for
#[derive(Clone, Copy, Debug)]
enum Query {
    Plain,
    Bound(usize, BoundMode),
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::Plain => write!(f, "plain check"),
            Query::Bound(bound, mode) => write!(f, "probe {mode} {bound}"),
        }
    }
}

/// An oracle that lives for one query. Dropping it releases the oracle on every exit path.
struct Scoped<S> {
    oracle: S,
    query: Query,
}

impl<S> Scoped<S> {
    fn acquire<I: Initialize<S>>(query: Query) -> Self {
        trace!("acquiring oracle for {query}");
        Scoped {
            oracle: I::init(),
            query,
        }
    }
}

impl<S> std::ops::Deref for Scoped<S> {
    type Target = S;

    fn deref(&self) -> &Self::Target {
        &self.oracle
    }
}

impl<S> std::ops::DerefMut for Scoped<S> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.oracle
    }
}

impl<S> Drop for Scoped<S> {
    fn drop(&mut self) {
        trace!("releasing oracle for {}", self.query);
    }
}

/// Runs one satisfiability query over the given clauses in a fresh oracle. The witness covers
/// all variables up to `max_var` with "don't care" values set to false.
fn query<'c, S, I, Cls>(
    clauses: Cls,
    max_var: Option<Var>,
    query: Query,
    stats: &mut SearchStats,
) -> Result<Option<Assignment>, Error>
where
    S: Solve,
    I: Initialize<S>,
    Cls: IntoIterator<Item = &'c Clause>,
{
    let unavailable =
        |err: anyhow::Error| Error::OracleUnavailable(format!("{query} failed: {err:#}"));

    let mut oracle = Scoped::<S>::acquire::<I>(query);
    if let Some(max_var) = max_var {
        oracle.reserve(max_var).map_err(unavailable)?;
    }
    clauses
        .into_iter()
        .try_for_each(|cl| oracle.add_clause_ref(cl))
        .map_err(unavailable)?;

    let start = ProcessTime::now();
    let res = oracle.solve();
    stats.oracle_cpu_time += start.elapsed();
    stats.oracle_calls += 1;

    match res.map_err(unavailable)? {
        SolverResult::Sat => {
            stats.n_sat += 1;
            let Some(max_var) = max_var else {
                return Ok(Some(Assignment::default()));
            };
            let mut witness = oracle.solution(max_var).map_err(unavailable)?;
            witness.replace_dont_care(false);
            Ok(Some(witness))
        }
        SolverResult::Unsat => {
            stats.n_unsat += 1;
            Ok(None)
        }
        SolverResult::Interrupted => Err(Error::OracleUnavailable(format!(
            "{query} was interrupted"
        ))),
    }
}

//! # Ascending Tightening
//!
//! Tests `sum v(i) >= k` for `k = 0, 1, ...` while satisfiable. The bound before the first
//! unsatisfiable one is the optimum.

use super::{CardinalityProbe, Error, ProbeResult};
use crate::{
    encodings::card::BoundBoth,
    solvers::{Initialize, Solve},
    types::{constraints::BoundMode, Assignment, Lit},
};

/// Returns the largest satisfiable bound and its witness
pub(super) fn search<S, CE, I>(
    probe: &mut CardinalityProbe<'_, S, CE, I>,
) -> Result<(usize, Assignment), Error>
where
    S: Solve,
    CE: BoundBoth + FromIterator<Lit>,
    I: Initialize<S>,
{
    let mut best = None;
    for k in 0..probe.n_clauses() {
        match probe.probe(k, BoundMode::AtLeast)? {
            ProbeResult::Sat(witness) => best = Some((k, witness)),
            ProbeResult::Unsat => break,
        }
    }
    best.ok_or(Error::Inconsistent)
}

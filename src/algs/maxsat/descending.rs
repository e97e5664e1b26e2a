//! # Descending Relaxation
//!
//! Tests `sum v(i) >= k` for `k = n-1, ..., 0`. The first satisfiable bound is the optimum.

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
    for k in (0..probe.n_clauses()).rev() {
        if let ProbeResult::Sat(witness) = probe.probe(k, BoundMode::AtLeast)? {
            return Ok((k, witness));
        }
    }
    Err(Error::Inconsistent)
}

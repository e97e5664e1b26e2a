//! # Binary Search
//!
//! Bisects the bounds `[0, n-1]`. Satisfiability of `sum v(i) >= k` is antitone in `k`, so a
//! satisfiable `mid` moves the lower end up and an unsatisfiable one moves the upper end down.
//! When the ends cross, the upper end is the largest satisfiable bound.

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
    let Some(mut high) = probe.n_clauses().checked_sub(1) else {
        return Err(Error::Inconsistent);
    };
    let mut low = 0;
    let mut best = None;
    while low <= high {
        let mid = (low + high) / 2;
        match probe.probe(mid, BoundMode::AtLeast)? {
            ProbeResult::Sat(witness) => {
                best = Some((mid, witness));
                low = mid + 1;
            }
            ProbeResult::Unsat => {
                let Some(below) = mid.checked_sub(1) else {
                    break;
                };
                high = below;
            }
        }
    }
    best.ok_or(Error::Inconsistent)
}

#[cfg(test)]
mod tests {
    use crate::{
        algs::maxsat::CardinalityProbe,
        clause,
        encodings::indicator::Indicators,
        instances::Formula,
        lit,
        solvers::testing::Dpll,
        types::Clause,
    };

    fn log2_ceil(x: usize) -> usize {
        let mut probes = 0;
        while (1 << probes) < x {
            probes += 1;
        }
        probes
    }

    #[test]
    fn finds_largest_sat_bound() {
        for n_empty in 1..6 {
            let mut clauses = vec![clause![lit![0]], clause![lit![1]]];
            clauses.extend(vec![Clause::new(); n_empty]);
            let formula = Formula::new(clauses, 2);
            let inds = Indicators::encode(&formula);
            let mut probe = CardinalityProbe::<Dpll>::new(&formula, &inds);
            let (best, witness) = super::search(&mut probe).unwrap();
            assert_eq!(best, 2);
            assert_eq!(formula.n_satisfied(&witness), 2);
            assert!(probe.stats().probes <= log2_ceil(formula.n_clauses() + 1));
        }
    }

    #[test]
    fn single_clause() {
        let formula = Formula::new(vec![Clause::new()], 0);
        let inds = Indicators::encode(&formula);
        let mut probe = CardinalityProbe::<Dpll>::new(&formula, &inds);
        let (best, _) = super::search(&mut probe).unwrap();
        assert_eq!(best, 0);
        assert_eq!(probe.stats().probes, 1);
    }
}

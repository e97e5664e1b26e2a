use maxsat_reduce::{
    algs::maxsat::{probe, BranchAndBound, CardinalityProbe, ProbeResult, SearchStats},
    clause,
    encodings::{card::SequentialCounter, indicator::Indicators},
    instances::Formula,
    lit,
    solvers::DefaultInitializer,
    types::{constraints::BoundMode, Assignment},
};
use maxsat_reduce_batsat::BasicSolver;

/// The fewest clauses any assignment satisfies
fn min_satisfied(formula: &Formula) -> usize {
    (0..1u32 << formula.n_vars())
        .map(|bits| {
            let assign: Vec<bool> = (0..formula.n_vars())
                .map(|v| (bits >> v) & 1 == 1)
                .collect();
            formula.n_satisfied(&Assignment::from(assign))
        })
        .min()
        .unwrap_or(0)
}

fn check_bounds(formula: &Formula) {
    let inds = Indicators::encode(formula);
    let mut probe = CardinalityProbe::<BasicSolver>::new(formula, &inds);
    let n = formula.n_clauses();
    let max_sat = n - BranchAndBound::new(formula).solve().0;
    let min_sat = min_satisfied(formula);
    let mut prev = true;
    for k in 0..=n {
        let res = probe.probe(k, BoundMode::AtLeast).unwrap();
        // satisfiability of at-least bounds is antitone
        assert!(prev || !res.is_sat(), "AT_LEAST({k}) after an UNSAT bound");
        prev = res.is_sat();
        assert_eq!(res.is_sat(), k <= max_sat, "AT_LEAST({k})");
        if let ProbeResult::Sat(witness) = res {
            assert!(formula.n_satisfied(&witness) >= k);
        }

        let res = probe.probe(k, BoundMode::AtMost).unwrap();
        assert_eq!(res.is_sat(), k >= min_sat, "AT_MOST({k})");
        if let ProbeResult::Sat(witness) = res {
            assert!(formula.n_satisfied(&witness) <= k);
        }
    }
    assert_eq!(probe.stats().probes, 2 * (n + 1));
}

#[test]
fn small_bounds() {
    check_bounds(&Formula::new(
        vec![
            clause![lit![0]],
            clause![!lit![0]],
            clause![lit![0], lit![1]],
            clause![!lit![1], lit![2]],
            clause![!lit![2]],
        ],
        3,
    ));
}

#[cfg(feature = "rand")]
#[test]
fn random_bounds() {
    for seed in 0..10 {
        check_bounds(&maxsat_reduce::instances::random::generate(4, 10, seed));
    }
}

#[test]
#[should_panic(expected = "invalid bound")]
fn invalid_bound() {
    let formula = Formula::new(vec![clause![lit![0]], clause![!lit![0]]], 1);
    let inds = Indicators::encode(&formula);
    let mut probe = CardinalityProbe::<BasicSolver>::new(&formula, &inds);
    let _ = probe.probe(3, BoundMode::AtLeast);
}

#[test]
fn explicit_encoder() {
    let formula = Formula::new(
        vec![clause![lit![0]], clause![!lit![0]], clause![lit![1]]],
        2,
    );
    let inds = Indicators::encode(&formula);
    let mut probe =
        CardinalityProbe::<BasicSolver, SequentialCounter, DefaultInitializer>::new(
            &formula, &inds,
        );
    assert!(probe.probe(2, BoundMode::AtLeast).unwrap().is_sat());
    assert_eq!(
        probe.probe(3, BoundMode::AtLeast).unwrap(),
        ProbeResult::Unsat
    );
}

#[test]
fn plain_check() {
    let mut stats = SearchStats::default();
    let formula = Formula::new(vec![clause![lit![0], lit![1]], clause![!lit![0]]], 2);
    let witness = probe::check_sat::<BasicSolver, DefaultInitializer>(&formula, &mut stats)
        .unwrap()
        .unwrap();
    assert!(formula.is_sat(&witness));
    assert_eq!(stats.n_sat, 1);
}

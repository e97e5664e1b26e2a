use maxsat_reduce::{
    encodings::card::{self, BoundLower, BoundUpper, SequentialCounter},
    instances::{BasicVarManager, Cnf, ManageVars},
    lit,
    solvers::{Solve, SolverResult},
    types::{Lit, TernaryVal},
    var,
};
use maxsat_reduce_batsat::BasicSolver;

fn count_true(solver: &BasicSolver, lits: &[Lit]) -> usize {
    lits.iter()
        .filter(|&&l| solver.lit_val(l).unwrap() == TernaryVal::True)
        .count()
}

fn lits(n: u32) -> Vec<Lit> {
    (0..n).map(|idx| lit![idx]).collect()
}

#[test]
fn at_most_forced_inputs() {
    let inputs = lits(5);
    for ub in 0..=5 {
        for n_forced in 0..=5 {
            let mut vm = BasicVarManager::from_next_free(var![5]);
            let mut cnf = Cnf::new();
            card::encode_at_most(&inputs, ub, &mut cnf, &mut vm);
            let mut solver = BasicSolver::default();
            solver.add_cnf(cnf).unwrap();
            for &l in &inputs[..n_forced] {
                solver.add_unit(l).unwrap();
            }
            let res = solver.solve().unwrap();
            if n_forced <= ub {
                assert_eq!(res, SolverResult::Sat, "ub {ub}, forced {n_forced}");
                assert!(count_true(&solver, &inputs) <= ub);
            } else {
                assert_eq!(res, SolverResult::Unsat, "ub {ub}, forced {n_forced}");
            }
        }
    }
}

#[test]
fn at_least_forbidden_inputs() {
    let inputs = lits(5);
    for lb in 0..=5 {
        for n_forbidden in 0..=5 {
            let mut vm = BasicVarManager::from_next_free(var![5]);
            let mut cnf = Cnf::new();
            card::encode_at_least(&inputs, lb, &mut cnf, &mut vm);
            let mut solver = BasicSolver::default();
            solver.add_cnf(cnf).unwrap();
            for &l in &inputs[..n_forbidden] {
                solver.add_unit(!l).unwrap();
            }
            let res = solver.solve().unwrap();
            if 5 - n_forbidden >= lb {
                assert_eq!(res, SolverResult::Sat, "lb {lb}, forbidden {n_forbidden}");
                assert!(count_true(&solver, &inputs) >= lb);
            } else {
                assert_eq!(res, SolverResult::Unsat, "lb {lb}, forbidden {n_forbidden}");
            }
        }
    }
}

#[test]
fn both_bounds_on_one_counter() {
    let inputs = lits(6);
    let mut vm = BasicVarManager::from_next_free(var![6]);
    let mut enc: SequentialCounter = inputs.iter().copied().collect();
    let mut cnf = Cnf::new();
    enc.encode_ub(..=4, &mut cnf, &mut vm);
    enc.encode_lb(2..=3, &mut cnf, &mut vm);

    // exactly 3 of 6
    let mut solver = BasicSolver::default();
    solver.add_cnf(cnf.clone()).unwrap();
    for unit in enc
        .enforce_ub(3)
        .unwrap()
        .into_iter()
        .chain(enc.enforce_lb(3).unwrap())
    {
        solver.add_unit(unit).unwrap();
    }
    assert_eq!(solver.solve().unwrap(), SolverResult::Sat);
    assert_eq!(count_true(&solver, &inputs), 3);

    // at least 3 but at most 2 is contradictory
    let mut solver = BasicSolver::default();
    solver.add_cnf(cnf).unwrap();
    for unit in enc
        .enforce_ub(2)
        .unwrap()
        .into_iter()
        .chain(enc.enforce_lb(3).unwrap())
    {
        solver.add_unit(unit).unwrap();
    }
    assert_eq!(solver.solve().unwrap(), SolverResult::Unsat);
    assert!(vm.n_used() > 6);
}

#[test]
fn negated_inputs() {
    let inputs: Vec<Lit> = lits(4).into_iter().map(|l| !l).collect();
    let mut vm = BasicVarManager::from_next_free(var![4]);
    let mut cnf = Cnf::new();
    card::encode_at_least(&inputs, 3, &mut cnf, &mut vm);
    let mut solver = BasicSolver::default();
    solver.add_cnf(cnf).unwrap();
    solver.add_unit(lit![0]).unwrap();
    assert_eq!(solver.solve().unwrap(), SolverResult::Sat);
    assert_eq!(count_true(&solver, &inputs), 3);
    solver.add_unit(lit![1]).unwrap();
    assert_eq!(solver.solve().unwrap(), SolverResult::Unsat);
}

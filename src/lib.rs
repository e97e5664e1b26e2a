//! # maxsat-reduce - Unit-Weight MaxSAT by Reduction to SAT
//!
//! `maxsat-reduce` finds assignments maximizing the number of satisfied clauses of a CNF
//! formula by asking a SAT oracle a sequence of cardinality-bounded satisfiability questions.
//!
//! Every clause `C(i)` gets an indicator variable `v(i) <-> C(i)`
//! ([`encodings::indicator`]). A probe ([`algs::maxsat::CardinalityProbe`]) asks a fresh oracle
//! whether `sum v(i) >= k` is satisfiable together with the indicator clauses, and the search
//! strategies ([`algs::maxsat::Strategy`]) find the largest satisfiable `k`.
//!
//! Oracles are plugged in through the [`solvers::Solve`] trait. A pure-Rust oracle is available
//! in the `maxsat-reduce-batsat` crate.
//!
//! ## Example Usage
//!
//! ```no_run
//! use maxsat_reduce::{algs::maxsat::{self, Strategy}, instances::Formula};
//! use maxsat_reduce_batsat::BasicSolver;
//!
//! let formula = Formula::from_dimacs_path("instance.cnf").unwrap();
//! let res = maxsat::solve::<BasicSolver>(&formula, Strategy::BinarySearch).unwrap();
//! println!("cost: {}", res.cost);
//! ```
//!
//! ## Features
//!
//! | Feature name | Description |
//! | --- | --- |
//! | `rand` | Enable random formula generation. |
//!
//! ## Logging
//!
//! The library logs through the [`log`](https://docs.rs/log) facade: every probe at `debug`,
//! oracle acquisition and release at `trace`, search results at `info`.

pub mod algs;
pub mod encodings;
pub mod instances;
pub mod solvers;
pub mod types;

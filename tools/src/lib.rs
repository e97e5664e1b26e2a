//! # maxsat-reduce-tools - Benchmark Harness for the maxsat-reduce Library
//!
//! This crate contains the `maxsat-bench` binary and the harness behind it. The harness lives
//! here rather than in `maxsat-reduce` since it depends on the BatSat oracle crate, which in
//! turn depends on `maxsat-reduce`.

pub mod harness;
pub mod report;

/// The oracle used by the harness
pub type Solver = maxsat_reduce_batsat::BasicSolver;

//! # Benchmark Harness
//!
//! Runs the selected search strategies on a set of instances, checks that all of them agree on
//! the cost and collects one [`Row`] per run.

use std::{fs, path::PathBuf};

use anyhow::{bail, Context};
use cpu_time::ProcessTime;
use log::{debug, info};
use maxsat_reduce::{
    algs::maxsat::{BranchAndBound, Strategy},
    instances::{collection::Collection, random, Formula},
};

use crate::{report::Row, Solver};

/// Where the benchmark instances come from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Input {
    /// A single DIMACS file
    File(PathBuf),
    /// The `index`-th `.cnf` file of a directory, in sorted order
    Collection {
        /// The directory
        dir: PathBuf,
        /// The index of the file
        index: usize,
    },
    /// Random formulas generated from consecutive seeds
    Generated {
        /// The number of variables per formula
        n_vars: u32,
        /// The number of clauses per formula
        n_clauses: usize,
        /// The number of formulas
        iterations: usize,
        /// The seed of the first formula
        seed: u64,
        /// If given, every formula is written to this directory
        write_dir: Option<PathBuf>,
    },
}

impl Default for Input {
    fn default() -> Self {
        Input::Generated {
            n_vars: 20,
            n_clauses: 50,
            iterations: 5,
            seed: 0,
            write_dir: None,
        }
    }
}

/// The configuration of a benchmark run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BenchConfig {
    /// The instance source
    pub input: Input,
    /// The strategies to run on every instance
    pub strategies: Vec<Strategy>,
    /// Whether to cross-check every cost with [`BranchAndBound`]
    pub validate: bool,
}

impl Default for BenchConfig {
    fn default() -> Self {
        BenchConfig {
            input: Input::default(),
            strategies: Strategy::ALL.to_vec(),
            validate: false,
        }
    }
}

/// Loads or generates the instances, together with their names
///
/// # Errors
///
/// If an instance cannot be read or parsed, or a generated instance cannot be written
pub fn instances(input: &Input) -> anyhow::Result<Vec<(String, Formula)>> {
    match input {
        Input::File(path) => {
            let formula = Formula::from_dimacs_path(path)
                .with_context(|| format!("failed to load `{}`", path.display()))?;
            Ok(vec![(path.display().to_string(), formula)])
        }
        Input::Collection { dir, index } => {
            let collection = Collection::open(dir)
                .with_context(|| format!("failed to open collection `{}`", dir.display()))?;
            let path = collection.get(*index)?.display().to_string();
            let formula = collection.load(*index)?;
            Ok(vec![(path, formula)])
        }
        Input::Generated {
            n_vars,
            n_clauses,
            iterations,
            seed,
            write_dir,
        } => {
            if let Some(dir) = write_dir {
                fs::create_dir_all(dir)
                    .with_context(|| format!("failed to create `{}`", dir.display()))?;
            }
            (0..*iterations as u64)
                .map(|it| -> anyhow::Result<(String, Formula)> {
                    let seed = seed.wrapping_add(it);
                    let name = format!("random-{seed}");
                    let formula = random::generate(*n_vars, *n_clauses, seed);
                    if let Some(dir) = write_dir {
                        let path = dir.join(format!("{name}.cnf"));
                        formula
                            .to_dimacs_path(&path)
                            .with_context(|| format!("failed to write `{}`", path.display()))?;
                    }
                    Ok((name, formula))
                })
                .collect()
        }
    }
}

/// Runs a benchmark
///
/// # Errors
///
/// If loading instances fails, an oracle fails, the strategies disagree on a cost or, with
/// validation, a cost differs from the one found by [`BranchAndBound`].
pub fn run(config: &BenchConfig) -> anyhow::Result<Vec<Row>> {
    let mut rows = vec![];
    for (iteration, (name, formula)) in instances(&config.input)?.into_iter().enumerate() {
        debug!(
            "instance {name}: {} variables, {} clauses",
            formula.n_vars(),
            formula.n_clauses()
        );
        let expected = if config.validate {
            Some(BranchAndBound::new(&formula).solve().0)
        } else {
            None
        };
        let mut first: Option<(Strategy, usize)> = None;
        for &method in &config.strategies {
            let start = ProcessTime::now();
            let res = method
                .solve::<Solver>(&formula)
                .with_context(|| format!("{method} failed on {name}"))?;
            let cpu_time = start.elapsed();
            if let Some(witness) = &res.witness {
                if formula.cost_of(witness) != res.cost {
                    bail!(
                        "{method} on {name}: witness falsifies {} clauses, reported cost {}",
                        formula.cost_of(witness),
                        res.cost
                    );
                }
            }
            match first {
                Some((other, cost)) if cost != res.cost => bail!(
                    "cost mismatch on {name}: {other} found {cost}, {method} found {}",
                    res.cost
                ),
                None => first = Some((method, res.cost)),
                _ => (),
            }
            if let Some(expected) = expected {
                if expected != res.cost {
                    bail!(
                        "validation failed on {name}: {method} found {}, branch and bound found {expected}",
                        res.cost
                    );
                }
            }
            rows.push(Row {
                method,
                instance: name.clone(),
                iteration,
                cpu_time,
                cost: res.cost,
                probes: res.stats.probes,
                oracle_calls: res.stats.oracle_calls,
            });
        }
        info!("instance {name} done");
    }
    Ok(rows)
}

//! # Random Formula Generation
//!
//! Every clause has a uniformly random length between one and `n_vars`, over distinct
//! variables with uniformly random polarity. Formulas with many more clauses than variables
//! are typically unsatisfiable, which is where the search strategies do their work.

use rand::{seq::index, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::Formula;
use crate::types::{Clause, Lit};

/// Generates a reproducible random formula from a seed
#[must_use]
pub fn generate(n_vars: u32, n_clauses: usize, seed: u64) -> Formula {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    generate_with_rng(n_vars, n_clauses, &mut rng)
}

/// Generates a random formula with a given random number generator. With zero variables, all
/// clauses are empty.
#[must_use]
pub fn generate_with_rng<R: Rng>(n_vars: u32, n_clauses: usize, rng: &mut R) -> Formula {
    let clauses = (0..n_clauses)
        .map(|_| {
            if n_vars == 0 {
                return Clause::new();
            }
            let len = rng.random_range(1..=n_vars as usize);
            index::sample(rng, n_vars as usize, len)
                .into_iter()
                .map(|idx| {
                    #[allow(clippy::cast_possible_truncation)]
                    Lit::new(idx as u32, rng.random_bool(0.5))
                })
                .collect()
        })
        .collect();
    Formula::new(clauses, n_vars)
}

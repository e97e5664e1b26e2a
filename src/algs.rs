//! # SAT-Based Algorithms
//!
//! This module contains the MaxSAT search strategies that build on top of SAT oracles, together
//! with an oracle-independent exact solver for validating them.

pub mod maxsat;

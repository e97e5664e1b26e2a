//! # CNF Encodings for Cardinality Constraints
//!
//! Traits for non-incremental cardinality encodings and the sequential counter implementing
//! them. Probes use these to bound the number of true indicator literals.
//!
//! ## Example Usage
//!
//! ```
//! use maxsat_reduce::{
//!     encodings::card::{self, BoundLower, Encode, SequentialCounter},
//!     instances::{BasicVarManager, Cnf},
//!     lit, var,
//! };
//!
//! let mut var_manager = BasicVarManager::from_next_free(var![4]);
//!
//! let mut enc = SequentialCounter::from_iter(vec![lit![0], lit![1], lit![2], lit![3]]);
//! let mut encoding = Cnf::new();
//! enc.encode_lb(2..=2, &mut encoding, &mut var_manager);
//! let units = enc.enforce_lb(2).unwrap();
//! assert_eq!(units.len(), 1);
//!
//! // or in one go
//! let mut encoding = Cnf::new();
//! card::encode_at_least(&[lit![0], lit![1], lit![2], lit![3]], 2, &mut encoding, &mut var_manager);
//! ```

use std::{
    cmp,
    ops::{Bound, Range, RangeBounds},
};

use super::{CollectClauses, Error};
use crate::{
    clause,
    instances::ManageVars,
    types::{
        constraints::{BoundMode, CardConstraint},
        Clause, Lit,
    },
};

pub mod seqcounter;
pub use seqcounter::SequentialCounter;

/// Trait for all cardinality encodings of form `sum of lits <> rhs`
pub trait Encode {
    /// Gets the number of input literals in the encoding
    fn n_lits(&self) -> usize;
}

/// Trait for cardinality encodings that allow upper bounding of the form `sum of lits <= ub`
pub trait BoundUpper: Encode {
    /// Lazily builds the cardinality encoding to enable upper bounds in a given
    /// range. `var_manager` is the variable manager to use for tracking new
    /// variables. A specific encoding might ignore the lower end of the range.
    fn encode_ub<Col, R>(&mut self, range: R, collector: &mut Col, var_manager: &mut dyn ManageVars)
    where
        Col: CollectClauses,
        R: RangeBounds<usize>;
    /// Returns units for enforcing an upper bound (`sum of lits <= ub`). Make
    /// sure that [`BoundUpper::encode_ub`] has been called adequately,
    /// otherwise [`Error::NotEncoded`] will be returned.
    ///
    /// # Errors
    ///
    /// [`Error::NotEncoded`] if the bound is outside the encoded range.
    fn enforce_ub(&self, ub: usize) -> Result<Vec<Lit>, Error>;
    /// Encodes an upper bound cardinality constraint to CNF
    ///
    /// # Errors
    ///
    /// If the encoding fails to enforce the bound it just encoded.
    fn encode_ub_constr<Col>(
        lits: Vec<Lit>,
        ub: usize,
        collector: &mut Col,
        var_manager: &mut dyn ManageVars,
    ) -> Result<(), Error>
    where
        Col: CollectClauses,
        Self: FromIterator<Lit> + Sized,
    {
        let mut enc = Self::from_iter(lits);
        enc.encode_ub(ub..=ub, collector, var_manager);
        collector.extend(enc.enforce_ub(ub)?.into_iter().map(|unit| clause![unit]));
        Ok(())
    }
}

/// Trait for cardinality encodings that allow lower bounding of the form `sum of lits >= lb`
pub trait BoundLower: Encode {
    /// Lazily builds the cardinality encoding to enable lower bounds in a given
    /// range. `var_manager` is the variable manager to use for tracking new
    /// variables. A specific encoding might ignore the lower end of the range.
    fn encode_lb<Col, R>(&mut self, range: R, collector: &mut Col, var_manager: &mut dyn ManageVars)
    where
        Col: CollectClauses,
        R: RangeBounds<usize>;
    /// Returns units for enforcing a lower bound (`sum of lits >= lb`). Make
    /// sure that [`BoundLower::encode_lb`] has been called adequately,
    /// otherwise [`Error::NotEncoded`] will be returned.
    ///
    /// # Errors
    ///
    /// [`Error::NotEncoded`] if the bound is outside the encoded range,
    /// [`Error::Unsat`] if `lb` is higher than the number of literals.
    fn enforce_lb(&self, lb: usize) -> Result<Vec<Lit>, Error>;
    /// Encodes a lower bound cardinality constraint to CNF
    ///
    /// # Errors
    ///
    /// If the encoding fails to enforce the bound it just encoded.
    fn encode_lb_constr<Col>(
        lits: Vec<Lit>,
        lb: usize,
        collector: &mut Col,
        var_manager: &mut dyn ManageVars,
    ) -> Result<(), Error>
    where
        Col: CollectClauses,
        Self: FromIterator<Lit> + Sized,
    {
        let mut enc = Self::from_iter(lits);
        enc.encode_lb(lb..=lb, collector, var_manager);
        collector.extend(enc.enforce_lb(lb)?.into_iter().map(|unit| clause![unit]));
        Ok(())
    }
}

/// Trait for cardinality encodings that allow upper and lower bounding
pub trait BoundBoth: BoundUpper + BoundLower {
    /// Encodes any cardinality constraint to CNF
    ///
    /// # Errors
    ///
    /// If the encoding fails to enforce the bound it just encoded.
    fn encode_constr<Col>(
        constr: CardConstraint,
        collector: &mut Col,
        var_manager: &mut dyn ManageVars,
    ) -> Result<(), Error>
    where
        Col: CollectClauses,
        Self: FromIterator<Lit> + Sized,
    {
        match constr.decompose() {
            (lits, b, BoundMode::AtMost) => Self::encode_ub_constr(lits, b, collector, var_manager),
            (lits, b, BoundMode::AtLeast) => {
                Self::encode_lb_constr(lits, b, collector, var_manager)
            }
        }
    }
}

/// Default implementation of [`BoundBoth`] for every encoding that does upper
/// and lower bounding
impl<CE> BoundBoth for CE where CE: BoundUpper + BoundLower {}

/// The default encoding for both bounds. For now this is a [`SequentialCounter`].
pub type DefBothBounding = SequentialCounter;

/// An encoder for any cardinality constraint with an encoding of choice. Trivial constraints
/// are encoded without auxiliary variables: tautologies produce nothing, unsatisfiable
/// constraints produce the empty clause.
///
/// # Errors
///
/// If the chosen encoding fails to enforce the bound it just encoded.
pub fn encode_cardinality_constraint<CE, Col>(
    constr: CardConstraint,
    collector: &mut Col,
    var_manager: &mut dyn ManageVars,
) -> Result<(), Error>
where
    CE: BoundBoth + FromIterator<Lit>,
    Col: CollectClauses,
{
    if constr.is_tautology() {
        return Ok(());
    }
    if constr.is_unsat() {
        collector.extend([Clause::new()]);
        return Ok(());
    }
    if constr.is_positive_assignment() {
        collector.extend(constr.iter().map(|&lit| clause![lit]));
        return Ok(());
    }
    if constr.is_negative_assignment() {
        collector.extend(constr.iter().map(|&lit| clause![!lit]));
        return Ok(());
    }
    CE::encode_constr(constr, collector, var_manager)
}

/// Encodes `sum of lits >= bound` with the [`DefBothBounding`] encoding
pub fn encode_at_least<Col: CollectClauses>(
    lits: &[Lit],
    bound: usize,
    collector: &mut Col,
    var_manager: &mut dyn ManageVars,
) {
    encode_cardinality_constraint::<DefBothBounding, Col>(
        CardConstraint::new_lb(lits.iter().copied(), bound),
        collector,
        var_manager,
    )
    .expect("sequential counter enforces every bound it encoded");
}

/// Encodes `sum of lits <= bound` with the [`DefBothBounding`] encoding
pub fn encode_at_most<Col: CollectClauses>(
    lits: &[Lit],
    bound: usize,
    collector: &mut Col,
    var_manager: &mut dyn ManageVars,
) {
    encode_cardinality_constraint::<DefBothBounding, Col>(
        CardConstraint::new_ub(lits.iter().copied(), bound),
        collector,
        var_manager,
    )
    .expect("sequential counter enforces every bound it encoded");
}

fn prepare_ub_range<Enc: Encode, R: RangeBounds<usize>>(enc: &Enc, range: R) -> Range<usize> {
    (match range.start_bound() {
        Bound::Included(b) => *b,
        Bound::Excluded(b) => b + 1,
        Bound::Unbounded => 0,
    })..match range.end_bound() {
        Bound::Included(b) => cmp::min(b + 1, enc.n_lits()),
        Bound::Excluded(b) => cmp::min(*b, enc.n_lits()),
        Bound::Unbounded => enc.n_lits(),
    }
}

fn prepare_lb_range<Enc: Encode, R: RangeBounds<usize>>(enc: &Enc, range: R) -> Range<usize> {
    (match range.start_bound() {
        Bound::Included(b) => cmp::max(*b, 1),
        Bound::Excluded(b) => cmp::max(b + 1, 1),
        Bound::Unbounded => 1,
    })..match range.end_bound() {
        Bound::Included(b) => cmp::min(b + 1, enc.n_lits() + 1),
        Bound::Excluded(b) => cmp::min(*b, enc.n_lits() + 1),
        Bound::Unbounded => enc.n_lits() + 1,
    }
}

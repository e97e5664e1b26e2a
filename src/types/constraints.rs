//! # Constraint Types
//!
//! The two constraint types of the reduction: [`Clause`] for formulas and indicator definitions,
//! and [`CardConstraint`] for the bounds tested by probes.

use std::{fmt, ops};

use super::{Assignment, Lit, LitIter, TernaryVal};

/// Type representing a clause. The literal order is preserved.
#[derive(Eq, PartialEq, PartialOrd, Ord, Hash, Clone, Default)]
pub struct Clause {
    lits: Vec<Lit>,
}

impl Clause {
    /// Creates a new empty clause
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the clause as a slice of literals
    #[must_use]
    pub fn lits(&self) -> &[Lit] {
        &self.lits
    }

    /// Gets the length of the clause
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.lits.len()
    }

    /// Checks if the clause is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lits.is_empty()
    }

    /// Adds a literal to the clause
    pub fn add(&mut self, lit: Lit) {
        self.lits.push(lit);
    }

    /// Gets an iterator over the clause
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Lit> {
        self.lits.iter()
    }

    /// Evaluates a clause under a given assignment
    #[must_use]
    pub fn evaluate(&self, assignment: &Assignment) -> TernaryVal {
        self.iter()
            .fold(TernaryVal::False, |val, l| match assignment.lit_value(*l) {
                TernaryVal::True => TernaryVal::True,
                TernaryVal::DontCare if val == TernaryVal::False => TernaryVal::DontCare,
                _ => val,
            })
    }

    /// Checks whether the assignment sets at least one literal of the clause to true. The empty
    /// clause is never satisfied.
    #[must_use]
    pub fn is_sat(&self, assign: &Assignment) -> bool {
        self.lits
            .iter()
            .any(|&lit| assign.lit_value(lit) == TernaryVal::True)
    }
}

impl<const N: usize> From<[Lit; N]> for Clause {
    fn from(value: [Lit; N]) -> Self {
        Self {
            lits: Vec::from(value),
        }
    }
}

impl From<&[Lit]> for Clause {
    fn from(value: &[Lit]) -> Self {
        Self {
            lits: Vec::from(value),
        }
    }
}

impl Extend<Lit> for Clause {
    fn extend<T: IntoIterator<Item = Lit>>(&mut self, iter: T) {
        self.lits.extend(iter);
    }
}

impl ops::Index<usize> for Clause {
    type Output = Lit;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.lits[index]
    }
}

impl<'a> IntoIterator for &'a Clause {
    type Item = &'a Lit;

    type IntoIter = std::slice::Iter<'a, Lit>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.lits.iter()
    }
}

impl IntoIterator for Clause {
    type Item = Lit;

    type IntoIter = std::vec::IntoIter<Lit>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.lits.into_iter()
    }
}

impl FromIterator<Lit> for Clause {
    fn from_iter<T: IntoIterator<Item = Lit>>(iter: T) -> Self {
        Self {
            lits: Vec::from_iter(iter),
        }
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, lit) in self.iter().enumerate() {
            if i != 0 {
                write!(f, "|")?;
            }
            write!(f, "{lit}")?;
        }
        write!(f, ")")
    }
}

impl fmt::Debug for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Creates a clause from a list of literals
///
/// # Examples
///
/// ```
/// use maxsat_reduce::{clause, lit};
///
/// let cl = clause![lit![0], !lit![1]];
/// assert_eq!(cl.len(), 2);
/// ```
#[macro_export]
macro_rules! clause {
    ( $($l:expr),* ) => {
        {
            let mut tmp_clause = $crate::types::Clause::new();
            $(
                tmp_clause.add($l);
            )*
            tmp_clause
        }
    };
}

/// The direction of a cardinality bound
#[derive(Hash, Eq, PartialEq, Clone, Copy, Debug)]
pub enum BoundMode {
    /// `sum of lits >= b`
    AtLeast,
    /// `sum of lits <= b`
    AtMost,
}

impl fmt::Display for BoundMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundMode::AtLeast => write!(f, ">="),
            BoundMode::AtMost => write!(f, "<="),
        }
    }
}

/// Type representing a cardinality constraint over literals
#[derive(Hash, Eq, PartialEq, Clone, Debug)]
pub struct CardConstraint {
    lits: Vec<Lit>,
    b: usize,
    mode: BoundMode,
}

impl CardConstraint {
    /// Constructs a new upper bound cardinality constraint (`sum of lits <= b`)
    pub fn new_ub<LI: LitIter>(lits: LI, b: usize) -> Self {
        CardConstraint {
            lits: lits.into_iter().collect(),
            b,
            mode: BoundMode::AtMost,
        }
    }

    /// Constructs a new lower bound cardinality constraint (`sum of lits >= b`)
    pub fn new_lb<LI: LitIter>(lits: LI, b: usize) -> Self {
        CardConstraint {
            lits: lits.into_iter().collect(),
            b,
            mode: BoundMode::AtLeast,
        }
    }

    /// Constructs a new cardinality constraint with a given bound direction
    pub fn new<LI: LitIter>(lits: LI, b: usize, mode: BoundMode) -> Self {
        match mode {
            BoundMode::AtLeast => Self::new_lb(lits, b),
            BoundMode::AtMost => Self::new_ub(lits, b),
        }
    }

    /// Gets the bound direction
    #[must_use]
    pub fn mode(&self) -> BoundMode {
        self.mode
    }

    /// Gets the bound
    #[must_use]
    pub fn bound(&self) -> usize {
        self.b
    }

    /// Gets the number of literals in the constraint
    #[must_use]
    pub fn n_lits(&self) -> usize {
        self.lits.len()
    }

    /// Checks if the constraint is always satisfied
    #[must_use]
    pub fn is_tautology(&self) -> bool {
        match self.mode {
            BoundMode::AtMost => self.b >= self.lits.len(),
            BoundMode::AtLeast => self.b == 0,
        }
    }

    /// Checks if the constraint is unsatisfiable
    #[must_use]
    pub fn is_unsat(&self) -> bool {
        self.mode == BoundMode::AtLeast && self.b > self.lits.len()
    }

    /// Checks if the constraint assigns all literals to true
    #[must_use]
    pub fn is_positive_assignment(&self) -> bool {
        self.mode == BoundMode::AtLeast && self.b == self.lits.len()
    }

    /// Checks if the constraint assigns all literals to false
    #[must_use]
    pub fn is_negative_assignment(&self) -> bool {
        self.mode == BoundMode::AtMost && self.b == 0
    }

    /// Decomposes the constraint into its literals, bound and direction
    #[must_use]
    pub fn decompose(self) -> (Vec<Lit>, usize, BoundMode) {
        (self.lits, self.b, self.mode)
    }

    /// Gets an iterator over the literals in the constraint
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Lit> {
        self.lits.iter()
    }

    /// Checks whether the constraint is satisfied by an assignment
    #[must_use]
    pub fn is_sat(&self, assign: &Assignment) -> bool {
        let count = self
            .iter()
            .filter(|&&lit| assign.lit_value(lit) == TernaryVal::True)
            .count();
        match self.mode {
            BoundMode::AtMost => count <= self.b,
            BoundMode::AtLeast => count >= self.b,
        }
    }
}

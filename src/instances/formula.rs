//! # The Immutable MaxSAT Formula

use std::{io, path::Path, str::FromStr};

use crate::{
    instances::{fio, Cnf},
    types::{Assignment, Clause, Var},
};

/// A CNF formula whose clauses are all soft with unit weight. The number of variables is the
/// one declared in the DIMACS header and may exceed the highest variable actually used.
///
/// A formula is never modified after construction.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Formula {
    clauses: Cnf,
    n_vars: u32,
}

impl Formula {
    /// Creates a formula from clauses over `n_vars` variables
    ///
    /// # Panics
    ///
    /// If a literal refers to a variable with index `n_vars` or higher.
    #[must_use]
    pub fn new(clauses: Vec<Clause>, n_vars: u32) -> Formula {
        for cl in &clauses {
            for lit in cl {
                assert!(
                    lit.vidx32() < n_vars,
                    "literal {lit} exceeds the {n_vars} variables of the formula"
                );
            }
        }
        Formula::from_parts(clauses, n_vars)
    }

    /// Creates a formula from checked parts
    pub(crate) fn from_parts(clauses: Vec<Clause>, n_vars: u32) -> Formula {
        Formula {
            clauses: clauses.into_iter().collect(),
            n_vars,
        }
    }

    /// Gets the number of clauses
    #[must_use]
    pub fn n_clauses(&self) -> usize {
        self.clauses.len()
    }

    /// Gets the declared number of variables
    #[must_use]
    pub fn n_vars(&self) -> u32 {
        self.n_vars
    }

    /// Gets the highest declared variable, if any
    #[must_use]
    pub fn max_var(&self) -> Option<Var> {
        self.n_vars.checked_sub(1).map(Var::new)
    }

    /// Gets the clause at index `idx`
    ///
    /// # Panics
    ///
    /// If `idx` is not smaller than [`Formula::n_clauses`].
    #[must_use]
    pub fn clause_at(&self, idx: usize) -> &Clause {
        &self.clauses[idx]
    }

    /// Gets an iterator over the clauses in file order
    pub fn iter(&self) -> std::slice::Iter<'_, Clause> {
        self.clauses.iter()
    }

    /// Gets the clauses as a [`Cnf`]
    #[must_use]
    pub fn cnf(&self) -> &Cnf {
        &self.clauses
    }

    /// Counts the clauses satisfied by an assignment
    #[must_use]
    pub fn n_satisfied(&self, assign: &Assignment) -> usize {
        self.iter().filter(|cl| cl.is_sat(assign)).count()
    }

    /// Counts the clauses falsified by an assignment. Clauses with unassigned literals only
    /// count as falsified.
    #[must_use]
    pub fn cost_of(&self, assign: &Assignment) -> usize {
        self.n_clauses() - self.n_satisfied(assign)
    }

    /// Checks whether an assignment satisfies all clauses
    #[must_use]
    pub fn is_sat(&self, assign: &Assignment) -> bool {
        self.iter().all(|cl| cl.is_sat(assign))
    }

    /// Parses a DIMACS CNF formula from a reader object.
    ///
    /// # File Format
    ///
    /// A `p cnf <n_vars> <n_clauses>` line, preceded only by comments, followed by exactly
    /// `n_clauses` clause lines, each terminated by `0`. Comment lines start with `c`. A line
    /// starting with `%` ends the clauses. See [`fio::dimacs`] for the exact rules.
    ///
    /// # Errors
    ///
    /// If reading fails or the input is not a well-formed DIMACS CNF.
    pub fn from_dimacs<R: io::Read>(reader: R) -> Result<Self, fio::ParsingError> {
        Ok(fio::dimacs::parse_cnf(reader)?)
    }

    /// Parses a DIMACS CNF formula from a file path. For more details see
    /// [`Formula::from_dimacs`].
    ///
    /// # Errors
    ///
    /// If the file cannot be opened or parsed.
    pub fn from_dimacs_path<P: AsRef<Path>>(path: P) -> Result<Self, fio::ParsingError> {
        match fio::open_read(path) {
            Err(why) => Err(fio::ParsingError::IO(why)),
            Ok(reader) => Formula::from_dimacs(reader),
        }
    }

    /// Writes the formula to DIMACS CNF
    ///
    /// # Errors
    ///
    /// If writing fails.
    pub fn to_dimacs<W: io::Write>(&self, writer: &mut W) -> Result<(), io::Error> {
        fio::dimacs::write_cnf_annotated(writer, self.iter(), self.n_vars, self.n_clauses())
    }

    /// Writes the formula to a DIMACS CNF file at a path
    ///
    /// # Errors
    ///
    /// If the file cannot be created or written.
    pub fn to_dimacs_path<P: AsRef<Path>>(&self, path: P) -> Result<(), io::Error> {
        let mut writer = fio::open_write(path)?;
        self.to_dimacs(&mut writer)
    }
}

impl FromStr for Formula {
    type Err = fio::dimacs::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        fio::dimacs::parse_cnf(s.as_bytes())
    }
}

/// Collects clauses into a formula whose variable count is one past the highest used variable
impl FromIterator<Clause> for Formula {
    fn from_iter<T: IntoIterator<Item = Clause>>(iter: T) -> Self {
        let clauses: Vec<Clause> = iter.into_iter().collect();
        let n_vars = clauses
            .iter()
            .flat_map(|cl| cl.iter())
            .map(|l| l.vidx32() + 1)
            .max()
            .unwrap_or(0);
        Formula::from_parts(clauses, n_vars)
    }
}

impl<'a> IntoIterator for &'a Formula {
    type Item = &'a Clause;

    type IntoIter = std::slice::Iter<'a, Clause>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

//! # Parsing and Writing DIMACS CNF Files
//!
//! The parser is strict about the structure the reduction relies on: a `p cnf` header must
//! precede the clauses, every clause line ends with a single terminating `0`, no literal exceeds
//! the declared variable count, and the number of clauses matches the header. Comment lines
//! (`c ...`) and empty lines are tolerated everywhere. A line starting with `%` ends the clause
//! section, as in the trailer of SATLIB benchmark files.
//!
//! ## References
//!
//! - [DIMACS CNF](http://www.satcompetition.org/2011/format-benchmarks2011.html)
//! - [SATLIB](https://www.cs.ubc.ca/~hoos/SATLIB/benchm.html)

use std::io::{self, BufRead, BufReader, Lines, Read, Write};

use nom::{
    bytes::complete::tag,
    character::complete::{i32, space1, u64},
    combinator::all_consuming,
    error::Error as NomError,
    multi::separated_list1,
    sequence::tuple,
};
use thiserror::Error;

use crate::{
    instances::Formula,
    types::{Clause, Lit, Var},
};

/// Errors occuring within the DIMACS parsing module
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid literal in the file
    #[error("invalid literal: {0}")]
    Lit(String),
    /// A clause line without terminating zero
    #[error("clause not terminated by 0: {0}")]
    ClauseEnding(String),
    /// Data after the terminating zero of a clause
    #[error("data after terminating 0: {0}")]
    TrailingData(String),
    /// The input ended before the p line
    #[error("preamble never ends")]
    PreambleNoEnd,
    /// A non-comment line appeared before the p line
    #[error("missing p-line before: {0}")]
    MissingPLine(String),
    /// Invalid p line
    #[error("invalid p-line: {0}")]
    PLine(String),
    /// P line value is too large
    #[error("value in p-line too large: {0}")]
    PValTooLarge(u64),
    /// A literal refers to a variable beyond the declared count
    #[error("literal {lit} exceeds the declared {n_vars} variables")]
    VarOutOfRange {
        /// The offending literal in DIMACS notation
        lit: i32,
        /// The declared number of variables
        n_vars: u32,
    },
    /// The number of clauses differs from the p line
    #[error("p-line declares {declared} clauses, found {found}")]
    ClauseCount {
        /// The declared number of clauses
        declared: usize,
        /// The number of clauses in the body
        found: usize,
    },
    /// IO error reading file
    #[error("IO error: {0}")]
    IOError(#[from] io::Error),
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Lit(l0), Self::Lit(r0))
            | (Self::ClauseEnding(l0), Self::ClauseEnding(r0))
            | (Self::TrailingData(l0), Self::TrailingData(r0))
            | (Self::MissingPLine(l0), Self::MissingPLine(r0))
            | (Self::PLine(l0), Self::PLine(r0)) => l0 == r0,
            (Self::PValTooLarge(l0), Self::PValTooLarge(r0)) => l0 == r0,
            (
                Self::VarOutOfRange {
                    lit: l0,
                    n_vars: l1,
                },
                Self::VarOutOfRange {
                    lit: r0,
                    n_vars: r1,
                },
            ) => l0 == r0 && l1 == r1,
            (
                Self::ClauseCount {
                    declared: l0,
                    found: l1,
                },
                Self::ClauseCount {
                    declared: r0,
                    found: r1,
                },
            ) => l0 == r0 && l1 == r1,
            _ => core::mem::discriminant(self) == core::mem::discriminant(other),
        }
    }
}

/// Parses a CNF formula from a reader (typically a file)
///
/// # Errors
///
/// If the input is not a well-formed DIMACS CNF, or reading fails.
pub fn parse_cnf<R: Read>(reader: R) -> Result<Formula, Error> {
    let mut lines = BufReader::new(reader).lines();
    let (n_vars, n_clauses) = parse_preamble(&mut lines)?;
    let clauses = parse_cnf_body(lines, n_vars)?;
    if clauses.len() != n_clauses {
        return Err(Error::ClauseCount {
            declared: n_clauses,
            found: clauses.len(),
        });
    }
    Ok(Formula::from_parts(clauses, n_vars))
}

fn is_skipped(line: &str) -> bool {
    line.is_empty() || line.starts_with('c')
}

/// Reads up to and including the p line
fn parse_preamble<B: BufRead>(lines: &mut Lines<B>) -> Result<(u32, usize), Error> {
    for line in lines {
        let line = line?;
        let line = line.trim();
        if is_skipped(line) {
            continue;
        }
        if line.starts_with('p') {
            return parse_p_line(line);
        }
        return Err(Error::MissingPLine(String::from(line)));
    }
    Err(Error::PreambleNoEnd)
}

/// Parses the clause section after the p line
fn parse_cnf_body<B: BufRead>(lines: Lines<B>, n_vars: u32) -> Result<Vec<Clause>, Error> {
    let mut clauses = vec![];
    for line in lines {
        let line = line?;
        let line = line.trim();
        if line.starts_with('%') {
            break;
        }
        if is_skipped(line) {
            continue;
        }
        let clause = parse_clause_line(line)?;
        if let Some(&lit) = clause.iter().find(|l| l.vidx32() >= n_vars) {
            return Err(Error::VarOutOfRange {
                lit: lit.to_ipasir(),
                n_vars,
            });
        }
        clauses.push(clause);
    }
    Ok(clauses)
}

/// Parses the p line of a CNF file into the number of variables and clauses
fn parse_p_line(line: &str) -> Result<(u32, usize), Error> {
    let (_, (_, _, _, _, n_vars, _, n_clauses)) = all_consuming(tuple::<_, _, NomError<_>, _>((
        tag("p"),
        space1,
        tag("cnf"),
        space1,
        u64,
        space1,
        u64,
    )))(line)
    .map_err(|_| Error::PLine(String::from(line)))?;
    let n_vars = u32::try_from(n_vars)
        .ok()
        .filter(|&n| n <= Var::MAX_IDX + 1)
        .ok_or(Error::PValTooLarge(n_vars))?;
    // every clause gets an indicator variable after the formula's variables
    if n_clauses.saturating_add(u64::from(n_vars)) > u64::from(Var::MAX_IDX) + 1 {
        return Err(Error::PValTooLarge(n_clauses));
    }
    let n_clauses = usize::try_from(n_clauses).map_err(|_| Error::PValTooLarge(n_clauses))?;
    Ok((n_vars, n_clauses))
}

/// Parses a single clause line, terminated by `0`
fn parse_clause_line(line: &str) -> Result<Clause, Error> {
    let (_, vals) = all_consuming(separated_list1(space1, i32::<_, NomError<_>>))(line).map_err(
        |e| match e {
            nom::Err::Error(e) | nom::Err::Failure(e) => Error::Lit(String::from(e.input.trim())),
            nom::Err::Incomplete(_) => Error::Lit(String::from(line)),
        },
    )?;
    let Some((&last, lits)) = vals.split_last() else {
        return Err(Error::ClauseEnding(String::from(line)));
    };
    if last != 0 {
        return Err(Error::ClauseEnding(String::from(line)));
    }
    if lits.contains(&0) {
        return Err(Error::TrailingData(String::from(line)));
    }
    lits.iter()
        .map(|&val| Lit::from_ipasir(val).map_err(|_| Error::Lit(val.to_string())))
        .collect()
}

/// Writes clauses to a DIMACS CNF file with a given p line
///
/// # Errors
///
/// If writing fails.
pub fn write_cnf_annotated<'a, W, I>(
    writer: &mut W,
    clauses: I,
    n_vars: u32,
    n_clauses: usize,
) -> Result<(), io::Error>
where
    W: Write,
    I: IntoIterator<Item = &'a Clause>,
{
    writeln!(writer, "c CNF file written by maxsat-reduce")?;
    writeln!(writer, "p cnf {n_vars} {n_clauses}")?;
    clauses
        .into_iter()
        .try_for_each(|cl| write_clause(writer, cl))?;
    writer.flush()
}

fn write_clause<W: Write>(writer: &mut W, clause: &Clause) -> Result<(), io::Error> {
    clause
        .iter()
        .try_for_each(|l| write!(writer, "{} ", l.to_ipasir()))?;
    writeln!(writer, "0")
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::{parse_clause_line, parse_cnf, parse_p_line, write_cnf_annotated, Error};
    use crate::{clause, instances::Formula, ipasir_lit, types::Clause};

    #[test]
    fn p_line_pass() {
        assert_eq!(parse_p_line("p cnf 5 3"), Ok((5, 3)));
        assert_eq!(parse_p_line("p  cnf\t12 0"), Ok((12, 0)));
    }

    #[test]
    fn p_line_fail() {
        assert_eq!(
            parse_p_line("p wcnf 5 3"),
            Err(Error::PLine(String::from("p wcnf 5 3")))
        );
        assert_eq!(
            parse_p_line("p cnf 5"),
            Err(Error::PLine(String::from("p cnf 5")))
        );
        assert_eq!(
            parse_p_line("p cnf 5 3 7"),
            Err(Error::PLine(String::from("p cnf 5 3 7")))
        );
        assert_eq!(
            parse_p_line("p cnf 99999999999 3"),
            Err(Error::PValTooLarge(99_999_999_999))
        );
    }

    #[test]
    fn p_line_leaves_room_for_indicators() {
        assert_eq!(parse_p_line("p cnf 2147483648 0"), Ok((2_147_483_648, 0)));
        assert_eq!(
            parse_p_line("p cnf 2147483000 648"),
            Ok((2_147_483_000, 648))
        );
        assert_eq!(
            parse_p_line("p cnf 2147483648 1"),
            Err(Error::PValTooLarge(1))
        );
        assert_eq!(
            parse_p_line("p cnf 2147483000 649"),
            Err(Error::PValTooLarge(649))
        );
        assert_eq!(
            parse_p_line("p cnf 3 18446744073709551615"),
            Err(Error::PValTooLarge(u64::MAX))
        );
        assert_eq!(
            parse_cnf(Cursor::new("p cnf 2147483647 2\n1 0\n-1 0\n")),
            Err(Error::PValTooLarge(2))
        );
    }

    #[test]
    fn clause_line_pass() {
        assert_eq!(
            parse_clause_line("1 -2 3 0"),
            Ok(clause![ipasir_lit![1], ipasir_lit![-2], ipasir_lit![3]])
        );
        assert_eq!(parse_clause_line("0"), Ok(Clause::new()));
        assert_eq!(
            parse_clause_line("-7\t 4  0"),
            Ok(clause![ipasir_lit![-7], ipasir_lit![4]])
        );
    }

    #[test]
    fn clause_line_fail() {
        assert_eq!(
            parse_clause_line("1 -2 3"),
            Err(Error::ClauseEnding(String::from("1 -2 3")))
        );
        assert_eq!(
            parse_clause_line("1 0 -2 0"),
            Err(Error::TrailingData(String::from("1 0 -2 0")))
        );
        assert_eq!(
            parse_clause_line("1 x 0"),
            Err(Error::Lit(String::from("x 0")))
        );
    }

    #[test]
    fn parse_full() {
        let data = "c a comment\n\np cnf 3 3\n1 -2 0\nc inner comment\n-1 3 0\n0\n";
        let formula = parse_cnf(Cursor::new(data)).unwrap();
        assert_eq!(formula.n_vars(), 3);
        assert_eq!(formula.n_clauses(), 3);
        assert_eq!(
            formula.clause_at(1),
            &clause![ipasir_lit![-1], ipasir_lit![3]]
        );
        assert!(formula.clause_at(2).is_empty());
    }

    #[test]
    fn satlib_trailer() {
        let data = "p cnf 2 2\n1 2 0\n-1 0\n%\n0\n\n";
        let formula = parse_cnf(Cursor::new(data)).unwrap();
        assert_eq!(formula.n_clauses(), 2);
    }

    #[test]
    fn missing_header() {
        assert_eq!(
            parse_cnf(Cursor::new("1 2 0\n")),
            Err(Error::MissingPLine(String::from("1 2 0")))
        );
        assert_eq!(
            parse_cnf(Cursor::new("c only comments\n")),
            Err(Error::PreambleNoEnd)
        );
    }

    #[test]
    fn var_out_of_range() {
        assert_eq!(
            parse_cnf(Cursor::new("p cnf 2 1\n1 -3 0\n")),
            Err(Error::VarOutOfRange { lit: -3, n_vars: 2 })
        );
    }

    #[test]
    fn clause_count_mismatch() {
        assert_eq!(
            parse_cnf(Cursor::new("p cnf 2 3\n1 0\n2 0\n")),
            Err(Error::ClauseCount {
                declared: 3,
                found: 2
            })
        );
    }

    #[test]
    fn write_parse() {
        let formula = Formula::new(
            vec![
                clause![ipasir_lit![1], ipasir_lit![-2]],
                Clause::new(),
                clause![ipasir_lit![4]],
            ],
            5,
        );
        let mut cursor = Cursor::new(vec![]);
        write_cnf_annotated(
            &mut cursor,
            formula.iter(),
            formula.n_vars(),
            formula.n_clauses(),
        )
        .unwrap();
        cursor.set_position(0);
        let parsed = parse_cnf(cursor).unwrap();
        assert_eq!(parsed, formula);
    }
}

//! # Module for File IO (Writing and Parsing)
//!
//! It is recommended to parse and write through the interface of [`crate::instances::Formula`]
//! rather than using these functions directly.

use std::{fs::File, io, path::Path};

use thiserror::Error;

pub mod dimacs;

/// Combined Parsing Errors
#[derive(Error, Debug)]
pub enum ParsingError {
    /// IO Errors
    #[error("IO error: {0}")]
    IO(#[from] io::Error),
    /// Dimacs Parsing Error
    #[error("DIMACS error: {0}")]
    Dimacs(#[from] dimacs::Error),
}

/// Opens a buffered reader for the file at `path`
pub(crate) fn open_read<P: AsRef<Path>>(path: P) -> Result<io::BufReader<File>, io::Error> {
    Ok(io::BufReader::new(File::open(path)?))
}

/// Opens a buffered writer for the file at `path`
pub(crate) fn open_write<P: AsRef<Path>>(path: P) -> Result<io::BufWriter<File>, io::Error> {
    Ok(io::BufWriter::new(File::create(path)?))
}

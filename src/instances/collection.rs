//! # Benchmark Collections
//!
//! A directory of DIMACS CNF files (e.g., an unpacked SATLIB family), addressed by index in
//! sorted file name order.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use thiserror::Error;

use super::{fio, Formula};

/// Errors when accessing a benchmark collection
#[derive(Error, Debug)]
pub enum Error {
    /// The requested instance does not exist
    #[error("instance index {idx} out of range for a collection of {len} instances")]
    IndexOutOfRange {
        /// The requested index
        idx: usize,
        /// The number of instances in the collection
        len: usize,
    },
    /// Listing the directory failed
    #[error("IO error: {0}")]
    IO(#[from] io::Error),
    /// The instance could not be parsed
    #[error("failed to load {path}: {source}")]
    Parsing {
        /// The instance file
        path: PathBuf,
        /// The underlying parsing error
        source: fio::ParsingError,
    },
}

/// The `.cnf` files of a directory in sorted order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    files: Vec<PathBuf>,
}

impl Collection {
    /// Lists the `.cnf` files directly contained in `dir`
    ///
    /// # Errors
    ///
    /// If the directory cannot be read.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Collection, Error> {
        let mut files = vec![];
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "cnf") {
                files.push(path);
            }
        }
        files.sort_unstable();
        Ok(Collection { files })
    }

    /// Gets the number of instances
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Checks whether the collection has no instances
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Gets the path of instance `idx`
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] if there is no such instance.
    pub fn get(&self, idx: usize) -> Result<&Path, Error> {
        self.files
            .get(idx)
            .map(PathBuf::as_path)
            .ok_or(Error::IndexOutOfRange {
                idx,
                len: self.files.len(),
            })
    }

    /// Loads instance `idx`
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] if there is no such instance, [`Error::Parsing`] if it is not
    /// a valid DIMACS CNF file.
    pub fn load(&self, idx: usize) -> Result<Formula, Error> {
        let path = self.get(idx)?;
        Formula::from_dimacs_path(path).map_err(|source| Error::Parsing {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Gets an iterator over the instance paths
    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.files.iter().map(PathBuf::as_path)
    }
}

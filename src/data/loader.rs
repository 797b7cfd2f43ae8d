//! CSV Data Loader Module
//! Reads the `;`-separated employee export with Polars and memoizes the
//! result per file.

use super::processor::DataProcessor;
use super::schema::{self, SchemaError};
use polars::prelude::*;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;
use thiserror::Error;
use tracing::{debug, info};

/// Field separator used by the employee export.
pub const SEPARATOR: u8 = b';';

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Cannot read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Invalid data file: {0}")]
    Schema(#[from] SchemaError),
}

/// A cached table together with the file timestamp it was read at.
struct CacheEntry {
    modified: Option<SystemTime>,
    df: DataFrame,
}

/// Loader shared between the UI thread and background load jobs. Holding
/// the lock for a whole `load` keeps population single-flight.
pub type SharedLoader = Arc<Mutex<DataLoader>>;

/// Loads employee tables and keeps one cached copy per file.
///
/// Entries are keyed by canonical path and validated against the file
/// modification time on every call, so editing the file on disk is picked
/// up without an explicit [`DataLoader::invalidate`].
pub struct DataLoader {
    cache: HashMap<PathBuf, CacheEntry>,
    reads: usize,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            reads: 0,
        }
    }

    pub fn shared() -> SharedLoader {
        Arc::new(Mutex::new(Self::new()))
    }

    /// Load a table, returning the cached copy when the file is unchanged.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<DataFrame, LoaderError> {
        let path = path.as_ref();
        let metadata = fs::metadata(path).map_err(|source| LoaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if !metadata.is_file() {
            return Err(LoaderError::Io {
                path: path.to_path_buf(),
                source: io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"),
            });
        }

        let key = Self::cache_key(path);
        let modified = metadata.modified().ok();

        if let Some(entry) = self.cache.get(&key) {
            if entry.modified == modified {
                debug!(path = %key.display(), "employee table served from cache");
                return Ok(entry.df.clone());
            }
            debug!(path = %key.display(), "file changed on disk, reloading");
        }

        let df = Self::read_table(path)?;
        self.reads += 1;
        self.cache.insert(
            key,
            CacheEntry {
                modified,
                df: df.clone(),
            },
        );
        Ok(df)
    }

    /// Read and normalize a table without touching the cache.
    pub fn read_table(path: &Path) -> Result<DataFrame, LoaderError> {
        info!(path = %path.display(), "reading employee data");

        let mut df = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_separator(SEPARATOR)
            // Infer over every row: a late value that does not fit a type
            // guessed from a prefix would otherwise be nulled out.
            .with_infer_schema_length(None)
            .with_ignore_errors(true)
            .finish()?
            .collect()?;

        DataProcessor::trim_column_names(&mut df)?;
        schema::require_columns(&df)?;
        let dates = DataProcessor::derive_joining_dates(&mut df)?;

        info!(
            rows = df.height(),
            columns = df.width(),
            parsed_dates = dates.parsed,
            empty_dates = dates.empty,
            unparseable_dates = dates.unparseable,
            "employee data loaded"
        );
        Ok(df)
    }

    /// Drop the cached table for one file. Returns whether an entry existed.
    pub fn invalidate(&mut self, path: impl AsRef<Path>) -> bool {
        self.cache.remove(&Self::cache_key(path.as_ref())).is_some()
    }

    pub fn is_cached(&self, path: impl AsRef<Path>) -> bool {
        self.cache.contains_key(&Self::cache_key(path.as_ref()))
    }

    /// Number of physical file reads performed so far.
    pub fn read_count(&self) -> usize {
        self.reads
    }

    fn cache_key(path: &Path) -> PathBuf {
        fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
    }
}

/// Column names of a loaded table, in file order.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect()
}

//! # Error Types
//!
//! Every fallible operation in the library returns [`SeasError`]. The variants
//! follow the three failure families of the simulation:
//!
//! - **Data source**: fetch/depth tables, sea-limits tables and lookup grids that
//!   are missing or malformed. These abort a run before any sea state exists.
//! - **Root finding**: the inverse solver could not bracket its target, which only
//!   happens when a growth curve is not monotone (bad table data or units).
//! - **Invalid configuration**: rejected at the simulation entry point before any
//!   computation starts.
//!
//! There is no partial-failure mode: a run either produces one report per wind
//! observation or returns the first error it hit.

use std::io;
use thiserror::Error;

/// Errors that can occur while loading site data or running a simulation.
#[derive(Error, Debug)]
pub enum SeasError {
    /// A fetch, depth, sea-limits or lookup-table source is malformed
    #[error("data source '{source_name}': {reason}")]
    DataSource { source_name: String, reason: String },

    /// Reading a data source from disk failed
    #[error("data source IO: {0}")]
    Io(#[from] io::Error),

    /// A CSV data source could not be parsed
    #[error("data source CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Bracket expansion gave up before reaching the target value
    #[error("inverse solver failed to bracket target {target} after {iterations} doublings")]
    RootFinding { target: f64, iterations: usize },

    /// Configuration or input rejected before the run started
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Configuration file exists but does not match the schema
    #[error("config parse: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration could not be rendered as TOML
    #[error("config write: {0}")]
    ConfigWrite(#[from] toml::ser::Error),
}

impl SeasError {
    pub(crate) fn data_source(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        SeasError::DataSource {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        SeasError::InvalidConfiguration(reason.into())
    }

    /// True for every failure caused by a missing or malformed input table.
    pub fn is_data_source(&self) -> bool {
        matches!(
            self,
            SeasError::DataSource { .. } | SeasError::Io(_) | SeasError::Csv(_)
        )
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, SeasError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_source_family_is_recognised() {
        let err = SeasError::data_source("site.csv", "missing direction 90");
        assert!(err.is_data_source());
        assert_eq!(
            err.to_string(),
            "data source 'site.csv': missing direction 90"
        );

        let io_err = SeasError::from(io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert!(io_err.is_data_source());

        assert!(!SeasError::invalid("empty wind series").is_data_source());
        assert!(!SeasError::RootFinding {
            target: 1.0,
            iterations: 64
        }
        .is_data_source());
    }
}

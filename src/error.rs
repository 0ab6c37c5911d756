//! Error types for the speaker scheduler

use std::path::PathBuf;
use thiserror::Error;

/// Result type for scheduler operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Input file could not be opened or read
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Prior-year file had no usable date/name records, so there is no average position
    #[error("Prior-year file contains no names; cannot compute an average position")]
    EmptyPriorYear,

    /// Fuzzy matching was attempted against an empty prior-year index
    #[error("No prior-year names to match \"{name}\" against")]
    NoMatchCandidates { name: String },

    #[error("Cannot draw from a normal distribution with mu={mu}, sigma={sigma}")]
    InvalidDistribution { mu: f64, sigma: f64 },

    #[error("Configuration error: {0}")]
    Config(String),
}

//! Error types for the analysis pipeline
//!
//! Every variant is fatal: the binary reports it and exits.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading, aggregating or rendering results
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Input file not found: {}", .0.display())]
    MissingInput(PathBuf),

    #[error("Results directory not found: {}", .0.display())]
    MissingResultsDir(PathBuf),

    #[error("No CSV found in {}. Generate results with the benchmark runner first.", .0.display())]
    NoCsvFiles(PathBuf),

    #[error("Failed to parse {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{}: data row {row} has initial_balance = 0, error percentage is undefined", .path.display())]
    ZeroInitialBalance { path: PathBuf, row: usize },

    #[error("No result rows loaded")]
    EmptyTable,

    #[error("Thread count {0} not present in the data")]
    MissingThreadCount(u32),

    #[error("Invalid plot style: {0}")]
    InvalidStyle(String),

    #[error("Failed to render {}: {message}", .path.display())]
    Render { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for analysis operations
pub type Result<T> = std::result::Result<T, AnalysisError>;

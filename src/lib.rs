//! delock-analyze - analysis of race-condition benchmark results
//!
//! Loads the CSV files written by the benchmark runner, aggregates error and
//! timing statistics per thread count, renders charts and a summary table,
//! and reports the key findings.

pub mod analysis;
pub mod charts;
pub mod cli;
pub mod csv_output;
pub mod dataset;
pub mod error;
pub mod findings;
pub mod json_output;
pub mod stats;
pub mod style;

pub use error::{AnalysisError, Result};

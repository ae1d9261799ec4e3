//! Benchmark result loading
//!
//! Reads the CSV files written by the race-condition benchmark (one row per
//! run), concatenates them and computes the derived error metrics once.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::{AnalysisError, Result};

/// One benchmark run as written in the CSV file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawResultRow {
    /// Number of concurrent workers
    pub threads: u32,
    /// Withdrawals performed per worker
    pub iterations: u64,
    pub initial_balance: f64,
    pub final_balance: f64,
    /// Balance a correctly synchronized run ends with
    pub expected: f64,
    /// Wall-clock duration of the run in seconds
    pub time_sec: f64,
    #[serde(default)]
    pub run_id: Option<u32>,
    /// Amount withdrawn per iteration
    #[serde(default)]
    pub amount: Option<i64>,
    /// Times the balance dropped below zero
    #[serde(default)]
    pub overdraws: Option<u64>,
    /// Withdrawals refused for insufficient balance
    #[serde(default)]
    pub failed_checks: Option<u64>,
}

/// A benchmark run with its derived error metrics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrialRecord {
    pub row: RawResultRow,
    /// Balance lost to the race: `initial_balance - final_balance`
    pub error: f64,
    /// `error / initial_balance * 100`
    pub error_percent: f64,
    /// `final_balance == expected`, exact comparison
    pub is_correct: bool,
}

impl TrialRecord {
    /// Compute the derived fields for a raw row
    ///
    /// Returns `None` when `initial_balance` is zero, since the error
    /// percentage is undefined for such a run.
    pub fn from_raw(row: RawResultRow) -> Option<Self> {
        if row.initial_balance == 0.0 {
            return None;
        }

        let error = row.initial_balance - row.final_balance;
        let error_percent = error / row.initial_balance * 100.0;
        let is_correct = row.final_balance == row.expected;

        Some(Self {
            row,
            error,
            error_percent,
            is_correct,
        })
    }

    pub fn threads(&self) -> u32 {
        self.row.threads
    }

    pub fn iterations(&self) -> u64 {
        self.row.iterations
    }

    pub fn time_sec(&self) -> f64 {
        self.row.time_sec
    }
}

/// All loaded runs, in file order
///
/// The table is built once and only handed out by shared reference.
#[derive(Debug, Clone, Default)]
pub struct ResultTable {
    records: Vec<TrialRecord>,
}

impl ResultTable {
    /// Load and concatenate CSV files in the given order
    ///
    /// Every path is checked before any file is read, so a missing file
    /// never yields a partial table.
    pub fn load(paths: &[PathBuf]) -> Result<Self> {
        if let Some(missing) = paths.iter().find(|p| !p.is_file()) {
            return Err(AnalysisError::MissingInput(missing.clone()));
        }

        let mut records = Vec::new();
        for path in paths {
            let file = fs::File::open(path)?;
            let table = Self::from_reader(file, path)?;
            tracing::debug!("Loaded {} rows from {}", table.len(), path.display());
            records.extend(table.records);
        }

        if records.is_empty() {
            return Err(AnalysisError::EmptyTable);
        }

        Ok(Self { records })
    }

    /// Parse CSV data from any reader
    ///
    /// `source` is only used to label errors.
    pub fn from_reader<R: Read>(reader: R, source: &Path) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

        let mut records = Vec::new();
        for (index, result) in csv_reader.deserialize::<RawResultRow>().enumerate() {
            let row = result.map_err(|source_err| AnalysisError::Csv {
                path: source.to_path_buf(),
                source: source_err,
            })?;
            let record =
                TrialRecord::from_raw(row).ok_or_else(|| AnalysisError::ZeroInitialBalance {
                    path: source.to_path_buf(),
                    row: index + 1,
                })?;
            records.push(record);
        }

        Ok(Self { records })
    }

    pub fn from_records(records: Vec<TrialRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[TrialRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TrialRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct thread counts, ascending
    pub fn thread_counts(&self) -> Vec<u32> {
        let set: BTreeSet<u32> = self.records.iter().map(TrialRecord::threads).collect();
        set.into_iter().collect()
    }

    /// Distinct iteration counts, ascending
    pub fn iteration_counts(&self) -> Vec<u64> {
        let set: BTreeSet<u64> = self.records.iter().map(TrialRecord::iterations).collect();
        set.into_iter().collect()
    }

    pub fn max_threads(&self) -> Option<u32> {
        self.records.iter().map(TrialRecord::threads).max()
    }

    /// Copy of the runs matching `predicate`
    pub fn filter<F>(&self, predicate: F) -> ResultTable
    where
        F: Fn(&TrialRecord) -> bool,
    {
        Self {
            records: self
                .records
                .iter()
                .filter(|r| predicate(r))
                .cloned()
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ResultTable {
    type Item = &'a TrialRecord;
    type IntoIter = std::slice::Iter<'a, TrialRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// List the `*.csv` files directly inside `dir`, sorted by path
pub fn discover_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(AnalysisError::MissingResultsDir(dir.to_path_buf()));
    }

    let entries = fs::read_dir(dir)?.collect::<std::io::Result<Vec<_>>>()?;
    let mut files: Vec<PathBuf> = entries
        .into_iter()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "csv"))
        .collect();
    files.sort();

    if files.is_empty() {
        return Err(AnalysisError::NoCsvFiles(dir.to_path_buf()));
    }

    Ok(files)
}

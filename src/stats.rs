//! Grouped statistics over benchmark runs
//!
//! Groups runs by thread count (or thread count x iterations) and computes
//! mean, sample standard deviation, min, max, count and success rate.
//! Means are taken in f64; squared residuals are summed with trueno's SIMD
//! vectors.

use serde::Serialize;
use std::collections::BTreeMap;
use trueno::Vector;

use crate::dataset::{ResultTable, TrialRecord};

/// Descriptive statistics for one field of one group
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1 divisor), undefined for one sample
    pub std_dev: Option<f64>,
    pub min: f64,
    pub max: f64,
}

impl Summary {
    /// Summarize a set of values, `None` when empty
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let count = values.len();
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        // Balances reach 1e7 and beyond, past f32's integer precision, so the
        // mean stays in f64. Rounding can drift one ulp outside the extremes.
        let mut mean = values.iter().sum::<f64>() / count as f64;
        if min <= max {
            mean = mean.clamp(min, max);
        }

        // Residuals are small enough for trueno's f32 lanes
        let std_dev = if count > 1 {
            let residuals: Vec<f32> = values.iter().map(|&v| (v - mean) as f32).collect();
            Vector::from_slice(&residuals)
                .sum_of_squares()
                .ok()
                .map(|ss| (ss as f64 / (count - 1) as f64).sqrt())
        } else {
            None
        };

        Some(Self {
            count,
            mean,
            std_dev,
            min,
            max,
        })
    }

    /// Standard deviation for error bars (zero when undefined)
    pub fn spread(&self) -> f64 {
        self.std_dev.unwrap_or(0.0)
    }
}

/// Statistics of every derived field for one group of runs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupStats {
    pub count: usize,
    /// Runs that ended with the expected balance
    pub correct: usize,
    pub error: Summary,
    pub error_percent: Summary,
    pub time_sec: Summary,
}

impl GroupStats {
    pub fn from_records(records: &[&TrialRecord]) -> Option<Self> {
        let errors: Vec<f64> = records.iter().map(|r| r.error).collect();
        let error_percents: Vec<f64> = records.iter().map(|r| r.error_percent).collect();
        let times: Vec<f64> = records.iter().map(|r| r.time_sec()).collect();

        Some(Self {
            count: records.len(),
            correct: records.iter().filter(|r| r.is_correct).count(),
            error: Summary::from_values(&errors)?,
            error_percent: Summary::from_values(&error_percents)?,
            time_sec: Summary::from_values(&times)?,
        })
    }

    pub fn from_table(table: &ResultTable) -> Option<Self> {
        let records: Vec<&TrialRecord> = table.iter().collect();
        Self::from_records(&records)
    }

    /// Percentage of correct runs
    pub fn success_rate(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.correct as f64 / self.count as f64 * 100.0
    }

    pub fn all_correct(&self) -> bool {
        self.correct == self.count
    }
}

/// Key for the two-parameter grouping
///
/// Ordered by iterations first so a sorted list walks the heatmap row by row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct CellKey {
    pub iterations: u64,
    pub threads: u32,
}

/// One group and its statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregate<K> {
    pub key: K,
    pub stats: GroupStats,
}

/// Group runs by `key_fn`, ascending by key
pub fn aggregate_by<K, F>(table: &ResultTable, key_fn: F) -> Vec<Aggregate<K>>
where
    K: Ord + Copy,
    F: Fn(&TrialRecord) -> K,
{
    let mut groups: BTreeMap<K, Vec<&TrialRecord>> = BTreeMap::new();
    for record in table {
        groups.entry(key_fn(record)).or_default().push(record);
    }

    groups
        .into_iter()
        .filter_map(|(key, records)| {
            GroupStats::from_records(&records).map(|stats| Aggregate { key, stats })
        })
        .collect()
}

pub fn group_by_threads(table: &ResultTable) -> Vec<Aggregate<u32>> {
    aggregate_by(table, TrialRecord::threads)
}

pub fn group_by_threads_and_iterations(table: &ResultTable) -> Vec<Aggregate<CellKey>> {
    aggregate_by(table, |r| CellKey {
        iterations: r.iterations(),
        threads: r.threads(),
    })
}

/// Look up a group by key
pub fn find_group<K: PartialEq>(groups: &[Aggregate<K>], key: K) -> Option<&Aggregate<K>> {
    groups.iter().find(|g| g.key == key)
}

/// Mean error percentage pivoted into an iterations x threads grid
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorGrid {
    /// Row labels, ascending
    pub iterations: Vec<u64>,
    /// Column labels, ascending
    pub threads: Vec<u32>,
    /// `cells[row][col]`, `None` where no run has that combination
    pub cells: Vec<Vec<Option<f64>>>,
}

impl ErrorGrid {
    pub fn from_table(table: &ResultTable) -> Self {
        let iterations = table.iteration_counts();
        let threads = table.thread_counts();
        let mut cells = vec![vec![None; threads.len()]; iterations.len()];

        for group in group_by_threads_and_iterations(table) {
            let row = iterations.binary_search(&group.key.iterations);
            let col = threads.binary_search(&group.key.threads);
            if let (Ok(row), Ok(col)) = (row, col) {
                cells[row][col] = Some(group.stats.error_percent.mean);
            }
        }

        Self {
            iterations,
            threads,
            cells,
        }
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.cells.get(row)?.get(col).copied().flatten()
    }

    /// Smallest and largest cell values
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let values: Vec<f64> = self.cells.iter().flatten().flatten().copied().collect();
        if values.is_empty() {
            return None;
        }
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Some((min, max))
    }
}

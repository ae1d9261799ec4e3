//! Key findings printed at the end of an analysis run
//!
//! Three sections: the single-thread baseline, the worst case at the highest
//! thread count, and the error trend across a selection of thread counts.

use serde::{Deserialize, Serialize};

use crate::dataset::ResultTable;
use crate::error::{AnalysisError, Result};
use crate::stats::{find_group, group_by_threads, Summary};

const RULE_WIDTH: usize = 70;

/// Which thread counts the trend section reports
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TrendSelection {
    /// Smallest, median and largest thread counts above one
    #[default]
    Auto,
    /// Exactly these thread counts; each must be present in the data
    Explicit(Vec<u32>),
}

impl TrendSelection {
    pub fn from_list(threads: Option<Vec<u32>>) -> Self {
        match threads {
            Some(list) if !list.is_empty() => TrendSelection::Explicit(list),
            _ => TrendSelection::Auto,
        }
    }

    /// Thread counts to report, given the distinct counts present (ascending)
    pub fn resolve(&self, available: &[u32]) -> Result<Vec<u32>> {
        match self {
            TrendSelection::Auto => Ok(auto_trend_threads(available)),
            TrendSelection::Explicit(list) => {
                if let Some(&missing) = list.iter().find(|t| !available.contains(t)) {
                    return Err(AnalysisError::MissingThreadCount(missing));
                }
                Ok(list.clone())
            }
        }
    }
}

/// Smallest, lower-median and largest thread counts above one
///
/// Falls back to every available count when the data has no parallel runs.
pub fn auto_trend_threads(available: &[u32]) -> Vec<u32> {
    let parallel: Vec<u32> = available.iter().copied().filter(|&t| t > 1).collect();
    let candidates = if parallel.is_empty() {
        available.to_vec()
    } else {
        parallel
    };

    let (Some(&first), Some(&last)) = (candidates.first(), candidates.last()) else {
        return Vec::new();
    };
    let median = candidates[(candidates.len() - 1) / 2];

    let mut picked = vec![first, median, last];
    picked.dedup();
    picked
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineFindings {
    pub runs: usize,
    pub all_correct: bool,
    pub mean_time_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorstCaseFindings {
    pub threads: u32,
    pub runs: usize,
    pub mean_error_percent: f64,
    pub success_rate: f64,
    pub mean_time_ms: f64,
    /// Only when the input carries the `overdraws` column
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_overdraws: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub threads: u32,
    pub mean_error_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyFindings {
    pub total_runs: usize,
    /// `None` when the data has no single-thread runs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline: Option<BaselineFindings>,
    pub worst_case: WorstCaseFindings,
    pub trend: Vec<TrendPoint>,
}

impl KeyFindings {
    pub fn compute(table: &ResultTable, selection: &TrendSelection) -> Result<Self> {
        let groups = group_by_threads(table);
        let worst = groups.last().ok_or(AnalysisError::EmptyTable)?;

        let baseline = find_group(&groups, 1).map(|g| BaselineFindings {
            runs: g.stats.count,
            all_correct: g.stats.all_correct(),
            mean_time_ms: g.stats.time_sec.mean * 1000.0,
        });
        if baseline.is_none() {
            tracing::warn!("No single-thread runs in the data, baseline section omitted");
        }

        let overdraws: Vec<f64> = table
            .iter()
            .filter(|r| r.threads() == worst.key)
            .filter_map(|r| r.row.overdraws)
            .map(|o| o as f64)
            .collect();

        let worst_case = WorstCaseFindings {
            threads: worst.key,
            runs: worst.stats.count,
            mean_error_percent: worst.stats.error_percent.mean,
            success_rate: worst.stats.success_rate(),
            mean_time_ms: worst.stats.time_sec.mean * 1000.0,
            mean_overdraws: Summary::from_values(&overdraws).map(|s| s.mean),
        };

        let available: Vec<u32> = groups.iter().map(|g| g.key).collect();
        let trend = selection
            .resolve(&available)?
            .into_iter()
            .map(|threads| {
                find_group(&groups, threads)
                    .map(|g| TrendPoint {
                        threads,
                        mean_error_percent: g.stats.error_percent.mean,
                    })
                    .ok_or(AnalysisError::MissingThreadCount(threads))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            total_runs: table.len(),
            baseline,
            worst_case,
            trend,
        })
    }

    /// Human-readable report
    pub fn to_text(&self) -> String {
        let rule = "=".repeat(RULE_WIDTH);
        let mut output = String::new();

        output.push_str(&format!("\n{}\n", rule));
        output.push_str("KEY FINDINGS - RACE CONDITION EXPERIMENT\n");
        output.push_str(&format!("{}\n\n", rule));

        if let Some(baseline) = &self.baseline {
            output.push_str("1 thread (baseline):\n");
            output.push_str(&format!("  - All runs correct: {}\n", baseline.all_correct));
            output.push_str(&format!("  - Mean time: {:.3} ms\n\n", baseline.mean_time_ms));
        }

        let worst = &self.worst_case;
        output.push_str(&format!("{} threads (worst case):\n", worst.threads));
        output.push_str(&format!("  - Mean error: {:.2}%\n", worst.mean_error_percent));
        output.push_str(&format!("  - Success rate: {:.1}%\n", worst.success_rate));
        output.push_str(&format!("  - Mean time: {:.3} ms\n", worst.mean_time_ms));
        if let Some(overdraws) = worst.mean_overdraws {
            output.push_str(&format!("  - Mean overdraws: {:.1}\n", overdraws));
        }
        output.push('\n');

        if !self.trend.is_empty() {
            output.push_str("Observation: error grows with the number of threads\n");
            for point in &self.trend {
                output.push_str(&format!(
                    "  - {} threads -> {:.2}% error\n",
                    point.threads, point.mean_error_percent
                ));
            }
            output.push('\n');
        }

        output.push_str(&format!("{}\n", rule));
        output
    }
}

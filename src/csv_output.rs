//! Summary table output
//!
//! One row per thread count, written as CSV with fixed 4-decimal floats and
//! as a LaTeX tabular for reports.

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::dataset::ResultTable;
use crate::error::Result;
use crate::stats::group_by_threads;

pub const SUMMARY_CSV: &str = "summary_table.csv";
pub const SUMMARY_TEX: &str = "summary_table.tex";

const CSV_HEADER: &str = "Threads,Error_Mean(%),Error_Std(%),Error_Min(%),Error_Max(%),Time_Mean(s),Time_Std(s),Success_Rate(%)";

/// Summary statistics for one thread count
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub threads: u32,
    pub error_mean: f64,
    /// `None` when the group has a single run
    pub error_std: Option<f64>,
    pub error_min: f64,
    pub error_max: f64,
    pub time_mean: f64,
    pub time_std: Option<f64>,
    pub success_rate: f64,
}

/// Summary table formatter
#[derive(Debug, Default)]
pub struct SummaryTable {
    rows: Vec<SummaryRow>,
}

impl SummaryTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the table from grouped statistics, ascending by thread count
    pub fn from_table(table: &ResultTable) -> Self {
        let mut summary = Self::new();
        for group in group_by_threads(table) {
            let stats = &group.stats;
            summary.add_row(SummaryRow {
                threads: group.key,
                error_mean: stats.error_percent.mean,
                error_std: stats.error_percent.std_dev,
                error_min: stats.error_percent.min,
                error_max: stats.error_percent.max,
                time_mean: stats.time_sec.mean,
                time_std: stats.time_sec.std_dev,
                success_rate: stats.success_rate(),
            });
        }
        summary
    }

    pub fn add_row(&mut self, row: SummaryRow) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[SummaryRow] {
        &self.rows
    }

    fn format_float(value: f64) -> String {
        format!("{:.4}", value)
    }

    /// Undefined values become an empty CSV field
    fn format_optional(value: Option<f64>) -> String {
        value.map(Self::format_float).unwrap_or_default()
    }

    fn format_row(row: &SummaryRow) -> String {
        [
            row.threads.to_string(),
            Self::format_float(row.error_mean),
            Self::format_optional(row.error_std),
            Self::format_float(row.error_min),
            Self::format_float(row.error_max),
            Self::format_float(row.time_mean),
            Self::format_optional(row.time_std),
            Self::format_float(row.success_rate),
        ]
        .join(",")
    }

    /// Generate CSV output as string
    pub fn to_csv(&self) -> String {
        let mut output = String::new();
        output.push_str(CSV_HEADER);
        output.push('\n');

        for row in &self.rows {
            output.push_str(&Self::format_row(row));
            output.push('\n');
        }

        output
    }

    /// Generate a LaTeX tabular
    pub fn to_latex(&self) -> String {
        let latex_optional = |v: Option<f64>| {
            v.map(Self::format_float)
                .unwrap_or_else(|| "--".to_string())
        };

        let mut output = String::new();
        output.push_str("\\begin{tabular}{rrrrrrrr}\n");
        output.push_str("\\hline\n");
        output.push_str(
            "Threads & Error mean (\\%) & Error std (\\%) & Error min (\\%) & Error max (\\%) \
             & Time mean (s) & Time std (s) & Success (\\%) \\\\\n",
        );
        output.push_str("\\hline\n");

        for row in &self.rows {
            let cells = [
                row.threads.to_string(),
                Self::format_float(row.error_mean),
                latex_optional(row.error_std),
                Self::format_float(row.error_min),
                Self::format_float(row.error_max),
                Self::format_float(row.time_mean),
                latex_optional(row.time_std),
                Self::format_float(row.success_rate),
            ];
            output.push_str(&cells.join(" & "));
            output.push_str(" \\\\\n");
        }

        output.push_str("\\hline\n");
        output.push_str("\\end{tabular}\n");
        output
    }

    /// Write the CSV and LaTeX artifacts, overwriting existing files
    pub fn write(&self, output_dir: &Path) -> Result<Vec<PathBuf>> {
        let csv_path = output_dir.join(SUMMARY_CSV);
        fs::write(&csv_path, self.to_csv())?;

        let tex_path = output_dir.join(SUMMARY_TEX);
        fs::write(&tex_path, self.to_latex())?;

        Ok(vec![csv_path, tex_path])
    }
}

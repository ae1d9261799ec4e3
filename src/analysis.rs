//! End-to-end analysis run
//!
//! Resolves inputs, loads the results, renders charts, writes the summary
//! table and computes the key findings. Status lines go to stderr so stdout
//! only carries the findings report.

use std::fs;
use std::path::{Path, PathBuf};

use crate::charts;
use crate::csv_output::SummaryTable;
use crate::dataset::{discover_csv_files, ResultTable};
use crate::error::{AnalysisError, Result};
use crate::findings::{KeyFindings, TrendSelection};
use crate::style::PlotStyle;

/// Where the benchmark results come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// A single CSV file
    File(PathBuf),
    /// Every `*.csv` directly inside a directory
    Directory(PathBuf),
}

#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub input: InputSource,
    pub output_dir: PathBuf,
    pub style: PlotStyle,
    pub trend: TrendSelection,
    pub render_charts: bool,
}

impl AnalysisConfig {
    pub fn new(input: InputSource, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input,
            output_dir: output_dir.into(),
            style: PlotStyle::default(),
            trend: TrendSelection::Auto,
            render_charts: true,
        }
    }
}

/// Everything a run produced
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    /// CSV files loaded, in load order
    pub inputs: Vec<PathBuf>,
    pub runs: usize,
    /// Charts first, then the summary table files
    pub artifacts: Vec<PathBuf>,
    pub findings: KeyFindings,
}

/// Turn an input source into the list of files to load
pub fn resolve_inputs(input: &InputSource) -> Result<Vec<PathBuf>> {
    match input {
        InputSource::File(path) => {
            if !path.is_file() {
                return Err(AnalysisError::MissingInput(path.clone()));
            }
            Ok(vec![path.clone()])
        }
        InputSource::Directory(dir) => {
            let files = discover_csv_files(dir)?;
            if files.len() > 1 {
                eprintln!("Found {} CSV files:", files.len());
                for file in &files {
                    eprintln!("  - {}", file.display());
                }
            }
            Ok(files)
        }
    }
}

/// Run the whole analysis
///
/// The output directory is only created once every input has been loaded,
/// so a bad input leaves the filesystem untouched.
pub fn run(config: &AnalysisConfig) -> Result<AnalysisReport> {
    let inputs = resolve_inputs(&config.input)?;
    let table = ResultTable::load(&inputs)?;
    eprintln!("Loaded {} runs", table.len());
    tracing::info!(
        "Thread counts: {:?}, iteration counts: {:?}",
        table.thread_counts(),
        table.iteration_counts()
    );

    fs::create_dir_all(&config.output_dir)?;

    let mut artifacts = Vec::new();
    if config.render_charts {
        for path in charts::render_all(&table, &config.output_dir, &config.style)? {
            eprintln!("Chart saved: {}", path.display());
            artifacts.push(path);
        }
    } else {
        tracing::debug!("Chart rendering skipped");
    }

    artifacts.extend(write_summary(&table, &config.output_dir)?);

    let findings = KeyFindings::compute(&table, &config.trend)?;

    Ok(AnalysisReport {
        inputs,
        runs: table.len(),
        artifacts,
        findings,
    })
}

fn write_summary(table: &ResultTable, output_dir: &Path) -> Result<Vec<PathBuf>> {
    let paths = SummaryTable::from_table(table).write(output_dir)?;
    for path in &paths {
        eprintln!("Table saved: {}", path.display());
    }
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const CSV: &str = "threads,iterations,initial_balance,final_balance,expected,time_sec\n\
                       1,100,1000,1000,1000,0.001\n\
                       2,100,1000,950,1000,0.002\n\
                       8,100,1000,700,1000,0.004\n";

    fn config(dir: &TempDir, input: InputSource) -> AnalysisConfig {
        let mut config = AnalysisConfig::new(input, dir.path().join("out"));
        config.render_charts = false;
        config
    }

    #[test]
    fn test_resolve_single_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("r.csv");
        fs::write(&path, CSV).unwrap();
        assert_eq!(
            resolve_inputs(&InputSource::File(path.clone())).unwrap(),
            vec![path]
        );
    }

    #[test]
    fn test_resolve_missing_file() {
        let err = resolve_inputs(&InputSource::File(PathBuf::from("/nonexistent/r.csv")))
            .unwrap_err();
        assert!(matches!(err, AnalysisError::MissingInput(_)));
    }

    #[test]
    fn test_missing_dir_does_not_create_output() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir, InputSource::Directory(dir.path().join("missing")));
        let err = run(&config).unwrap_err();
        assert!(matches!(err, AnalysisError::MissingResultsDir(_)));
        assert!(!config.output_dir.exists());
    }

    #[test]
    fn test_run_without_charts() {
        let dir = TempDir::new().unwrap();
        let results = dir.path().join("results");
        fs::create_dir(&results).unwrap();
        fs::write(results.join("a.csv"), CSV).unwrap();
        fs::write(results.join("b.csv"), CSV).unwrap();

        let config = config(&dir, InputSource::Directory(results.clone()));
        let report = run(&config).unwrap();

        assert_eq!(report.inputs, vec![results.join("a.csv"), results.join("b.csv")]);
        assert_eq!(report.runs, 6);
        assert_eq!(report.artifacts.len(), 2);
        assert!(config.output_dir.join("summary_table.csv").is_file());
        assert_eq!(report.findings.worst_case.threads, 8);
    }
}

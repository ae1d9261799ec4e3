//! CLI argument parsing for delock-analyze

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::analysis::InputSource;
use crate::style::ImageFormat;

/// Output format for the key findings
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "delock-analyze")]
#[command(version)]
#[command(
    about = "Charts, summary table and key findings for race-condition benchmark results",
    long_about = None
)]
pub struct Cli {
    /// Analyze a single CSV file instead of scanning the results directory
    #[arg(long = "csv", value_name = "PATH")]
    pub csv: Option<PathBuf>,

    /// Directory scanned for *.csv files when --csv is not given
    #[arg(long = "results-dir", value_name = "DIR", default_value = "results")]
    pub results_dir: PathBuf,

    /// Directory receiving charts and the summary table
    #[arg(long = "output-dir", value_name = "DIR", default_value = "analysis_results")]
    pub output_dir: PathBuf,

    /// TOML file with plot style overrides
    #[arg(long = "style", value_name = "PATH")]
    pub style: Option<PathBuf>,

    /// Chart image format (overrides the style file)
    #[arg(long = "image-format", value_enum)]
    pub image_format: Option<ImageFormat>,

    /// Findings output format (text or json)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Thread counts reported in the error trend (e.g., --trend-threads 2,8,48)
    #[arg(long = "trend-threads", value_name = "LIST", value_delimiter = ',')]
    pub trend_threads: Option<Vec<u32>>,

    /// Skip chart rendering
    #[arg(long = "no-charts")]
    pub no_charts: bool,

    /// Enable debug tracing output to stderr
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,
}

impl Cli {
    /// `--csv` wins over directory discovery
    pub fn input_source(&self) -> InputSource {
        match &self.csv {
            Some(path) => InputSource::File(path.clone()),
            None => InputSource::Directory(self.results_dir.clone()),
        }
    }
}

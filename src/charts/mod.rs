//! Chart rendering
//!
//! Each chart is prepared from the result table into a plain data struct
//! (so the numbers can be tested without a drawing backend) and then drawn
//! with plotters onto a PNG or SVG backend chosen by the plot style.

mod correctness;
mod error_chart;
mod heatmap;
mod time_chart;

pub use correctness::{CorrectnessBar, CorrectnessChart};
pub use error_chart::{ErrorPoint, ErrorVsThreadsChart};
pub use heatmap::HeatmapChart;
pub use time_chart::{TimeSeries, TimeVsThreadsChart};

use plotters::coord::Shift;
use plotters::prelude::*;
use std::ops::Range;
use std::path::{Path, PathBuf};

use crate::dataset::ResultTable;
use crate::error::{AnalysisError, Result};
use crate::style::{ImageFormat, PlotStyle};

pub const ERROR_VS_THREADS: &str = "error_vs_threads";
pub const TIME_VS_THREADS: &str = "time_vs_threads";
pub const CORRECTNESS_RATE: &str = "correctness_rate";
pub const HEATMAP_ERROR: &str = "heatmap_error";

pub(crate) const ERROR_RED: RGBColor = RGBColor(231, 76, 60);
pub(crate) const ERROR_BLUE: RGBColor = RGBColor(52, 152, 219);
pub(crate) const SUCCESS_GREEN: RGBColor = RGBColor(46, 204, 113);
pub(crate) const REFERENCE_GREEN: RGBColor = RGBColor(0, 128, 0);

/// Line colors for multi-series charts
pub(crate) const SERIES_COLORS: [RGBColor; 8] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
];

pub(crate) type DrawResult<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// A chart that can draw itself on any plotters backend
pub trait Chart {
    /// File stem of the artifact, extension comes from the style
    fn stem(&self) -> &'static str;

    fn size(&self, style: &PlotStyle) -> (u32, u32) {
        style.figure_size
    }

    fn draw<DB>(&self, root: &DrawingArea<DB, Shift>, style: &PlotStyle) -> DrawResult<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static;
}

/// Draw `chart` into `output_dir`, overwriting any previous file
pub fn render<C: Chart>(chart: &C, output_dir: &Path, style: &PlotStyle) -> Result<PathBuf> {
    let path = output_dir.join(style.chart_file_name(chart.stem()));
    let size = chart.size(style);

    let outcome = match style.image_format {
        ImageFormat::Png => draw_and_present(BitMapBackend::new(&path, size), chart, style),
        ImageFormat::Svg => draw_and_present(SVGBackend::new(&path, size), chart, style),
    };

    outcome.map_err(|e| AnalysisError::Render {
        path: path.clone(),
        message: e.to_string(),
    })?;

    tracing::debug!("Rendered {} at {}x{}", path.display(), size.0, size.1);
    Ok(path)
}

fn draw_and_present<DB, C>(backend: DB, chart: &C, style: &PlotStyle) -> DrawResult<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
    C: Chart,
{
    let root = backend.into_drawing_area();
    root.fill(&WHITE)?;
    chart.draw(&root, style)?;
    root.present()?;
    Ok(())
}

/// Render the four charts, returning the written paths in order
pub fn render_all(table: &ResultTable, output_dir: &Path, style: &PlotStyle) -> Result<Vec<PathBuf>> {
    Ok(vec![
        render(&ErrorVsThreadsChart::from_table(table), output_dir, style)?,
        render(&TimeVsThreadsChart::from_table(table), output_dir, style)?,
        render(&CorrectnessChart::from_table(table), output_dir, style)?,
        render(&HeatmapChart::from_table(table), output_dir, style)?,
    ])
}

/// Thread-count axis drawn in log2 space
///
/// Values are plotted at `log2(threads)`; ticks landing on integers are
/// labelled with the matching power of two.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Log2Axis {
    min_threads: u32,
    max_threads: u32,
}

impl Log2Axis {
    pub(crate) fn new<I: IntoIterator<Item = u32>>(threads: I) -> Self {
        let mut min_threads = u32::MAX;
        let mut max_threads = 1;
        for t in threads {
            min_threads = min_threads.min(t.max(1));
            max_threads = max_threads.max(t);
        }
        if min_threads == u32::MAX {
            min_threads = 1;
        }
        Self {
            min_threads,
            max_threads,
        }
    }

    pub(crate) fn position(threads: u32) -> f64 {
        (threads.max(1) as f64).log2()
    }

    pub(crate) fn range(&self) -> Range<f64> {
        (Self::position(self.min_threads) - 0.5)..(Self::position(self.max_threads) + 0.5)
    }

    pub(crate) fn label(x: f64) -> String {
        let k = x.round();
        if (x - k).abs() > 1e-6 || k < 0.0 {
            return String::new();
        }
        format!("{}", 2f64.powi(k as i32) as u64)
    }
}

/// Categorical axis: category `i` is centered on `x = i`
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CategoryAxis {
    labels: Vec<String>,
}

impl CategoryAxis {
    pub(crate) fn new(labels: Vec<String>) -> Self {
        Self { labels }
    }

    pub(crate) fn len(&self) -> usize {
        self.labels.len()
    }

    pub(crate) fn range(&self) -> Range<f64> {
        -0.5..(self.len().max(1) as f64 - 0.5)
    }

    /// Enough requested ticks that every integer position gets one
    pub(crate) fn tick_count(&self) -> usize {
        self.len().max(2) * 2 + 1
    }

    pub(crate) fn label(&self, x: f64) -> String {
        let i = x.round();
        if (x - i).abs() > 1e-6 || i < 0.0 {
            return String::new();
        }
        self.labels.get(i as usize).cloned().unwrap_or_default()
    }
}

/// Y range covering `[lo, hi]` pairs with 8% headroom on both sides
pub(crate) fn padded_range<I: IntoIterator<Item = (f64, f64)>>(bounds: I) -> Range<f64> {
    let (lo, hi) = bounds
        .into_iter()
        .filter(|(lo, hi)| lo.is_finite() && hi.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(a, b), (lo, hi)| {
            (a.min(lo), b.max(hi))
        });

    if !lo.is_finite() || !hi.is_finite() {
        return -1.0..1.0;
    }

    let span = hi - lo;
    if span <= f64::EPSILON {
        let pad = lo.abs().max(1.0) * 0.1;
        return (lo - pad)..(hi + pad);
    }
    let pad = span * 0.08;
    (lo - pad)..(hi + pad)
}

/// Format an integer with comma thousands separators
pub(crate) fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

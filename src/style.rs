// Plot style configuration
//
// Passed explicitly to every chart renderer; nothing here is process-global.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{AnalysisError, Result};

/// Image format for chart artifacts
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// Raster PNG (default)
    Png,
    /// Vector SVG
    Svg,
}

impl ImageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
        }
    }
}

/// Rendering style shared by all charts
///
/// # Example
/// ```
/// use delock_analyze::style::PlotStyle;
///
/// let style: PlotStyle = toml::from_str("caption_size = 32").unwrap();
/// assert_eq!(style.caption_size, 32);
/// assert_eq!(style.font_family, "sans-serif");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotStyle {
    /// Size in pixels of single-panel charts
    pub figure_size: (u32, u32),
    /// Size in pixels of the two-panel error chart
    pub wide_figure_size: (u32, u32),
    pub font_family: String,
    pub caption_size: u32,
    pub label_size: u32,
    pub legend_size: u32,
    /// Bar and heatmap cell annotations
    pub annotation_size: u32,
    pub margin: u32,
    pub image_format: ImageFormat,
    /// Heatmap cells at or above this percentage get light text
    pub heatmap_text_threshold: f64,
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            figure_size: (1000, 600),
            wide_figure_size: (1400, 600),
            font_family: "sans-serif".to_string(),
            caption_size: 28,
            label_size: 22,
            legend_size: 18,
            annotation_size: 16,
            margin: 20,
            image_format: ImageFormat::Png,
            heatmap_text_threshold: 50.0,
        }
    }
}

impl PlotStyle {
    /// Load a style from a TOML file; missing keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(AnalysisError::MissingInput(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path)?;
        let style: PlotStyle = toml::from_str(&text).map_err(|e| {
            AnalysisError::InvalidStyle(format!("{}: {}", path.display(), e))
        })?;
        style.validate()?;
        Ok(style)
    }

    /// Validate sizes and threshold
    pub fn validate(&self) -> Result<()> {
        for (name, (w, h)) in [
            ("figure_size", self.figure_size),
            ("wide_figure_size", self.wide_figure_size),
        ] {
            if w < 200 || h < 150 {
                return Err(AnalysisError::InvalidStyle(format!(
                    "{} must be at least 200x150, got {}x{}",
                    name, w, h
                )));
            }
        }

        for (name, size) in [
            ("caption_size", self.caption_size),
            ("label_size", self.label_size),
            ("legend_size", self.legend_size),
            ("annotation_size", self.annotation_size),
        ] {
            if size == 0 {
                return Err(AnalysisError::InvalidStyle(format!("{} must be > 0", name)));
            }
        }

        if self.font_family.trim().is_empty() {
            return Err(AnalysisError::InvalidStyle(
                "font_family must not be empty".to_string(),
            ));
        }

        if !self.heatmap_text_threshold.is_finite() {
            return Err(AnalysisError::InvalidStyle(format!(
                "heatmap_text_threshold must be finite, got {}",
                self.heatmap_text_threshold
            )));
        }

        Ok(())
    }

    /// File name of a chart artifact in the configured image format
    pub fn chart_file_name(&self, stem: &str) -> String {
        format!("{}.{}", stem, self.image_format.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_is_valid() {
        let style = PlotStyle::default();
        assert!(style.validate().is_ok());
        assert_eq!(style.heatmap_text_threshold, 50.0);
        assert_eq!(style.image_format, ImageFormat::Png);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let style: PlotStyle =
            toml::from_str("image_format = \"svg\"\nfigure_size = [800, 500]\n").unwrap();
        assert_eq!(style.image_format, ImageFormat::Svg);
        assert_eq!(style.figure_size, (800, 500));
        assert_eq!(style.wide_figure_size, (1400, 600));
    }

    #[test]
    fn test_rejects_tiny_figure() {
        let style = PlotStyle {
            figure_size: (100, 100),
            ..PlotStyle::default()
        };
        assert!(matches!(
            style.validate(),
            Err(AnalysisError::InvalidStyle(_))
        ));
    }

    #[test]
    fn test_rejects_zero_font() {
        let style = PlotStyle {
            label_size: 0,
            ..PlotStyle::default()
        };
        assert!(style.validate().is_err());
    }

    #[test]
    fn test_chart_file_name() {
        let mut style = PlotStyle::default();
        assert_eq!(style.chart_file_name("heatmap_error"), "heatmap_error.png");
        style.image_format = ImageFormat::Svg;
        assert_eq!(style.chart_file_name("heatmap_error"), "heatmap_error.svg");
    }

    #[test]
    fn test_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("style.toml");
        fs::write(&path, "font_family = \"serif\"\nheatmap_text_threshold = 40.0\n").unwrap();

        let style = PlotStyle::from_file(&path).unwrap();
        assert_eq!(style.font_family, "serif");
        assert_eq!(style.heatmap_text_threshold, 40.0);
    }

    #[test]
    fn test_from_file_invalid_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("style.toml");
        fs::write(&path, "caption_size = \"big\"\n").unwrap();
        assert!(matches!(
            PlotStyle::from_file(&path),
            Err(AnalysisError::InvalidStyle(_))
        ));
    }

    #[test]
    fn test_from_file_missing() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            PlotStyle::from_file(&dir.path().join("nope.toml")),
            Err(AnalysisError::MissingInput(_))
        ));
    }
}

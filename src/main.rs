use anyhow::Result;
use clap::Parser;
use delock_analyze::{
    analysis::{self, AnalysisConfig},
    cli::{Cli, OutputFormat},
    findings::TrendSelection,
    json_output::JsonReport,
    style::PlotStyle,
};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracing(args.debug);

    let mut style = match &args.style {
        Some(path) => PlotStyle::from_file(path)?,
        None => PlotStyle::default(),
    };
    if let Some(format) = args.image_format {
        style.image_format = format;
    }

    let config = AnalysisConfig {
        input: args.input_source(),
        output_dir: args.output_dir.clone(),
        style,
        trend: TrendSelection::from_list(args.trend_threads.clone()),
        render_charts: !args.no_charts,
    };

    let report = analysis::run(&config)?;

    match args.format {
        OutputFormat::Text => print!("{}", report.findings.to_text()),
        OutputFormat::Json => {
            let json = JsonReport::new(report.inputs, report.artifacts, report.findings);
            println!("{}", json.to_json()?);
        }
    }

    eprintln!(
        "\nAnalysis complete. Results in: {}",
        config.output_dir.display()
    );
    Ok(())
}

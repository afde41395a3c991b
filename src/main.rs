use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::info;

use hsqc_ssp::cli::{Cli, Commands, OutputFormat, SourceArgs};
use hsqc_ssp::data::load_peaks;
use hsqc_ssp::features::count_matrices;
use hsqc_ssp::features::grid::GRID_SPECS;
use hsqc_ssp::features::vector::assemble;
use hsqc_ssp::model::load_model;
use hsqc_ssp::report::{self, UBIQUITIN_REFERENCE};
use hsqc_ssp::{CatBoostModel, PredictionPipeline};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match &cli.command {
        Commands::Predict {
            peaks,
            source,
            format,
        } => predict(&cli, peaks, source, *format),
        Commands::Features {
            peaks,
            source,
            output,
        } => write_features(peaks, source, output.as_deref()),
        Commands::Selftest { peaks, source } => selftest(&cli, peaks, source),
    }
}

fn require_model(cli: &Cli) -> Result<CatBoostModel> {
    let path = cli
        .model
        .as_ref()
        .context("no model given: pass --model <PATH> or set SSP_MODEL")?;
    Ok(load_model(path)?)
}

fn predict(cli: &Cli, peaks_path: &Path, source: &SourceArgs, format: OutputFormat) -> Result<()> {
    let model = require_model(cli)?;
    let peaks = load_peaks(peaks_path, &source.source_options(), source.threshold)?;

    let pipeline = PredictionPipeline::new(&model, source.pipeline_config());
    let result = pipeline.run(&peaks)?;

    match format {
        OutputFormat::Text => {
            let title = format!("Spectrum prediction from {}", peaks_path.display());
            println!("{}", report::banner(&title, "# "));
            println!("{}", report::render_text(&result));
        }
        OutputFormat::Json => {
            let source_name = peaks_path.display().to_string();
            println!("{}", report::render_json(&source_name, peaks.len(), &result)?);
        }
    }
    Ok(())
}

fn write_features(peaks_path: &Path, source: &SourceArgs, output: Option<&Path>) -> Result<()> {
    let peaks = load_peaks(peaks_path, &source.source_options(), source.threshold)?;
    if peaks.is_empty() {
        return Err(hsqc_ssp::SspError::EmptyInput.into());
    }

    let matrices = count_matrices(&peaks, source.pipeline_config().pairing)?;
    // validates shapes and length
    let features = assemble(&matrices)?;
    info!(
        "{} peaks -> {} non-zero of {} features",
        peaks.len(),
        features.nonzero(),
        features.len()
    );

    let sink: Box<dyn Write> = match output {
        Some(path) => Box::new(
            std::fs::File::create(path)
                .with_context(|| format!("creating {}", path.display()))?,
        ),
        None => Box::new(std::io::stdout().lock()),
    };
    let mut writer = csv::Writer::from_writer(sink);
    writer.write_record(["grid", "row", "col", "count"])?;
    for (spec, matrix) in GRID_SPECS.iter().zip(&matrices) {
        for ((row, col), count) in matrix.as_array().indexed_iter() {
            writer.write_record([
                spec.name.to_string(),
                row.to_string(),
                col.to_string(),
                count.to_string(),
            ])?;
        }
    }
    writer.flush()?;
    Ok(())
}

fn selftest(cli: &Cli, peaks_path: &Path, source: &SourceArgs) -> Result<()> {
    let model = require_model(cli)?;
    let peaks = load_peaks(peaks_path, &source.source_options(), source.threshold)?;

    println!(
        "{}",
        report::banner("Ubiquitin prediction from 5387 backbone spectrum of the BMRB", "*+")
    );
    let result = PredictionPipeline::new(&model, source.pipeline_config()).run(&peaks)?;
    println!("{}", report::render_text(&result));

    if report::matches_reference(&result, UBIQUITIN_REFERENCE) {
        println!("\n\t\t<<< PREDICTION TEST PASSED >>>");
        Ok(())
    } else {
        println!("\n\t\t>>> PREDICTION TEST FAILED <<<");
        bail!("prediction test failed; possibly a different model is in use");
    }
}

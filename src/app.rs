//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads the observations and the conversion table
//! - runs the pipeline once per criterion
//! - prints run summaries
//! - writes the output CSVs

use clap::Parser;

use crate::cli::{BuildArgs, Command};
use crate::domain::{Criterion, PanelConfig, Season};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `bab` binary.
pub fn run() -> Result<(), AppError> {
    init_tracing();

    let cli = crate::cli::Cli::parse();
    match cli.command {
        Command::Build(args) => handle_build(args),
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    // Quiet by default; RUST_LOG=debug surfaces per-record drop reasons.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn handle_build(args: BuildArgs) -> Result<(), AppError> {
    let seasons = match &args.seasons {
        Some(path) => crate::io::seasons::read_seasons_json(path)?,
        None => Season::defaults(),
    };

    if !(args.scale_factor.is_finite() && args.scale_factor > 0.0) {
        return Err(AppError::new(2, "`--scale-factor` must be finite and > 0."));
    }
    if !(args.max_day_gap.is_finite() && args.max_day_gap > 0.0) {
        return Err(AppError::new(2, "`--max-day-gap` must be finite and > 0."));
    }

    let ingested = crate::io::ingest::load_observations(&args.observations)?;
    let table = crate::io::mapping::load_lunar_table(&args.mapping)?;

    let prepared = pipeline::prepare(&ingested.records, &table)?;
    println!("{}", crate::report::format_prepare_summary(&ingested, &prepared));

    let configs: Vec<PanelConfig> = args
        .criterion
        .to_criteria()
        .into_iter()
        .map(|criterion| PanelConfig {
            criterion,
            scale_factor: args.scale_factor,
            max_day_gap: args.max_day_gap,
            seasons: seasons.clone(),
        })
        .collect();

    let outputs = pipeline::run_all(&prepared, &configs)?;

    std::fs::create_dir_all(&args.out_dir).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to create output directory '{}': {e}", args.out_dir.display()),
        )
    })?;

    for output in &outputs {
        println!("{}", crate::report::format_run_summary(output));

        let criterion = output.config.criterion;
        let panel_path = args.out_dir.join(format!("panel{}.csv", criterion.suffix()));
        crate::io::export::write_panel_csv(&panel_path, &output.panel, &output.config)?;

        // The broadest-range run also provides the fixed reference columns
        // shared by the downstream merge.
        if criterion == Criterion::V1All {
            let fixed_path = args.out_dir.join("panel_fixed.csv");
            crate::io::export::write_fixed_csv(&fixed_path, &output.panel)?;
        }
    }

    Ok(())
}

//! Command-line parsing.
//!
//! The runtime surface is deliberately small: paths to the two inputs and
//! the output directory, plus the config surface (criterion, scale factor,
//! gap ceiling, season definitions). Everything else is fixed.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::CriterionSpec;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "bab", version, about = "Babylonian commodity price panel builder")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build the panel dataset(s) for the chosen criterion.
    Build(BuildArgs),
}

/// Options for a build run.
#[derive(Debug, Parser, Clone)]
pub struct BuildArgs {
    /// Observations CSV (year, month, julian_year/month/day, part
    /// classifications, prices, uncertainty flags).
    #[arg(long, value_name = "CSV")]
    pub observations: PathBuf,

    /// Lunar→solar conversion table CSV (year, month, first_month, first_day).
    #[arg(long, value_name = "CSV")]
    pub mapping: PathBuf,

    /// Directory for the output CSVs.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub out_dir: PathBuf,

    /// Which inclusion criterion to run (`all` runs the four in parallel).
    #[arg(long, value_enum, default_value_t = CriterionSpec::All)]
    pub criterion: CriterionSpec,

    /// Growth rates are per this many days (10 = per ten days, 30 = per month).
    #[arg(long, default_value_t = 10.0)]
    pub scale_factor: f64,

    /// Drop intervals longer than this many days as unreliable.
    #[arg(long, default_value_t = 180.0)]
    pub max_day_gap: f64,

    /// JSON file with season definitions (defaults to the barley and dates
    /// harvest windows).
    #[arg(long, value_name = "JSON")]
    pub seasons: Option<PathBuf>,
}

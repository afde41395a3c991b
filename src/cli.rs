use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::data::filter::DEFAULT_THRESHOLD;
use crate::data::loader::{PeakSourceOptions, DEFAULT_H_COLUMN, DEFAULT_N_COLUMN};
use crate::features::binning::PairingMode;
use crate::pipeline::PipelineConfig;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// CatBoost model exported as JSON
    #[arg(long, short = 'm', env = "SSP_MODEL", global = true)]
    pub model: Option<PathBuf>,

    /// Log at debug level (RUST_LOG overrides)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Predict helix / sheet / coil content from a peak list
    Predict {
        /// Peak list (.csv, .json or .parquet)
        peaks: PathBuf,

        #[command(flatten)]
        source: SourceArgs,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Write the binned count matrices of a peak list as CSV
    Features {
        peaks: PathBuf,

        #[command(flatten)]
        source: SourceArgs,

        /// Output file (stdout if omitted)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
    /// Check the model against the ubiquitin reference peak list
    Selftest {
        /// Reference peak list (BMRB 5387 backbone amides)
        #[arg(long)]
        peaks: PathBuf,

        #[command(flatten)]
        source: SourceArgs,
    },
}

/// Options shared by every command that reads a peak list.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Column holding the 1H shift
    #[arg(long, default_value = DEFAULT_H_COLUMN)]
    pub h_column: String,

    /// Column holding the 15N shift
    #[arg(long, default_value = DEFAULT_N_COLUMN)]
    pub n_column: String,

    /// Keep peaks with intensity / max intensity above this value
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    pub threshold: f64,

    #[arg(long, value_enum, default_value_t = Pairing::Joint)]
    pub pairing: Pairing,
}

impl SourceArgs {
    pub fn source_options(&self) -> PeakSourceOptions {
        PeakSourceOptions {
            h_column: self.h_column.clone(),
            n_column: self.n_column.clone(),
        }
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            pairing: self.pairing.into(),
        }
    }
}

/// How 1H and 15N bin indices are paired.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pairing {
    /// Drop a peak when either shift is out of range
    Joint,
    /// Filter each axis separately and zip by position
    Positional,
}

impl From<Pairing> for PairingMode {
    fn from(p: Pairing) -> Self {
        match p {
            Pairing::Joint => PairingMode::Joint,
            Pairing::Positional => PairingMode::Positional,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

/// Infer table structure from page dumps of positioned words and rulings.
#[derive(Debug, Parser)]
#[command(name = "tabgeom", about, version)]
pub struct Cli {
    /// Log pipeline decisions to stderr (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Extract tables from a page dump
    Tables {
        /// Path to the page dump (JSON)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Page range (e.g. '1,3-5'). Default: all pages
        #[arg(long)]
        pages: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        #[command(flatten)]
        tuning: TuningArgs,
    },

    /// Show the column boundaries discovered on each page
    Columns {
        /// Path to the page dump (JSON)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Page range (e.g. '1,3-5'). Default: all pages
        #[arg(long)]
        pages: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = TextFormat::Text)]
        format: TextFormat,

        #[command(flatten)]
        tuning: TuningArgs,
    },

    /// Extract tables from every page dump in a directory
    Batch {
        /// Directory holding *.json page dumps
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Where to write one output file per dump. Default: DIR/tables
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = BatchFormat::Json)]
        format: BatchFormat,

        #[command(flatten)]
        tuning: TuningArgs,
    },
}

/// Settings shared by every subcommand that runs inference.
///
/// Flags override values read from `--settings`.
#[derive(Debug, Clone, Default, Args)]
pub struct TuningArgs {
    /// JSON file with extraction settings; missing fields keep their defaults
    #[arg(long, value_name = "SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Maximum vertical gap between token tops in one row (default: 4.0)
    #[arg(long)]
    pub row_tolerance: Option<f64>,

    /// Maximum gap between token left edges in one column cluster (default: 6.0)
    #[arg(long)]
    pub column_tolerance: Option<f64>,

    /// Fraction of packed cells above which columns are rebuilt (default: 0.25)
    #[arg(long)]
    pub packed_threshold: Option<f64>,

    /// Apply Unicode normalization to token text
    #[arg(long, value_enum)]
    pub unicode_norm: Option<UnicodeNormArg>,
}

/// Output format for the tables subcommand.
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Aligned plain text
    Text,
    /// JSON output
    Json,
    /// CSV output (tables separated by a blank line)
    Csv,
}

/// Output format for the columns subcommand.
#[derive(Debug, Clone, ValueEnum)]
pub enum TextFormat {
    /// Plain text output
    Text,
    /// JSON output
    Json,
}

/// Output file format for the batch subcommand.
#[derive(Debug, Clone, ValueEnum)]
pub enum BatchFormat {
    /// One .json file per dump
    Json,
    /// One .csv file per dump
    Csv,
}

impl BatchFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            BatchFormat::Json => "json",
            BatchFormat::Csv => "csv",
        }
    }
}

/// Unicode normalization form for CLI arguments.
#[derive(Debug, Clone, ValueEnum)]
pub enum UnicodeNormArg {
    /// Canonical Decomposition, followed by Canonical Composition
    Nfc,
    /// Canonical Decomposition
    Nfd,
    /// Compatibility Decomposition, followed by Canonical Composition
    Nfkc,
    /// Compatibility Decomposition
    Nfkd,
}

impl UnicodeNormArg {
    /// Convert CLI arg to the library's UnicodeNorm enum.
    pub fn to_unicode_norm(&self) -> tabgeom::UnicodeNorm {
        match self {
            UnicodeNormArg::Nfc => tabgeom::UnicodeNorm::Nfc,
            UnicodeNormArg::Nfd => tabgeom::UnicodeNorm::Nfd,
            UnicodeNormArg::Nfkc => tabgeom::UnicodeNorm::Nfkc,
            UnicodeNormArg::Nfkd => tabgeom::UnicodeNorm::Nfkd,
        }
    }
}

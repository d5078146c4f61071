use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Normalize student enrollment workbooks into one unified table",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Normalize every sheet of the given workbooks and write the unified table
    Normalize(NormalizeArgs),
    /// Print distinct-student counts by year, course, duration, gender and employment
    Summary(SummaryArgs),
    /// Check whether the composite identity columns uniquely identify each record
    CheckUnique(CheckUniqueArgs),
    /// Render a static HTML dashboard of enrollment charts
    Dashboard(DashboardArgs),
    /// Show how each sheet's raw headers map to canonical column names
    Headers(HeadersArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Csv,
    Json,
}

#[derive(Debug, Args)]
pub struct SourceArgs {
    /// Workbook files to read (.xlsx, .xlsm, .xls, .ods); repeat for several
    #[arg(short = 'i', long = "input", action = clap::ArgAction::Append, required = true)]
    pub inputs: Vec<PathBuf>,
    /// YAML file adding header, course and duration replacements
    #[arg(long)]
    pub mappings: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct NormalizeArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Output file (stdout if omitted or `-`)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Output format; inferred from the output extension when omitted
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
    /// Drop records whose sheet name carried no recognizable academic year
    #[arg(long = "known-year-only")]
    pub known_year_only: bool,
    /// Print the first N rows as a table instead of writing output
    #[arg(long)]
    pub preview: Option<usize>,
}

#[derive(Debug, Args)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Debug, Args)]
pub struct CheckUniqueArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Number of most frequent duplicate keys to list
    #[arg(long, default_value_t = 10)]
    pub top: usize,
}

#[derive(Debug, Args)]
pub struct DashboardArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Destination HTML file
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,
}

#[derive(Debug, Args)]
pub struct HeadersArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

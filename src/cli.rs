use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "decide",
    version,
    about = "Weighted feature scoring and overlap comparison for decisions"
)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a decision interactively on stdin and report on it
    New(NewCommand),
    /// Report on the built-in example decision
    Example(ExampleCommand),
}

#[derive(Args)]
pub struct NewCommand {
    #[command(flatten)]
    pub report: ReportArgs,
}

#[derive(Args)]
pub struct ExampleCommand {
    #[command(flatten)]
    pub report: ReportArgs,
}

#[derive(Args)]
pub struct ReportArgs {
    /// Directory holding decide.toml
    #[arg(long, default_value = ".")]
    pub config: PathBuf,

    #[arg(short, long, value_enum)]
    pub format: Option<ReportFormat>,

    /// Only compare these options (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub options: Vec<String>,

    /// Include three-way overlap for every triple of options
    #[arg(long)]
    pub venn3: bool,

    /// Keep only these features and re-weight them (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub keep: Vec<String>,

    /// Add the feature if missing, remove it if present
    #[arg(long = "toggle-feature")]
    pub toggle_feature: Vec<String>,

    /// Add the option if missing, remove it if present
    #[arg(long = "toggle-option")]
    pub toggle_option: Vec<String>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ReportFormat {
    Json,
    Md,
}

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "ingredient-checkr",
    about = "Analyze cosmetic and food ingredient lists and report safety concerns",
    version
)]
pub struct Cli {
    /// Ingredient list, e.g. "Water, Glycerin, Fragrance" [default: read stdin]
    #[arg(value_name = "INGREDIENTS")]
    pub ingredients: Option<String>,

    /// Read the ingredient list from a file
    #[arg(short, long, value_name = "FILE", conflicts_with = "ingredients")]
    pub file: Option<PathBuf>,

    /// Config file [default: ./.ingredient-checkr/config.toml, fallback ~/.config/ingredient-checkr/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Report format
    #[arg(long, default_value = "terminal", value_name = "FORMAT")]
    pub report: ReportFormat,

    /// Skip the safety lookup service; every ingredient gets default data
    #[arg(long)]
    pub offline: bool,

    /// Maximum lookups in flight (overrides lookup.concurrency)
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Exit with code 1 if any ingredient is High Concern
    #[arg(long)]
    pub strict: bool,

    /// Show data sources and debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print summary line
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ReportFormat {
    Terminal,
    Json,
}

//! CLI command definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Localizador: CLI for Localizar - locator engine for captured DOM snapshots
#[derive(Parser, Debug)]
#[command(name = "localizador")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate generated locators against a snapshot
    Validate(ValidateArgs),

    /// Generate locators from a snapshot
    Generate(GenerateArgs),
}

/// Arguments for the validate command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Snapshot JSON file
    pub snapshot: PathBuf,

    /// Validate a single element, addressed by uid or id
    #[arg(short, long)]
    pub element: Option<String>,

    /// Validate every element, not just interactive ones
    #[arg(long, conflicts_with = "element")]
    pub all: bool,

    /// Minimum valid selectors an element needs to pass
    #[arg(short, long, default_value = "2")]
    pub min_valid: usize,

    /// Drop the CSS-candidate requirement
    #[arg(long)]
    pub no_css: bool,

    /// Drop the XPath-candidate requirement
    #[arg(long)]
    pub no_xpath: bool,

    /// Report path (default: sibling <snapshot>-validation-results.json)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the generate command
#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Snapshot JSON file
    pub snapshot: PathBuf,

    /// Generate for a single element, addressed by uid or id
    #[arg(short, long)]
    pub element: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Color output argument
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use super::types::LogLevel;

/// Rebrand a qwen-code checkout to foragen-cli and verify the result
#[derive(Parser, Debug)]
#[command(name = "rebrand")]
#[command(author, version, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Disable colored output (any non-empty NO_COLOR also disables it)
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub no_color: bool,

    /// Run as if started in <path> instead of the current working directory
    #[arg(short = 'C', global = true, value_name = "PATH")]
    pub directory: Option<PathBuf>,

    /// Diagnostic log level (RUST_LOG takes precedence)
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rewrite content, then rename files and directories
    Run(RunArgs),

    /// Scan the tree for leftover references
    Verify {
        /// Print the results as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Count what would change without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Print every modified file and every rename
    #[arg(short, long)]
    pub verbose: bool,

    /// Skip the confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Run `rebrand verify` once the run finishes
    #[arg(long)]
    pub verify: bool,

    /// Stage all changes with `git add -A` once the run finishes
    #[arg(long)]
    pub stage: bool,

    /// Rename with the filesystem only, never `git mv`
    #[arg(long)]
    pub no_git: bool,

    /// Print the run report as JSON (requires --yes or --dry-run)
    #[arg(long, conflicts_with = "verify")]
    pub json: bool,
}

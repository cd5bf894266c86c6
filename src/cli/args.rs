//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    build::BuildArgs, completions::CompletionsArgs, config::ConfigCommands,
    generate::GenerateArgs, log::LogArgs, menu::MenuArgs, parse::ParseArgs,
};

#[derive(Parser)]
#[command(name = "partsmith")]
#[command(author, version, about = "Prompt-to-part generator")]
#[command(long_about = "Turns short engineering requests into parametric parts: an SVG preview, an OpenSCAD model, an optional STL mesh and a first-order structural check, all recorded in a CSV run log.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Print pipeline tracing to stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Directory for generated files (default: current directory)
    #[arg(long, global = true, env = "PARTSMITH_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Run log file (default: parts_generated.csv in the output directory)
    #[arg(long, global = true, env = "PARTSMITH_LOG")]
    pub log_file: Option<PathBuf>,

    /// Skip STL export even when OpenSCAD is available
    #[arg(long, global = true)]
    pub no_export: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a part from a prompt
    Generate(GenerateArgs),

    /// Show the resolved part spec for a prompt without generating anything
    Parse(ParseArgs),

    /// Generate a part from a part spec YAML file
    Build(BuildArgs),

    /// Pick an example prompt (or enter your own) and generate it
    Menu(MenuArgs),

    /// Show the run log
    Log(LogArgs),

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Automatically pick a format for the command
    #[default]
    Auto,
    /// YAML format (full fidelity)
    Yaml,
    /// JSON format (for programming)
    Json,
    /// Markdown tables
    Md,
}

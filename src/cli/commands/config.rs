//! `partsmith config` command - Configuration inspection

use clap::Subcommand;
use console::style;
use miette::Result;
use std::path::Path;

use crate::cli::helpers::load_config;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::config::{Config, PROJECT_CONFIG_FILE};

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration values
    Show(ShowArgs),

    /// Show paths to configuration files
    Path,

    /// List all available configuration keys
    Keys,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Show only this key's value
    pub key: Option<String>,
}

/// Valid configuration keys
const VALID_KEYS: &[(&str, &str)] = &[
    ("output_dir", "Directory for preview, SCAD and STL files"),
    ("log_file", "Run log CSV (relative to output_dir)"),
    ("prefix", "File name prefix for generated artifacts"),
    ("openscad", "OpenSCAD executable used for STL export"),
    ("export_mesh", "Export STL meshes (true/false)"),
];

/// Run a config subcommand
pub fn run(cmd: ConfigCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ConfigCommands::Show(args) => run_show(args, global),
        ConfigCommands::Path => run_path(),
        ConfigCommands::Keys => run_keys(),
    }
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global).effective();

    if let Some(key) = &args.key {
        let value = get_config_value(&config, key)
            .ok_or_else(|| miette::miette!("Unknown config key '{}'", key))?;
        println!("{}", value);
        return Ok(());
    }

    if global.format == OutputFormat::Yaml {
        print!("{}", crate::yaml::to_yaml(&config)?);
        return Ok(());
    }

    println!("{}", style("Effective Configuration").bold().underlined());
    println!();
    for (key, _) in VALID_KEYS {
        let value = get_config_value(&config, key).unwrap_or_default();
        println!("  {}: {}", style(key).cyan(), style(value).yellow());
    }

    println!();
    println!("{}", style("Config Sources (in priority order):").dim());
    println!("  1. Command-line flags (--output-dir, --log-file, --no-export)");
    println!("  2. Environment variables (PARTSMITH_OUTPUT_DIR, PARTSMITH_LOG, PARTSMITH_OPENSCAD)");
    println!("  3. Project config (./{})", PROJECT_CONFIG_FILE);
    println!("  4. Global config (~/.config/partsmith/config.yaml)");

    Ok(())
}

fn run_path() -> Result<()> {
    let global_path = Config::global_config_path()
        .ok_or_else(|| miette::miette!("Could not determine global config directory"))?;

    println!("{}", style("Configuration file paths:").bold());
    println!();
    print_path("Global: ", &global_path);
    println!();
    print_path("Project:", Path::new(PROJECT_CONFIG_FILE));

    Ok(())
}

fn run_keys() -> Result<()> {
    println!("{}", style("Available configuration keys:").bold());
    println!();

    for (key, description) in VALID_KEYS {
        println!("  {:<20} {}", style(key).cyan(), style(description).dim());
    }

    Ok(())
}

fn print_path(label: &str, path: &Path) {
    println!("  {} {}", style(label).cyan(), path.display());
    if path.exists() {
        println!("           {}", style("(exists)").green());
    } else {
        println!("           {}", style("(not created)").dim());
    }
}

fn get_config_value(config: &Config, key: &str) -> Option<String> {
    match key {
        "output_dir" => Some(config.output_dir().display().to_string()),
        "log_file" => Some(config.log_path().display().to_string()),
        "prefix" => Some(config.prefix().to_string()),
        "openscad" => Some(config.openscad().to_string()),
        "export_mesh" => Some(config.export_mesh().to_string()),
        _ => None,
    }
}

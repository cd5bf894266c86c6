//! `partsmith parse` command - show how a prompt is understood

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::interpret;

#[derive(clap::Args, Debug)]
pub struct ParseArgs {
    /// Free-text description of the part
    pub prompt: String,

    /// Show the raw extracted fields instead of the resolved spec
    #[arg(long)]
    pub raw: bool,
}

pub fn run(args: ParseArgs, global: &GlobalOpts) -> Result<()> {
    let request = interpret::interpret(&args.prompt);

    let output = match (global.format, args.raw) {
        (OutputFormat::Json, true) => serde_json::to_string_pretty(&request).into_diagnostic()?,
        (OutputFormat::Json, false) => {
            serde_json::to_string_pretty(&request.resolve()).into_diagnostic()?
        }
        (_, true) => crate::yaml::to_yaml(&request)?,
        (_, false) => crate::yaml::to_yaml(&request.resolve())?,
    };

    if !global.quiet && global.format == OutputFormat::Auto {
        println!(
            "{} {}",
            style("#").dim(),
            style(format!("partsmith parse: {}", args.prompt.replace('\n', " "))).dim()
        );
    }
    print!("{}", output);
    if !output.ends_with('\n') {
        println!();
    }

    Ok(())
}

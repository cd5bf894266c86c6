//! `partsmith generate` command - run the full pipeline on one prompt

use miette::Result;

use crate::cli::helpers::{open_pipeline, print_summary};
use crate::cli::GlobalOpts;

#[derive(clap::Args, Debug)]
pub struct GenerateArgs {
    /// Free-text description of the part
    pub prompt: String,
}

pub fn run(args: GenerateArgs, global: &GlobalOpts) -> Result<()> {
    generate(&args.prompt, global)
}

/// Generate one part and print its summary
pub fn generate(prompt: &str, global: &GlobalOpts) -> Result<()> {
    let mut pipeline = open_pipeline(global)?;
    let summary = pipeline.run(prompt)?;
    print_summary(&summary, global.quiet);
    Ok(())
}

//! `partsmith build` command - generate a part from a spec file

use miette::Result;
use std::path::PathBuf;

use crate::cli::helpers::{open_pipeline, print_summary};
use crate::cli::GlobalOpts;
use crate::yaml;

#[derive(clap::Args, Debug)]
pub struct BuildArgs {
    /// Part spec YAML, e.g. the output of `partsmith parse`
    pub spec_file: PathBuf,
}

pub fn run(args: BuildArgs, global: &GlobalOpts) -> Result<()> {
    let spec = yaml::load_part_spec(&args.spec_file)?;

    let mut pipeline = open_pipeline(global)?;
    let label = args.spec_file.display().to_string();
    let summary = pipeline.run_spec(&label, &spec, chrono::Local::now())?;
    print_summary(&summary, global.quiet);
    Ok(())
}

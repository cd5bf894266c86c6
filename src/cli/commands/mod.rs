//! CLI command implementations

pub mod build;
pub mod completions;
pub mod config;
pub mod generate;
pub mod log;
pub mod menu;
pub mod parse;

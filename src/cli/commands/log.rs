//! `partsmith log` command - show the run log

use console::style;
use miette::{IntoDiagnostic, Result};
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{load_config, truncate_str};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{CsvLogSink, LogRow};

#[derive(clap::Args, Debug)]
pub struct LogArgs {
    /// Show only the most recent N runs
    #[arg(long, short = 'n')]
    pub last: Option<usize>,
}

pub fn run(args: LogArgs, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global);
    let sink = CsvLogSink::new(config.log_path());
    let rows = sink.read_all().into_diagnostic()?;

    let skip = args
        .last
        .map(|n| rows.len().saturating_sub(n))
        .unwrap_or(0);
    let rows = &rows[skip..];

    if rows.is_empty() {
        if !global.quiet {
            println!(
                "{} No runs logged in {}",
                style("•").dim(),
                sink.path().display()
            );
        }
        return Ok(());
    }

    match global.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(rows).into_diagnostic()?);
        }
        OutputFormat::Yaml => print!("{}", crate::yaml::to_yaml(&rows)?),
        OutputFormat::Auto | OutputFormat::Md => println!("{}", render_table(rows)),
    }

    Ok(())
}

/// Markdown table of the run log
pub fn render_table(rows: &[LogRow]) -> String {
    let mut builder = Builder::default();
    builder.push_record([
        "Timestamp", "Type", "Material", "Area mm²", "Weight g", "Max N", "Target N", "Status",
        "Mesh", "Prompt",
    ]);

    for row in rows {
        builder.push_record([
            row.timestamp.clone(),
            row.part_type.to_string(),
            row.material.to_string(),
            format!("{:.1}", row.net_area_mm2),
            format!("{:.1}", row.weight_g),
            format!("{:.0}", row.max_force_n),
            row.target_force_n.to_string(),
            row.status.to_string(),
            if row.stl.is_empty() { "-" } else { "stl" }.to_string(),
            truncate_str(&row.prompt, 40),
        ]);
    }

    builder.build().with(Style::markdown()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Material, PartType, Verdict};

    #[test]
    fn test_render_table() {
        let row = LogRow {
            timestamp: "20240612_120000".to_string(),
            prompt: "Make a steel plate 80mm diameter with 4 holes 6mm, thickness 6mm".to_string(),
            part_type: PartType::Circle,
            png: "/out/part.svg".to_string(),
            scad: "/out/part.scad".to_string(),
            stl: String::new(),
            net_area_mm2: 5026.548,
            thickness_mm: 6,
            volume_cm3: 30.159,
            material: Material::Steel,
            weight_g: 236.75,
            max_force_n: 120_000.0,
            target_force_n: 2000,
            status: Verdict::Pass,
        };

        let table = render_table(&[row]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("Timestamp"));
        assert!(lines[1].starts_with("|-"));
        assert!(lines[2].contains("circle"));
        assert!(lines[2].contains("5026.5"));
        assert!(lines[2].contains("PASS"));
        assert!(lines[2].contains("Make a steel plate 80mm diameter with..."));
    }
}

//! Shared helper functions for CLI commands

use console::style;
use miette::Result;

use crate::cli::GlobalOpts;
use crate::core::{Config, CsvLogSink, ExportOutcome, Pipeline, RunSummary, SystemRunner};
use crate::entities::{PartSpec, Shape, Verdict};

/// Layered config with command-line flags applied on top
pub fn load_config(global: &GlobalOpts) -> Config {
    let mut config = Config::load();
    config.merge(Config {
        output_dir: global.output_dir.clone(),
        log_file: global.log_file.clone(),
        export_mesh: if global.no_export { Some(false) } else { None },
        ..Config::default()
    });
    config
}

/// Pipeline writing to the configured CSV log and running the real OpenSCAD
pub fn open_pipeline(global: &GlobalOpts) -> Result<Pipeline<CsvLogSink, SystemRunner>> {
    let config = load_config(global);
    let sink = CsvLogSink::new(config.log_path());
    Ok(Pipeline::new(config, sink, SystemRunner)?)
}

/// One-line description of the shape-specific dimensions
pub fn describe_shape(spec: &PartSpec) -> String {
    match spec.shape {
        Shape::Trapezoid {
            width_left_mm,
            width_right_mm,
        } => format!(
            "{} x {}→{} x {} mm",
            spec.length_mm, width_left_mm, width_right_mm, spec.thickness_mm
        ),
        Shape::Rectangle { rect_width_mm } => format!(
            "{} x {} x {} mm",
            spec.length_mm, rect_width_mm, spec.thickness_mm
        ),
        Shape::Circle { circle_diameter_mm } => {
            format!("Ø{} x {} mm", circle_diameter_mm, spec.thickness_mm)
        }
        Shape::LBracket {
            width_mm,
            flange_height_mm,
        } => format!(
            "{} x {} x {} mm, flange {} mm",
            spec.length_mm, width_mm, spec.thickness_mm, flange_height_mm
        ),
    }
}

/// Print the result of a pipeline run
pub fn print_summary(summary: &RunSummary, quiet: bool) {
    let row = &summary.row;
    if quiet {
        println!("{}", row.scad);
        return;
    }

    let status = match row.status {
        Verdict::Pass => style(row.status.to_string()).green().bold(),
        Verdict::Fail => style(row.status.to_string()).red().bold(),
    };

    println!(
        "{} Generated {} ({}, {})",
        style("✓").green(),
        style(row.part_type.to_string()).cyan(),
        describe_shape(&summary.spec),
        row.material
    );
    println!("   {} {}", style("preview:").dim(), row.png);
    println!("   {} {}", style("scad:").dim(), row.scad);
    match &summary.mesh {
        ExportOutcome::Exported(path) => {
            println!("   {} {}", style("mesh:").dim(), path.display())
        }
        ExportOutcome::Skipped { .. } => println!(
            "   {} {} {}",
            style("mesh:").dim(),
            style("⚠").yellow(),
            summary.mesh
        ),
    }
    println!(
        "   {} {:.1} mm², {:.2} cm³, {:.1} g",
        style("mass:").dim(),
        row.net_area_mm2,
        row.volume_cm3,
        row.weight_g
    );
    println!(
        "   {} {:.0} N capacity vs {} N target (x{:.2}) {}",
        style("load:").dim(),
        row.max_force_n,
        row.target_force_n,
        summary.report.safety_factor(),
        status
    );
}

/// Truncate a string to max_len characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

//! End-to-end part generation
//!
//! prompt → spec → geometry → estimate → preview + SCAD → mesh → run log.
//! Geometry errors abort before anything touches the disk; a failed mesh
//! export only leaves the `stl` column empty.

use chrono::{DateTime, Local};
use miette::Diagnostic;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, instrument};

use crate::core::artifacts::{run_timestamp, ArtifactNames};
use crate::core::config::Config;
use crate::core::exporter::{CommandRunner, ExportOutcome, MeshExporter};
use crate::core::log_sink::{LogError, LogRow, LogSink};
use crate::entities::geometry::{self, GeometryError};
use crate::entities::{PartSpec, StructuralReport};
use crate::interpret;
use crate::render::{TemplateError, TemplateGenerator};

#[derive(Debug, Error, Diagnostic)]
pub enum PipelineError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    #[diagnostic(code(partsmith::render))]
    Template(#[from] TemplateError),

    #[error("Failed to write {path}: {source}")]
    #[diagnostic(code(partsmith::io))]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(code(partsmith::log))]
    Log(#[from] LogError),
}

/// Everything produced by one run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub row: LogRow,
    pub spec: PartSpec,
    pub report: StructuralReport,
    pub mesh: ExportOutcome,
    pub artifacts: ArtifactNames,
}

pub struct Pipeline<S: LogSink, R: CommandRunner> {
    pub config: Config,
    pub sink: S,
    pub runner: R,
    templates: TemplateGenerator,
}

impl<S: LogSink, R: CommandRunner> Pipeline<S, R> {
    pub fn new(config: Config, sink: S, runner: R) -> Result<Self, PipelineError> {
        Ok(Self {
            config,
            sink,
            runner,
            templates: TemplateGenerator::new()?,
        })
    }

    /// Generate a part from a prompt, stamped with the current time
    pub fn run(&mut self, prompt: &str) -> Result<RunSummary, PipelineError> {
        self.run_at(prompt, Local::now())
    }

    pub fn run_at(&mut self, prompt: &str, now: DateTime<Local>) -> Result<RunSummary, PipelineError> {
        let spec = interpret::parse(prompt);
        self.run_spec(prompt, &spec, now)
    }

    /// Generate a part from an already resolved spec
    ///
    /// `label` is what the run log records in its prompt column.
    #[instrument(skip(self, spec, now), fields(part_type = %spec.part_type()))]
    pub fn run_spec(
        &mut self,
        label: &str,
        spec: &PartSpec,
        now: DateTime<Local>,
    ) -> Result<RunSummary, PipelineError> {
        let part = geometry::build(spec)?;
        let report = StructuralReport::estimate(spec);

        let timestamp = run_timestamp(&now);
        let output_dir = self.config.output_dir();
        let artifacts = ArtifactNames::new(&output_dir, self.config.prefix(), &timestamp)
            .map_err(|source| PipelineError::Write {
                path: output_dir.clone(),
                source,
            })?;
        std::fs::create_dir_all(&output_dir).map_err(|source| PipelineError::Write {
            path: output_dir.clone(),
            source,
        })?;

        let svg = self.templates.render_preview(&part.preview)?;
        write_artifact(&artifacts.preview, &svg)?;
        let scad = self.templates.render_scad(&part.solid)?;
        write_artifact(&artifacts.scad, &scad)?;

        let mesh = MeshExporter::new(
            &self.runner,
            self.config.openscad(),
            self.config.export_mesh(),
        )
        .export(&artifacts.scad, &artifacts.stl);

        let row = LogRow {
            timestamp,
            prompt: label.to_string(),
            part_type: spec.part_type(),
            png: artifacts.preview.display().to_string(),
            scad: artifacts.scad.display().to_string(),
            stl: mesh
                .stl_path()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            net_area_mm2: report.net_area_mm2,
            thickness_mm: spec.thickness_mm,
            volume_cm3: report.volume_cm3,
            material: spec.material,
            weight_g: report.weight_g,
            max_force_n: report.max_force_n,
            target_force_n: spec.target_force_n,
            status: report.status,
        };
        self.sink.append(&row)?;

        info!(scad = %row.scad, status = %row.status, mesh = %mesh, "part generated");

        Ok(RunSummary {
            row,
            spec: *spec,
            report,
            mesh,
            artifacts,
        })
    }
}

fn write_artifact(path: &Path, contents: &str) -> Result<(), PipelineError> {
    std::fs::write(path, contents).map_err(|source| PipelineError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::exporter::{CommandOutput, ExportError};
    use crate::core::log_sink::{CsvLogSink, MemoryLogSink};
    use crate::entities::{Material, PartType, Shape, Verdict};
    use chrono::TimeZone;

    /// Behaves like a machine without OpenSCAD installed
    struct MissingOpenscad;

    impl CommandRunner for MissingOpenscad {
        fn run(&self, program: &str, _args: &[String]) -> Result<CommandOutput, ExportError> {
            Err(ExportError::NotFound {
                program: program.to_string(),
            })
        }
    }

    /// Writes a stub mesh to the `-o` path
    struct StubOpenscad;

    impl CommandRunner for StubOpenscad {
        fn run(&self, _program: &str, args: &[String]) -> Result<CommandOutput, ExportError> {
            std::fs::write(&args[1], "solid part\nendsolid part\n")?;
            Ok(CommandOutput {
                success: true,
                stdout: String::new(),
                stderr: String::new(),
                code: Some(0),
            })
        }
    }

    fn config(dir: &Path) -> Config {
        Config {
            output_dir: Some(dir.to_path_buf()),
            ..Config::default()
        }
    }

    fn noon() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 6, 12, 12, 0, 0).unwrap()
    }

    const ARM_PROMPT: &str =
        "Design an aluminum suspension arm 150mm long, 50mm wide, supports 2000N, 3-bolt mount";

    #[test]
    fn test_arm_prompt_end_to_end() {
        let tmp = tempfile::tempdir().unwrap();
        let mut pipeline =
            Pipeline::new(config(tmp.path()), MemoryLogSink::default(), MissingOpenscad).unwrap();

        let summary = pipeline.run_at(ARM_PROMPT, noon()).unwrap();

        assert_eq!(summary.spec.part_type(), PartType::Trapezoid);
        assert_eq!(summary.row.timestamp, "20240612_120000");
        assert_eq!(summary.row.prompt, ARM_PROMPT);
        assert_eq!(summary.row.status, Verdict::Pass);
        assert!((summary.row.net_area_mm2 - 5625.0).abs() < 1e-9);
        assert!((summary.row.max_force_n - 18_750.0).abs() < 1e-9);

        assert!(Path::new(&summary.row.png).is_absolute());
        assert!(summary.row.png.ends_with("part_20240612_120000.svg"));
        assert!(summary.artifacts.preview.exists());
        assert!(summary.artifacts.scad.exists());

        // Export degraded, run still logged
        assert_eq!(summary.row.stl, "");
        assert!(matches!(summary.mesh, ExportOutcome::Skipped { .. }));
        assert_eq!(pipeline.sink.rows, vec![summary.row]);
    }

    #[test]
    fn test_exported_mesh_is_logged() {
        let tmp = tempfile::tempdir().unwrap();
        let mut pipeline =
            Pipeline::new(config(tmp.path()), MemoryLogSink::default(), StubOpenscad).unwrap();

        let summary = pipeline
            .run_at("create a rectangle bar 200mm length and 30mm width with 2 bolt holes", noon())
            .unwrap();

        assert_eq!(summary.spec.shape, Shape::Rectangle { rect_width_mm: 30 });
        assert!(summary.row.stl.ends_with("part_20240612_120000.stl"));
        assert!(summary.artifacts.stl.exists());
    }

    #[test]
    fn test_export_disabled_by_config() {
        let tmp = tempfile::tempdir().unwrap();
        let mut cfg = config(tmp.path());
        cfg.export_mesh = Some(false);
        let mut pipeline = Pipeline::new(cfg, MemoryLogSink::default(), StubOpenscad).unwrap();

        let summary = pipeline.run_at(ARM_PROMPT, noon()).unwrap();
        assert_eq!(summary.row.stl, "");
        assert!(!summary.artifacts.stl.exists());
    }

    #[test]
    fn test_degenerate_geometry_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("out");
        let mut pipeline =
            Pipeline::new(config(&out), MemoryLogSink::default(), StubOpenscad).unwrap();

        let spec = PartSpec {
            shape: Shape::Rectangle { rect_width_mm: 0 },
            length_mm: 100,
            thickness_mm: 5,
            hole_count: 2,
            hole_diameter_mm: 6,
            material: Material::Steel,
            target_force_n: 2000,
        };
        let err = pipeline.run_spec("bad.yaml", &spec, noon()).unwrap_err();

        assert!(matches!(err, PipelineError::Geometry(GeometryError::Degenerate { .. })));
        assert!(pipeline.sink.rows.is_empty());
        assert!(!out.exists());
    }

    #[test]
    fn test_csv_log_accumulates_runs() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = config(tmp.path());
        let log_path = cfg.log_path();
        let mut pipeline =
            Pipeline::new(cfg, CsvLogSink::new(&log_path), MissingOpenscad).unwrap();

        pipeline.run_at(ARM_PROMPT, noon()).unwrap();
        pipeline
            .run_at(
                "Make a steel plate 80mm diameter with 4 holes 6mm, thickness 6mm",
                Local.with_ymd_and_hms(2024, 6, 12, 12, 0, 1).unwrap(),
            )
            .unwrap();

        let rows = pipeline.sink.read_all().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].part_type, PartType::Trapezoid);
        assert_eq!(rows[1].part_type, PartType::Circle);
        assert_eq!(rows[1].material, Material::Steel);
        assert_eq!(rows[1].thickness_mm, 6);
    }

    #[test]
    fn test_same_second_runs_keep_their_own_files() {
        let tmp = tempfile::tempdir().unwrap();
        let mut pipeline =
            Pipeline::new(config(tmp.path()), MemoryLogSink::default(), MissingOpenscad).unwrap();

        let arm = pipeline.run_at(ARM_PROMPT, noon()).unwrap();
        let plate = pipeline
            .run_at("Make a steel plate 80mm diameter with 4 holes 6mm, thickness 6mm", noon())
            .unwrap();

        assert_ne!(arm.row.scad, plate.row.scad);
        assert!(plate.row.scad.ends_with("part_20240612_120000_2.scad"));
        let arm_scad = std::fs::read_to_string(&arm.artifacts.scad).unwrap();
        assert!(arm_scad.contains("polygon("));
        let plate_scad = std::fs::read_to_string(&plate.artifacts.scad).unwrap();
        assert!(plate_scad.contains("circle("));
    }

    #[test]
    fn test_preview_and_scad_share_holes() {
        let tmp = tempfile::tempdir().unwrap();
        let mut pipeline =
            Pipeline::new(config(tmp.path()), MemoryLogSink::default(), MissingOpenscad).unwrap();
        let summary = pipeline.run_at(ARM_PROMPT, noon()).unwrap();

        let svg = std::fs::read_to_string(&summary.artifacts.preview).unwrap();
        let scad = std::fs::read_to_string(&summary.artifacts.scad).unwrap();
        for x in ["37.5", "75", "112.5"] {
            assert!(svg.contains(&format!(r#"cx="{x}" cy="18.75""#)));
            assert!(scad.contains(&format!("translate([{x}, 18.75, -1])")));
        }
    }
}

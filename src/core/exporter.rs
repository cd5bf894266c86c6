//! Mesh export through an external OpenSCAD binary
//!
//! The exporter never fails a run: a missing binary, a non-zero exit or a
//! disabled export all become [`ExportOutcome::Skipped`] with a reason.

use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;
use tracing::{debug, instrument, warn};

/// Result of running an external command
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
    pub code: Option<i32>,
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("{program} not installed or not in PATH")]
    NotFound { program: String },

    #[error("{program} failed: {message}")]
    CommandFailed { program: String, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Runs external programs; replaced by a fake in tests
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput, ExportError>;
}

/// Runs programs with [`std::process::Command`]
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput, ExportError> {
        let output = Command::new(program).args(args).output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ExportError::NotFound {
                    program: program.to_string(),
                }
            } else {
                ExportError::IoError(e)
            }
        })?;

        Ok(CommandOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            code: output.status.code(),
        })
    }
}

/// What happened to the mesh for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Exported(PathBuf),
    Skipped { reason: String },
}

impl ExportOutcome {
    pub fn stl_path(&self) -> Option<&Path> {
        match self {
            ExportOutcome::Exported(path) => Some(path),
            ExportOutcome::Skipped { .. } => None,
        }
    }
}

impl std::fmt::Display for ExportOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportOutcome::Exported(path) => write!(f, "{}", path.display()),
            ExportOutcome::Skipped { reason } => write!(f, "not exported ({})", reason),
        }
    }
}

/// Converts SCAD files to STL meshes
pub struct MeshExporter<'a, R: CommandRunner> {
    runner: &'a R,
    program: String,
    enabled: bool,
}

impl<'a, R: CommandRunner> MeshExporter<'a, R> {
    pub fn new(runner: &'a R, program: impl Into<String>, enabled: bool) -> Self {
        Self {
            runner,
            program: program.into(),
            enabled,
        }
    }

    /// Export `scad` to `stl`
    #[instrument(skip(self), fields(program = %self.program))]
    pub fn export(&self, scad: &Path, stl: &Path) -> ExportOutcome {
        if !self.enabled {
            return skipped("mesh export disabled");
        }

        let args = vec![
            "-o".to_string(),
            stl.display().to_string(),
            scad.display().to_string(),
        ];
        debug!("{}", format_command(&self.program, &args));

        match self.runner.run(&self.program, &args) {
            Ok(output) if output.success && stl.exists() => ExportOutcome::Exported(stl.to_path_buf()),
            Ok(output) if output.success => skipped(format!("{} produced no mesh", self.program)),
            Ok(output) => {
                let err = ExportError::CommandFailed {
                    program: self.program.clone(),
                    message: failure_message(&output),
                };
                warn!(%err, "mesh export failed");
                skipped(err.to_string())
            }
            Err(err) => {
                warn!(%err, "mesh export failed");
                skipped(err.to_string())
            }
        }
    }
}

/// Shell-like rendering of a command line, for logs
pub fn format_command(program: &str, args: &[String]) -> String {
    std::iter::once(program.to_string())
        .chain(args.iter().map(|a| {
            if a.contains(' ') {
                format!("\"{}\"", a)
            } else {
                a.clone()
            }
        }))
        .collect::<Vec<_>>()
        .join(" ")
}

fn skipped(reason: impl Into<String>) -> ExportOutcome {
    ExportOutcome::Skipped {
        reason: reason.into(),
    }
}

fn failure_message(output: &CommandOutput) -> String {
    let detail = output.stderr.lines().last().unwrap_or("").trim();
    match (output.code, detail.is_empty()) {
        (Some(code), true) => format!("exit code {}", code),
        (Some(code), false) => format!("exit code {}: {}", code, detail),
        (None, true) => "terminated by signal".to_string(),
        (None, false) => detail.to_string(),
    }
}

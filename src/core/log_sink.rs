//! Append-only run log

use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::entities::{Material, PartType, Verdict};

/// One run log record; field order is the CSV column order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRow {
    pub timestamp: String,
    pub prompt: String,
    pub part_type: PartType,
    /// Preview image path
    pub png: String,
    pub scad: String,
    /// Empty when no mesh was exported
    pub stl: String,
    pub net_area_mm2: f64,
    pub thickness_mm: u32,
    pub volume_cm3: f64,
    pub material: Material,
    pub weight_g: f64,
    pub max_force_n: f64,
    pub target_force_n: u32,
    pub status: Verdict,
}

#[derive(Debug, Error)]
pub enum LogError {
    #[error("Failed to open run log {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Run log CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Destination for run log rows
pub trait LogSink {
    fn append(&mut self, row: &LogRow) -> Result<(), LogError>;
}

/// CSV file sink; earlier rows are never rewritten
#[derive(Debug, Clone)]
pub struct CsvLogSink {
    path: PathBuf,
}

impl CsvLogSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every row in the log; a missing file is an empty log
    pub fn read_all(&self) -> Result<Vec<LogRow>, LogError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let mut reader = csv::Reader::from_path(&self.path)?;
        let rows = reader.deserialize().collect::<Result<Vec<LogRow>, _>>()?;
        Ok(rows)
    }
}

impl LogSink for CsvLogSink {
    fn append(&mut self, row: &LogRow) -> Result<(), LogError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| LogError::Open {
                path: self.path.clone(),
                source,
            })?;
        let needs_header = file.metadata()?.len() == 0;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        writer.serialize(row)?;
        writer.flush()?;

        debug!(path = %self.path.display(), header = needs_header, "appended run log row");
        Ok(())
    }
}

/// In-memory sink
#[derive(Debug, Default)]
pub struct MemoryLogSink {
    pub rows: Vec<LogRow>,
}

impl LogSink for MemoryLogSink {
    fn append(&mut self, row: &LogRow) -> Result<(), LogError> {
        self.rows.push(row.clone());
        Ok(())
    }
}

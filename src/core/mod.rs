//! Core module - configuration, artifact output and the generation pipeline

pub mod artifacts;
pub mod config;
pub mod exporter;
pub mod log_sink;
pub mod pipeline;

pub use artifacts::ArtifactNames;
pub use config::Config;
pub use exporter::{CommandRunner, ExportError, ExportOutcome, MeshExporter, SystemRunner};
pub use log_sink::{CsvLogSink, LogError, LogRow, LogSink, MemoryLogSink};
pub use pipeline::{Pipeline, PipelineError, RunSummary};

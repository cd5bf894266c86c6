//! Configuration management with layered hierarchy

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Project-level config file, looked up in the working directory
pub const PROJECT_CONFIG_FILE: &str = "partsmith.yaml";

pub const DEFAULT_LOG_FILE: &str = "parts_generated.csv";
pub const DEFAULT_PREFIX: &str = "part";
pub const DEFAULT_OPENSCAD: &str = "openscad";

/// One configuration layer; unset keys fall through to lower layers
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory for preview, SCAD and STL files
    pub output_dir: Option<PathBuf>,

    /// Run log; relative paths are resolved against `output_dir`
    pub log_file: Option<PathBuf>,

    /// File name prefix for artifacts
    pub prefix: Option<String>,

    /// OpenSCAD executable used for mesh export
    pub openscad: Option<String>,

    pub export_mesh: Option<bool>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (accessors)

        // 2. Global user config (~/.config/partsmith/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::read_layer(&global_path) {
                config.merge(global);
            }
        }

        // 3. Project config (./partsmith.yaml)
        if let Some(project) = Self::read_layer(Path::new(PROJECT_CONFIG_FILE)) {
            config.merge(project);
        }

        // 4. Environment variables
        config.apply_env(|key| std::env::var(key).ok());

        config
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "partsmith")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Parse one layer; unreadable or malformed files are ignored
    fn read_layer(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        let contents = std::fs::read_to_string(path).ok()?;
        match serde_yml::from_str::<Config>(&contents) {
            Ok(layer) => Some(layer),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring malformed config");
                None
            }
        }
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup("PARTSMITH_OUTPUT_DIR") {
            self.output_dir = Some(PathBuf::from(dir));
        }
        if let Some(log) = lookup("PARTSMITH_LOG") {
            self.log_file = Some(PathBuf::from(log));
        }
        if let Some(openscad) = lookup("PARTSMITH_OPENSCAD") {
            self.openscad = Some(openscad);
        }
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(&mut self, other: Config) {
        if other.output_dir.is_some() {
            self.output_dir = other.output_dir;
        }
        if other.log_file.is_some() {
            self.log_file = other.log_file;
        }
        if other.prefix.is_some() {
            self.prefix = other.prefix;
        }
        if other.openscad.is_some() {
            self.openscad = other.openscad;
        }
        if other.export_mesh.is_some() {
            self.export_mesh = other.export_mesh;
        }
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn log_path(&self) -> PathBuf {
        let log = self
            .log_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));
        if log.is_absolute() {
            log
        } else {
            self.output_dir().join(log)
        }
    }

    pub fn prefix(&self) -> &str {
        self.prefix.as_deref().unwrap_or(DEFAULT_PREFIX)
    }

    pub fn openscad(&self) -> &str {
        self.openscad.as_deref().unwrap_or(DEFAULT_OPENSCAD)
    }

    pub fn export_mesh(&self) -> bool {
        self.export_mesh.unwrap_or(true)
    }

    /// Fully populated copy, for display
    pub fn effective(&self) -> Config {
        Config {
            output_dir: Some(self.output_dir()),
            log_file: Some(self.log_path()),
            prefix: Some(self.prefix().to_string()),
            openscad: Some(self.openscad().to_string()),
            export_mesh: Some(self.export_mesh()),
        }
    }
}

//! Run timestamps and artifact file naming

use chrono::{DateTime, TimeZone};
use std::path::{Path, PathBuf};

/// Timestamp layout shared by artifact names and the run log
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Format a moment as a run timestamp, e.g. `20240612_154210`
pub fn run_timestamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Absolute paths of the files written for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactNames {
    pub timestamp: String,
    pub preview: PathBuf,
    pub scad: PathBuf,
    pub stl: PathBuf,
}

impl ArtifactNames {
    /// Names of the form `{prefix}_{timestamp}.{ext}` inside `dir`
    ///
    /// A relative `dir` is anchored at the current working directory. When a
    /// file from an earlier run in the same second is already there, the stem
    /// gets a `_2`, `_3`, ... suffix instead.
    pub fn new(dir: &Path, prefix: &str, timestamp: &str) -> std::io::Result<Self> {
        let dir = if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            std::env::current_dir()?.join(dir)
        };
        let base = format!("{}_{}", prefix, timestamp);

        let mut names = Self::with_stem(&dir, &base, timestamp);
        let mut n = 2u32;
        while names.any_exists() {
            names = Self::with_stem(&dir, &format!("{base}_{n}"), timestamp);
            n += 1;
        }
        Ok(names)
    }

    fn with_stem(dir: &Path, stem: &str, timestamp: &str) -> Self {
        Self {
            timestamp: timestamp.to_string(),
            preview: dir.join(format!("{stem}.svg")),
            scad: dir.join(format!("{stem}.scad")),
            stl: dir.join(format!("{stem}.stl")),
        }
    }

    fn any_exists(&self) -> bool {
        [&self.preview, &self.scad, &self.stl]
            .iter()
            .any(|path| path.exists())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_timestamp_format() {
        let at = Utc.with_ymd_and_hms(2024, 6, 12, 15, 42, 10).unwrap();
        assert_eq!(run_timestamp(&at), "20240612_154210");
    }

    #[test]
    fn test_names_share_stem() {
        let tmp = tempfile::tempdir().unwrap();
        let names = ArtifactNames::new(tmp.path(), "part", "20240612_154210").unwrap();

        assert_eq!(names.preview, tmp.path().join("part_20240612_154210.svg"));
        assert_eq!(names.scad, tmp.path().join("part_20240612_154210.scad"));
        assert_eq!(names.stl, tmp.path().join("part_20240612_154210.stl"));
    }

    #[test]
    fn test_same_second_runs_get_distinct_names() {
        let tmp = tempfile::tempdir().unwrap();
        let ts = "20240612_154210";

        let first = ArtifactNames::new(tmp.path(), "part", ts).unwrap();
        std::fs::write(&first.scad, "").unwrap();

        let second = ArtifactNames::new(tmp.path(), "part", ts).unwrap();
        assert_eq!(second.scad, tmp.path().join("part_20240612_154210_2.scad"));
        assert_eq!(second.preview, tmp.path().join("part_20240612_154210_2.svg"));
        assert_eq!(second.timestamp, ts);

        // Only an STL left over still counts as taken
        std::fs::write(&second.stl, "").unwrap();
        let third = ArtifactNames::new(tmp.path(), "part", ts).unwrap();
        assert_eq!(third.stl, tmp.path().join("part_20240612_154210_3.stl"));
    }

    #[test]
    fn test_relative_dir_becomes_absolute() {
        let names = ArtifactNames::new(Path::new("out"), "arm", "20240101_000000").unwrap();
        assert!(names.preview.is_absolute());
        assert!(names.stl.ends_with("out/arm_20240101_000000.stl"));
    }
}

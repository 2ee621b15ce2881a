use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::PersistError;
use crate::history::{HistoryRecord, HistoryRing};

pub const DEFAULT_OUTPUT_FILE: &str = "output.log";

/// One line per retained record, oldest first. Empty slots are skipped.
pub fn format_history(history: &HistoryRing) -> Vec<String> {
    history
        .records()
        .map(HistoryRecord::to_persisted_line)
        .collect()
}

/// Writes formatted history to a fixed file, replacing whatever was there.
#[derive(Debug, Clone)]
pub struct Persistence {
    path: PathBuf,
}

impl Persistence {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Write `lines` to a temp file next to the target and rename it over the
    /// target, so readers never see a half-written file.
    pub fn write(&self, lines: &[String]) -> Result<PathBuf, PersistError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir).map_err(|source| self.error(source))?;
        for line in lines {
            tmp.write_all(line.as_bytes())
                .map_err(|source| self.error(source))?;
        }
        tmp.as_file()
            .sync_all()
            .map_err(|source| self.error(source))?;
        tmp.persist(&self.path)
            .map_err(|e| self.error(e.error))?;

        Ok(self.path.clone())
    }

    fn error(&self, source: std::io::Error) -> PersistError {
        PersistError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::time::Duration;

    use chrono::{Local, TimeZone};
    use tempfile::TempDir;

    use super::*;
    use crate::ping::Sample;

    #[test]
    fn skips_empty_slots() {
        let mut ring = HistoryRing::new(5);
        let ts = Local.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();
        ring.append(HistoryRecord::new(ts, Sample::Reply(Duration::from_millis(12)), "a.io"));
        ring.append(HistoryRecord::new(ts, Sample::Failed, "a.io"));

        let lines = format_history(&ring);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("[a.io]  12ms\n"));
        assert!(lines[1].ends_with("[a.io]  -1ms\n"));
    }

    #[test]
    fn overwrites_previous_contents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("output.log");
        fs::write(&path, "stale contents that are longer than the new ones\n").unwrap();

        let persistence = Persistence::new(&path);
        let written = persistence
            .write(&["first\n".to_string(), "second\n".to_string()])
            .unwrap();

        assert_eq!(written, path);
        assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn empty_history_writes_an_empty_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("output.log");
        Persistence::new(&path).write(&[]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn missing_directory_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("output.log");
        let err = Persistence::new(&path).write(&["x\n".to_string()]).unwrap_err();
        let PersistError::Write { path: reported, .. } = err;
        assert_eq!(reported, path);
    }
}

//! CSV Writer Implementation

use crate::PersistenceError;
use frame_decoder::DecodedRecord;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::info;

const HEADER: &str = "timestamp,id,label,value";

/// Append-only CSV logger for decoded records
///
/// Rows are buffered and flushed on drop; losing the last few rows on
/// abnormal termination is acceptable.
pub struct CsvLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl CsvLogger {
    /// Open the log at `path`, creating it (and parent directories)
    /// with a header row if it does not exist yet
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let is_new = !path.exists();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let mut writer = BufWriter::new(file);
        if is_new {
            writeln!(writer, "{}", HEADER)?;
        }
        info!("CSV log open at {}", path.display());

        Ok(Self {
            writer: Mutex::new(writer),
            path,
        })
    }

    /// Append one decoded record as one row
    pub fn append(&self, record: &DecodedRecord) -> Result<(), PersistenceError> {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(
            writer,
            "{:.6},{},{},{}",
            record.timestamp,
            csv_field(&record.id),
            csv_field(&record.label),
            csv_field(&record.value),
        )?;
        Ok(())
    }

    /// Flush buffered rows to disk
    pub fn flush(&self) -> Result<(), PersistenceError> {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writer.flush()?;
        Ok(())
    }

    /// Path the log is written to
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Quote a field if it contains a comma, quote, or newline
fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(label: &str, value: &str) -> DecodedRecord {
        DecodedRecord {
            id: "0x171".to_string(),
            label: label.to_string(),
            value: value.to_string(),
            timestamp: 1234.5,
        }
    }

    #[test]
    fn test_header_written_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("can_log.csv");

        {
            let logger = CsvLogger::create(&path).unwrap();
            logger.append(&record("LED Status", "LED On")).unwrap();
            logger.flush().unwrap();
        }
        {
            let logger = CsvLogger::create(&path).unwrap();
            logger.append(&record("LED Status", "LED Off")).unwrap();
            logger.flush().unwrap();
        }

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "timestamp,id,label,value");
        assert!(lines[1].contains("LED On"));
        assert!(lines[2].contains("LED Off"));
    }

    #[test]
    fn test_row_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("can_log.csv");

        let logger = CsvLogger::create(&path).unwrap();
        logger.append(&record("LED Status", "LED On")).unwrap();
        logger.flush().unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("1234.500000,0x171,LED Status,LED On"));
    }

    #[test]
    fn test_values_with_commas_are_quoted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("can_log.csv");

        let logger = CsvLogger::create(&path).unwrap();
        logger
            .append(&record("Airbag SRS", "Frontal impact detected, life counter 05"))
            .unwrap();
        logger.flush().unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("\"Frontal impact detected, life counter 05\""));
    }

    #[test]
    fn test_parent_directories_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("nested").join("can_log.csv");

        let logger = CsvLogger::create(&path).unwrap();
        logger.append(&record("Blinker", "Left")).unwrap();
        logger.flush().unwrap();

        assert!(path.exists());
    }
}

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

/// Kind of filesystem operation recorded in the log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    RenameFile,
    RenameDir,
}

/// A single rename attempt, successful or not
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Seconds since the Unix epoch, with sub-second precision
    pub timestamp: f64,
    pub operation: OperationKind,
    pub old: PathBuf,
    pub new: PathBuf,
    pub success: bool,
}

/// Append-only audit trail of rename operations.
///
/// Records are buffered in memory during the run and written once at the
/// end. Nothing replays the log.
#[derive(Debug)]
pub struct TransactionLog {
    path: PathBuf,
    operations: Vec<TransactionRecord>,
}

impl TransactionLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            operations: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a record stamped with the current time
    pub fn record(&mut self, operation: OperationKind, old: &Path, new: &Path, success: bool) {
        self.operations.push(TransactionRecord {
            timestamp: now_seconds(),
            operation,
            old: old.to_path_buf(),
            new: new.to_path_buf(),
            success,
        });
    }

    pub fn operations(&self) -> &[TransactionRecord] {
        &self.operations
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Write every buffered record to disk, replacing any previous log
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)
            .with_context(|| format!("Failed to create transaction log: {}", self.path.display()))?;

        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &self.operations)
            .with_context(|| format!("Failed to write transaction log: {}", self.path.display()))?;

        Ok(())
    }

    /// Read a previously saved log. A missing file yields an empty list.
    pub fn load(path: &Path) -> Result<Vec<TransactionRecord>> {
        if !path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(path)
            .with_context(|| format!("Failed to open transaction log: {}", path.display()))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse transaction log: {}", path.display()))
    }
}

#[allow(clippy::cast_precision_loss)]
fn now_seconds() -> f64 {
    chrono::Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

//! Structured logging contract for conformance workflows.
//!
//! Provides:
//! - [`LogEntry`]: canonical JSONL log record with required + optional fields.
//! - [`LogEmitter`]: writes JSONL lines to any writer.
//! - [`validate_log_line`] / [`validate_log_file`]: schema validation.
//! - [`ArtifactIndex`]: links logs to report artifacts with SHA-256 digests.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Severity level for log entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

/// Verification outcome attached to case-level events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Pass,
    Fail,
    Skip,
    Error,
}

/// Canonical structured log entry.
///
/// Required fields: `timestamp`, `trace_id`, `level`, `event`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub trace_id: String,
    pub level: LogLevel,
    pub event: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub case: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl LogEntry {
    #[must_use]
    pub fn new(trace_id: impl Into<String>, level: LogLevel, event: impl Into<String>) -> Self {
        Self {
            timestamp: unix_timestamp(),
            trace_id: trace_id.into(),
            level,
            event: event.into(),
            case: None,
            outcome: None,
            details: None,
        }
    }

    #[must_use]
    pub fn with_case(mut self, case: impl Into<String>, outcome: Outcome) -> Self {
        self.case = Some(case.into());
        self.outcome = Some(outcome);
        self
    }
}

/// Seconds since the Unix epoch, as a string.
#[must_use]
pub fn unix_timestamp() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}

/// Writes log entries as JSONL.
pub struct LogEmitter<W: Write> {
    writer: W,
}

impl<W: Write> LogEmitter<W> {
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn emit(&mut self, entry: &LogEntry) -> Result<(), LogError> {
        let line = serde_json::to_string(entry)?;
        writeln!(self.writer, "{line}")?;
        Ok(())
    }
}

/// Structured-log failures.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("line {line}: {reason}")]
    Schema { line: usize, reason: String },
}

/// Validates a single JSONL line against the schema.
pub fn validate_log_line(line: &str) -> Result<LogEntry, LogError> {
    let entry: LogEntry = serde_json::from_str(line)?;
    if entry.timestamp.is_empty() {
        return Err(LogError::Schema {
            line: 0,
            reason: "empty timestamp".to_string(),
        });
    }
    if entry.trace_id.is_empty() {
        return Err(LogError::Schema {
            line: 0,
            reason: "empty trace_id".to_string(),
        });
    }
    if entry.event.is_empty() {
        return Err(LogError::Schema {
            line: 0,
            reason: "empty event".to_string(),
        });
    }
    Ok(entry)
}

/// Validates a whole JSONL file; returns the number of valid entries.
pub fn validate_log_file(path: &Path) -> Result<usize, LogError> {
    let content = std::fs::read_to_string(path)?;
    let mut count = 0;
    for (index, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        validate_log_line(line).map_err(|e| match e {
            LogError::Schema { reason, .. } => LogError::Schema {
                line: index + 1,
                reason,
            },
            other => other,
        })?;
        count += 1;
    }
    Ok(count)
}

/// One report artifact with its integrity digest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactRecord {
    pub path: PathBuf,
    pub sha256: String,
}

/// Links a log to the artifacts a run produced.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArtifactIndex {
    pub artifacts: Vec<ArtifactRecord>,
}

impl ArtifactIndex {
    /// Hashes a file and records it.
    pub fn record_file(&mut self, path: &Path) -> Result<(), LogError> {
        let bytes = std::fs::read(path)?;
        let digest = Sha256::digest(&bytes);
        self.artifacts.push(ArtifactRecord {
            path: path.to_path_buf(),
            sha256: hex_digest(&digest),
        });
        Ok(())
    }

    /// Re-hashes every recorded artifact; returns the paths that changed.
    pub fn verify(&self) -> Result<Vec<PathBuf>, LogError> {
        let mut stale = Vec::new();
        for record in &self.artifacts {
            let bytes = std::fs::read(&record.path)?;
            if hex_digest(&Sha256::digest(&bytes)) != record.sha256 {
                stale.push(record.path.clone());
            }
        }
        Ok(stale)
    }
}

fn hex_digest(digest: &[u8]) -> String {
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_and_validate_line() {
        let mut out = Vec::new();
        {
            let mut emitter = LogEmitter::new(&mut out);
            let entry = LogEntry::new("t-1", LogLevel::Info, "case_done")
                .with_case("decimal_basic", Outcome::Pass);
            emitter.emit(&entry).unwrap();
        }
        let line = String::from_utf8(out).unwrap();
        let entry = validate_log_line(line.trim()).unwrap();
        assert_eq!(entry.case.as_deref(), Some("decimal_basic"));
        assert_eq!(entry.outcome, Some(Outcome::Pass));
    }

    #[test]
    fn test_validate_rejects_empty_required_field() {
        let line = r#"{"timestamp":"1","trace_id":"","level":"info","event":"x"}"#;
        assert!(validate_log_line(line).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_json() {
        assert!(validate_log_line("not json").is_err());
    }

    #[test]
    fn test_artifact_index_detects_change() {
        let dir = std::env::temp_dir().join("scanform_artifact_test");
        std::fs::create_dir_all(&dir).unwrap();
        let file = dir.join("report.md");
        std::fs::write(&file, "one").unwrap();

        let mut index = ArtifactIndex::default();
        index.record_file(&file).unwrap();
        assert!(index.verify().unwrap().is_empty());

        std::fs::write(&file, "two").unwrap();
        assert_eq!(index.verify().unwrap(), vec![file]);
    }
}

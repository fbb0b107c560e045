//! Fixture loading and management.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which binding mode a fixture case exercises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseMode {
    Classic,
    Checked,
    Both,
}

impl Default for CaseMode {
    fn default() -> Self {
        Self::Both
    }
}

/// Declares one destination slot for a fixture case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SlotSpec {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Bytes { len: usize },
    Wide { len: usize },
}

/// Expected terminal state, mirrored as fixture-file vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpectedStatus {
    Completed,
    MatchFailure,
    InputFailure,
    FormatError,
    CapacityError,
}

/// Expected outcome of one fixture case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expectation {
    /// Classic integer return value (count, or -1 for the sentinel).
    pub count: i32,
    /// Terminal state.
    pub status: ExpectedStatus,
    /// Slot values after the call, one per declared slot. Empty to skip
    /// value comparison.
    #[serde(default)]
    pub values: Vec<serde_json::Value>,
}

/// A single fixture test case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureCase {
    /// Case identifier.
    pub name: String,
    /// Template string handed to the engine.
    pub template: String,
    /// Input text scanned by the case.
    pub input: String,
    /// Destination slots, in template order.
    #[serde(default)]
    pub slots: Vec<SlotSpec>,
    /// Expected outcome.
    pub expected: Expectation,
    /// Binding mode(s) the case applies to.
    #[serde(default)]
    pub mode: CaseMode,
}

/// A collection of fixture cases for one family.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureSet {
    /// Schema version.
    pub version: String,
    /// Case family name.
    pub family: String,
    /// Individual test cases.
    pub cases: Vec<FixtureCase>,
}

/// Fixture loading failures.
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

impl FixtureSet {
    /// Load fixture set from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize fixture set to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load fixture set from a file path.
    pub fn from_file(path: &Path) -> Result<Self, FixtureError> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&content)?)
    }
}

//! # scanform-harness
//!
//! Conformance tooling for the scanform engine: JSON fixture cases, a
//! runner that materializes destination slots and executes them, markdown
//! verification reports, and a structured JSONL log contract with artifact
//! integrity hashes.

pub mod diff;
pub mod fixtures;
pub mod runner;
pub mod structured_log;
pub mod verify;

pub use fixtures::{CaseMode, Expectation, ExpectedStatus, FixtureCase, FixtureError, FixtureSet, SlotSpec};
pub use runner::TestRunner;
pub use verify::{Summary, VerificationResult, report_markdown, summarize};

//! Test execution engine.

use scanform_core::{Scanner, Slot, Status};

use crate::fixtures::{CaseMode, ExpectedStatus, FixtureCase, FixtureSet, SlotSpec};
use crate::verify::VerificationResult;
use crate::diff;

/// Backing storage for one materialized slot.
enum Cell {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Bytes(Vec<u8>),
    Wide(Vec<u32>),
}

impl Cell {
    fn new(spec: SlotSpec) -> Self {
        match spec {
            SlotSpec::I8 => Self::I8(0),
            SlotSpec::I16 => Self::I16(0),
            SlotSpec::I32 => Self::I32(0),
            SlotSpec::I64 => Self::I64(0),
            SlotSpec::U8 => Self::U8(0),
            SlotSpec::U16 => Self::U16(0),
            SlotSpec::U32 => Self::U32(0),
            SlotSpec::U64 => Self::U64(0),
            SlotSpec::F32 => Self::F32(0.0),
            SlotSpec::F64 => Self::F64(0.0),
            SlotSpec::Bytes { len } => Self::Bytes(vec![0; len]),
            SlotSpec::Wide { len } => Self::Wide(vec![0; len]),
        }
    }

    fn as_slot(&mut self) -> Slot<'_> {
        match self {
            Self::I8(v) => Slot::I8(v),
            Self::I16(v) => Slot::I16(v),
            Self::I32(v) => Slot::I32(v),
            Self::I64(v) => Slot::I64(v),
            Self::U8(v) => Slot::U8(v),
            Self::U16(v) => Slot::U16(v),
            Self::U32(v) => Slot::U32(v),
            Self::U64(v) => Slot::U64(v),
            Self::F32(v) => Slot::F32(v),
            Self::F64(v) => Slot::F64(v),
            Self::Bytes(buf) => Slot::Bytes(buf.as_mut_slice()),
            Self::Wide(buf) => Slot::Wide(buf.as_mut_slice()),
        }
    }

    /// Post-call value as fixture-comparable JSON. Buffers read as text up
    /// to the first NUL.
    fn value(&self) -> serde_json::Value {
        match self {
            Self::I8(v) => serde_json::json!(v),
            Self::I16(v) => serde_json::json!(v),
            Self::I32(v) => serde_json::json!(v),
            Self::I64(v) => serde_json::json!(v),
            Self::U8(v) => serde_json::json!(v),
            Self::U16(v) => serde_json::json!(v),
            Self::U32(v) => serde_json::json!(v),
            Self::U64(v) => serde_json::json!(v),
            Self::F32(v) => serde_json::json!(v),
            Self::F64(v) => serde_json::json!(v),
            Self::Bytes(buf) => {
                let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
                serde_json::json!(String::from_utf8_lossy(&buf[..end]))
            }
            Self::Wide(buf) => {
                let end = buf.iter().position(|&c| c == 0).unwrap_or(buf.len());
                let text: String = buf[..end]
                    .iter()
                    .map(|&c| char::from_u32(c).unwrap_or('\u{FFFD}'))
                    .collect();
                serde_json::json!(text)
            }
        }
    }
}

fn status_name(status: Status) -> ExpectedStatus {
    match status {
        Status::Completed => ExpectedStatus::Completed,
        Status::MatchFailure => ExpectedStatus::MatchFailure,
        Status::InputFailure => ExpectedStatus::InputFailure,
        Status::FormatError => ExpectedStatus::FormatError,
        Status::CapacityError => ExpectedStatus::CapacityError,
    }
}

/// Runs a fixture set against the engine and collects verification results.
pub struct TestRunner {
    /// Name of the test campaign.
    pub campaign: String,
    /// Binding mode being exercised.
    pub mode: CaseMode,
}

impl TestRunner {
    /// Create a new test runner. `mode` should be `Classic` or `Checked`;
    /// cases marked `Both` run under either.
    #[must_use]
    pub fn new(campaign: impl Into<String>, mode: CaseMode) -> Self {
        Self {
            campaign: campaign.into(),
            mode,
        }
    }

    /// Run all applicable fixtures in a set and return results.
    pub fn run(&self, fixture_set: &FixtureSet) -> Vec<VerificationResult> {
        fixture_set
            .cases
            .iter()
            .filter(|case| mode_matches(self.mode, case.mode))
            .map(|case| self.run_case(case))
            .collect()
    }

    fn run_case(&self, case: &FixtureCase) -> VerificationResult {
        let scanner = match self.mode {
            CaseMode::Checked => Scanner::checked(),
            _ => Scanner::new(),
        };

        let mut cells: Vec<Cell> = case.slots.iter().map(|&spec| Cell::new(spec)).collect();
        let mut slots: Vec<Slot<'_>> = cells.iter_mut().map(Cell::as_slot).collect();
        let report = scanner.scan_bytes(case.input.as_bytes(), &case.template, &mut slots);
        drop(slots);

        let actual_values: Vec<serde_json::Value> = cells.iter().map(Cell::value).collect();
        let actual = serde_json::json!({
            "count": report.count(),
            "status": status_name(report.status),
            "values": actual_values,
        });
        let expected = serde_json::json!({
            "count": case.expected.count,
            "status": case.expected.status,
            "values": if case.expected.values.is_empty() {
                actual_values.clone()
            } else {
                case.expected.values.clone()
            },
        });

        let expected_text = expected.to_string();
        let actual_text = actual.to_string();
        let passed = expected == actual;
        let case_name = if case.mode == CaseMode::Both {
            format!("{} [{:?}]", case.name, self.mode)
        } else {
            case.name.clone()
        };
        VerificationResult {
            case_name,
            passed,
            diff: diff::first_divergence(&expected_text, &actual_text),
            expected: expected_text,
            actual: actual_text,
        }
    }
}

fn mode_matches(active: CaseMode, case: CaseMode) -> bool {
    case == CaseMode::Both || case == active
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::Expectation;

    fn one_case(template: &str, input: &str, slots: Vec<SlotSpec>, expected: Expectation) -> FixtureSet {
        FixtureSet {
            version: "1".to_string(),
            family: "unit".to_string(),
            cases: vec![FixtureCase {
                name: "case".to_string(),
                template: template.to_string(),
                input: input.to_string(),
                slots,
                expected,
                mode: CaseMode::Both,
            }],
        }
    }

    #[test]
    fn test_passing_case() {
        let set = one_case(
            "%d",
            "42",
            vec![SlotSpec::I32],
            Expectation {
                count: 1,
                status: ExpectedStatus::Completed,
                values: vec![serde_json::json!(42)],
            },
        );
        let results = TestRunner::new("unit", CaseMode::Classic).run(&set);
        assert_eq!(results.len(), 1);
        assert!(results[0].passed, "diff: {:?}", results[0].diff);
    }

    #[test]
    fn test_failing_case_carries_diff() {
        let set = one_case(
            "%d",
            "42",
            vec![SlotSpec::I32],
            Expectation {
                count: 1,
                status: ExpectedStatus::Completed,
                values: vec![serde_json::json!(41)],
            },
        );
        let results = TestRunner::new("unit", CaseMode::Classic).run(&set);
        assert!(!results[0].passed);
        assert!(results[0].diff.is_some());
    }

    #[test]
    fn test_mode_filter() {
        let mut set = one_case(
            "%d",
            "42",
            vec![SlotSpec::I32],
            Expectation {
                count: 1,
                status: ExpectedStatus::Completed,
                values: vec![],
            },
        );
        set.cases[0].mode = CaseMode::Checked;
        let results = TestRunner::new("unit", CaseMode::Classic).run(&set);
        assert!(results.is_empty());
        let results = TestRunner::new("unit", CaseMode::Checked).run(&set);
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_buffer_readback() {
        let set = one_case(
            "%s",
            "hello",
            vec![SlotSpec::Bytes { len: 8 }],
            Expectation {
                count: 1,
                status: ExpectedStatus::Completed,
                values: vec![serde_json::json!("hello")],
            },
        );
        let results = TestRunner::new("unit", CaseMode::Classic).run(&set);
        assert!(results[0].passed, "diff: {:?}", results[0].diff);
    }
}

//! Runs the checked-in fixture set under both binding modes.

use std::path::Path;

use scanform_harness::fixtures::{CaseMode, FixtureSet};
use scanform_harness::runner::TestRunner;
use scanform_harness::verify::summarize;

fn load_core_fixtures() -> FixtureSet {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join("scan_core.json");
    FixtureSet::from_file(&path).expect("fixture file loads")
}

#[test]
fn core_fixtures_pass_in_classic_mode() {
    let set = load_core_fixtures();
    let results = TestRunner::new(set.family.clone(), CaseMode::Classic).run(&set);
    let failed: Vec<_> = results.iter().filter(|r| !r.passed).collect();
    assert!(
        failed.is_empty(),
        "failing cases: {:#?}",
        failed
            .iter()
            .map(|r| (&r.case_name, &r.diff))
            .collect::<Vec<_>>()
    );
}

#[test]
fn core_fixtures_pass_in_checked_mode() {
    let set = load_core_fixtures();
    let results = TestRunner::new(set.family.clone(), CaseMode::Checked).run(&set);
    let summary = summarize(&results);
    assert_eq!(summary.failed, 0, "results: {results:#?}");
    // Every case is applicable in checked mode for this set.
    assert_eq!(summary.total, set.cases.len());
}

#[test]
fn fixture_file_round_trips_through_serde() {
    let set = load_core_fixtures();
    let json = set.to_json().expect("serializes");
    let back = FixtureSet::from_json(&json).expect("parses");
    assert_eq!(back.cases.len(), set.cases.len());
}

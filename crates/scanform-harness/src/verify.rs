//! Verification results and report generation.

/// Outcome of one fixture case.
#[derive(Debug, Clone)]
pub struct VerificationResult {
    /// Case identifier (with the active mode appended for `both` cases).
    pub case_name: String,
    /// Whether actual matched expected.
    pub passed: bool,
    /// Expected outcome, serialized.
    pub expected: String,
    /// Actual outcome, serialized.
    pub actual: String,
    /// First divergence between expected and actual, when failed.
    pub diff: Option<String>,
}

/// Aggregated pass/fail counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
}

#[must_use]
pub fn summarize(results: &[VerificationResult]) -> Summary {
    let passed = results.iter().filter(|r| r.passed).count();
    Summary {
        total: results.len(),
        passed,
        failed: results.len() - passed,
    }
}

/// Renders a markdown verification report.
#[must_use]
pub fn report_markdown(campaign: &str, mode: &str, results: &[VerificationResult]) -> String {
    let summary = summarize(results);
    let mut out = String::new();
    out.push_str(&format!("# Verification report: {campaign}\n\n"));
    out.push_str(&format!("Mode: `{mode}`\n\n"));
    out.push_str(&format!(
        "Total: {} | Passed: {} | Failed: {}\n\n",
        summary.total, summary.passed, summary.failed
    ));
    out.push_str("| Case | Result |\n|---|---|\n");
    for result in results {
        let verdict = if result.passed { "pass" } else { "FAIL" };
        out.push_str(&format!("| {} | {} |\n", result.case_name, verdict));
    }
    let failures: Vec<&VerificationResult> = results.iter().filter(|r| !r.passed).collect();
    if !failures.is_empty() {
        out.push_str("\n## Failures\n");
        for failure in failures {
            out.push_str(&format!("\n### {}\n\n", failure.case_name));
            out.push_str(&format!("- expected: `{}`\n", failure.expected));
            out.push_str(&format!("- actual:   `{}`\n", failure.actual));
            if let Some(diff) = &failure.diff {
                out.push_str(&format!("- diff: {diff}\n"));
            }
        }
    }
    out
}

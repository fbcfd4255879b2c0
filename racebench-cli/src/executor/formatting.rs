//! Output Formatting
//!
//! Human-readable output formatting for run reports.
//!
//! Generates terminal-friendly output with:
//! - One ranked table per suite, fastest first, reference marked
//! - Margin of error and percentages against the fastest and the reference
//! - Status icons for failed (✗) and skipped (⊘) cases, with failure reasons
//! - The execution order actually used, for reproducing ordering effects

use racebench_report::{Report, RowStatus, SuiteReport, format_ops, format_pct};

/// Format a report for human-readable terminal display
pub fn format_human_output(report: &Report) -> String {
    let mut output = String::new();

    for suite in &report.suites {
        format_suite(&mut output, suite);
    }

    // Summary
    output.push_str("\nSummary\n");
    output.push_str(&"-".repeat(60));
    output.push('\n');
    output.push_str(&format!(
        "  Suites: {}  Cases: {}  Ok: {}  Failed: {}  Skipped: {}\n",
        report.summary.total_suites,
        report.summary.total_cases,
        report.summary.succeeded,
        report.summary.failed,
        report.summary.skipped
    ));
    output.push_str(&format!(
        "  Duration: {:.2} ms\n",
        report.summary.total_duration_ms
    ));

    output
}

fn format_suite(output: &mut String, suite: &SuiteReport) {
    output.push_str(&format!("\nSuite: {}\n", suite.name));
    output.push_str(&"-".repeat(60));
    output.push('\n');

    if suite.ranking.is_empty() {
        output.push_str("  (no cases)\n");
        return;
    }

    // Find max case name length for alignment
    let max_name_len = suite
        .ranking
        .rows
        .iter()
        .map(|r| r.name.len() + if r.is_reference { 6 } else { 0 })
        .max()
        .unwrap_or(20)
        .max(4);

    output.push_str(&format!(
        "  {:>3}  {:<width$}  {:>22}  {:>8}  {:>11}  {:>12}\n",
        "#",
        "Case",
        "Throughput",
        "±",
        "vs fastest",
        "vs reference",
        width = max_name_len
    ));
    output.push_str(&format!("  {}\n", "-".repeat(max_name_len + 66)));

    for row in &suite.ranking.rows {
        let name = if row.is_reference {
            format!("{} (ref)", row.name)
        } else {
            row.name.clone()
        };

        match row.status {
            RowStatus::Ok => {
                output.push_str(&format!(
                    "  {:>3}  {:<width$}  {:>22}  {:>8}  {:>11}  {:>12}\n",
                    row.rank.map(|r| r.to_string()).unwrap_or_default(),
                    name,
                    row.ops_per_sec.map(format_ops).unwrap_or_default(),
                    row.margin_of_error_pct
                        .map(|m| format!("±{:.2}%", m))
                        .unwrap_or_default(),
                    row.relative_to_fastest_pct.map(format_pct).unwrap_or_default(),
                    row.relative_to_reference_pct
                        .map(format_pct)
                        .unwrap_or_else(|| "-".to_string()),
                    width = max_name_len
                ));
                if let Some(warning) = row.summary.as_ref().and_then(|s| s.warning.as_ref()) {
                    output.push_str(&format!("       warning: {}\n", warning));
                }
            }
            RowStatus::Failed => {
                let reason = row
                    .failure
                    .as_ref()
                    .map(|f| format!("{}: {}", f.kind, f.message))
                    .unwrap_or_else(|| "failed".to_string());
                output.push_str(&format!(
                    "  {:>3}  {:<width$}  failed ({})\n",
                    "✗",
                    name,
                    reason,
                    width = max_name_len
                ));
            }
            RowStatus::Skipped => {
                output.push_str(&format!(
                    "  {:>3}  {:<width$}  skipped\n",
                    "⊘",
                    name,
                    width = max_name_len
                ));
            }
        }
    }

    if suite.ranking.no_successful_candidates {
        output.push_str("  No successful candidates.\n");
    }
    if !suite.execution_order.is_empty() {
        output.push_str(&format!(
            "  Execution order: {}\n",
            suite.execution_order.join(" → ")
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::{RunOptions, build_report};
    use racebench_core::Sample;
    use racebench_report::{CaseResult, FailureInfo, rank};
    use racebench_stats::summarize;

    #[test]
    fn test_human_table() {
        let a = summarize(&[Sample::timing_only(1, 1_000_000); 3], 0.95).unwrap();
        let b = summarize(&[Sample::timing_only(2, 1_000_000); 3], 0.95).unwrap();
        let results = vec![
            CaseResult::measured("A", 0, true, a),
            CaseResult::measured("B", 1, false, b),
            CaseResult::failed("C", 2, false, FailureInfo::new("execution", "boom")),
            CaseResult::skipped("D", 3, false),
        ];
        let suite = SuiteReport {
            name: "Simple object".to_string(),
            execution_order: vec!["B".into(), "C".into(), "A".into()],
            ranking: rank("Simple object", &results),
            duration_ms: 1.0,
        };
        let report = build_report(vec![suite], 1, &RunOptions::default());
        let output = format_human_output(&report);

        assert!(output.contains("Suite: Simple object"));
        assert!(output.contains("2,000 ops/sec"));
        assert!(output.contains("+100.00%"));
        assert!(output.contains("A (ref)"));
        assert!(output.contains("failed (execution: boom)"));
        assert!(output.contains("skipped"));
        assert!(output.contains("Execution order: B → C → A"));

        let b_line = output.lines().position(|l| l.contains("2,000 ops/sec")).unwrap();
        let a_line = output.lines().position(|l| l.contains("1,000 ops/sec")).unwrap();
        assert!(b_line < a_line);
    }

    #[test]
    fn test_no_successes_marker() {
        let results = vec![CaseResult::failed("x", 0, false, FailureInfo::new("timeout", "slow"))];
        let suite = SuiteReport {
            name: "broken".to_string(),
            execution_order: vec!["x".into()],
            ranking: rank("broken", &results),
            duration_ms: 1.0,
        };
        let output = format_human_output(&build_report(vec![suite], 1, &RunOptions::default()));
        assert!(output.contains("No successful candidates."));
    }
}

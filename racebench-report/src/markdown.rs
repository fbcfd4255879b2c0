//! Markdown Output
//!
//! One table per suite, suitable for a PR comment or `$GITHUB_STEP_SUMMARY`.

use crate::format::{format_ops, format_pct};
use crate::ranking::RowStatus;
use crate::report::Report;

/// Generate a Markdown report
pub fn generate_markdown_report(report: &Report) -> String {
    let mut output = String::new();

    output.push_str("# racebench results\n\n");
    output.push_str(&format!(
        "racebench {} · {} · {}/{} · {} ({} cores) · seed `{}`\n\n",
        report.meta.version,
        report.meta.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
        report.meta.system.os,
        report.meta.system.arch,
        report.meta.system.cpu,
        report.meta.system.cpu_cores,
        report.meta.seed,
    ));

    for suite in &report.suites {
        output.push_str(&format!("## {}\n\n", suite.name));

        if suite.ranking.is_empty() {
            output.push_str("_No cases registered._\n\n");
            continue;
        }

        output.push_str("| # | Case | ops/sec | ± | vs fastest | vs reference | Status |\n");
        output.push_str("|---|------|--------:|--:|-----------:|-------------:|--------|\n");

        for row in &suite.ranking.rows {
            let escaped = row.name.replace('|', "\\|");
            let name = if row.is_reference {
                format!("**{}** (ref)", escaped)
            } else {
                escaped
            };
            let status = match (&row.status, &row.failure) {
                (RowStatus::Failed, Some(f)) => format!("failed ({}): {}", f.kind, f.message),
                (status, _) => status.as_str().to_string(),
            };
            output.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} | {} |\n",
                row.rank.map(|r| r.to_string()).unwrap_or_default(),
                name,
                row.ops_per_sec.map(format_ops).unwrap_or_default(),
                row.margin_of_error_pct
                    .map(|m| format!("{:.2}%", m))
                    .unwrap_or_default(),
                row.relative_to_fastest_pct.map(format_pct).unwrap_or_default(),
                row.relative_to_reference_pct
                    .map(format_pct)
                    .unwrap_or_else(|| "n/a".to_string()),
                status.replace('|', "\\|"),
            ));
        }

        if suite.ranking.no_successful_candidates {
            output.push_str("\n**No successful candidates.**\n");
        }
        output.push('\n');
    }

    output
}

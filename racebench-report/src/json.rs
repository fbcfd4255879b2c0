//! JSON Output

use crate::ranking::Ranking;
use crate::report::Report;

/// Generate a prettified JSON report.
///
/// Absent relative percentages serialize as `null`.
pub fn generate_json_report(report: &Report) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

/// Serialize a single ranking
pub fn generate_json_ranking(ranking: &Ranking) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(ranking)
}

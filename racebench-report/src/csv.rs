//! CSV Output
//!
//! One line per ranked row across all suites. Empty fields mean "absent".

use crate::report::Report;

const HEADER: &str = "suite,rank,name,status,is_reference,ops_per_sec,margin_of_error_pct,\
relative_to_fastest_pct,relative_to_reference_pct,samples,failure_kind,failure_message";

/// Generate a CSV report
pub fn generate_csv_report(report: &Report) -> String {
    let mut output = String::from(HEADER);
    output.push('\n');

    for suite in &report.suites {
        for row in &suite.ranking.rows {
            let fields = [
                escape(&suite.name),
                opt(row.rank),
                escape(&row.name),
                row.status.as_str().to_string(),
                row.is_reference.to_string(),
                opt_f64(row.ops_per_sec, 2),
                opt_f64(row.margin_of_error_pct, 4),
                opt_f64(row.relative_to_fastest_pct, 4),
                opt_f64(row.relative_to_reference_pct, 4),
                opt(row.summary.as_ref().map(|s| s.sample_count)),
                escape(row.failure.as_ref().map_or("", |f| f.kind.as_str())),
                escape(row.failure.as_ref().map_or("", |f| f.message.as_str())),
            ];
            output.push_str(&fields.join(","));
            output.push('\n');
        }
    }

    output
}

fn opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn opt_f64(value: Option<f64>, precision: usize) -> String {
    value
        .map(|v| format!("{:.*}", precision, v))
        .unwrap_or_default()
}

/// Quote a field when it contains a delimiter, quote or newline
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("plain"), "plain");
        assert_eq!(escape("a,b"), "\"a,b\"");
        assert_eq!(escape("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_optional_fields() {
        assert_eq!(opt::<usize>(None), "");
        assert_eq!(opt(Some(3)), "3");
        assert_eq!(opt_f64(Some(1.23456), 2), "1.23");
        assert_eq!(opt_f64(None, 2), "");
    }
}

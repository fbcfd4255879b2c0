//! Number Formatting

/// Throughput with thousands separators, e.g. `1,234,567 ops/sec`
pub fn format_ops(ops_per_sec: f64) -> String {
    format!("{} ops/sec", group_thousands(ops_per_sec.round() as u64))
}

/// Signed percentage, e.g. `+12.34%`, `-50.00%`, `0.00%`
pub fn format_pct(pct: f64) -> String {
    if pct.abs() < 0.005 {
        "0.00%".to_string()
    } else {
        format!("{:+.2}%", pct)
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

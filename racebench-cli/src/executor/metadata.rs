//! System Metadata Collection
//!
//! Collects system information for report metadata and the run banner.
//!
//! ## Collected Data
//!
//! - **OS**: Operating system name and architecture
//! - **CPU**: Model name and core count
//! - **Memory**: Total system RAM in GB
//! - **Timestamp**: UTC time of report generation
//! - **Seed**: ordering generator seed, so a run's case order can be replayed
//!
//! Linux-specific data (CPU model, memory) gracefully degrades on other
//! platforms, returning "Unknown" or 0 values.

use super::execution::RunOptions;
use chrono::Utc;
use racebench_report::{ReportConfig, ReportMeta, SCHEMA_VERSION, SystemInfo};

/// Build report metadata for a run
pub fn build_report_meta(seed: u64, options: &RunOptions) -> ReportMeta {
    let system = SystemInfo {
        os: std::env::consts::OS.to_string(),
        arch: std::env::consts::ARCH.to_string(),
        cpu: get_cpu_model().unwrap_or_else(|| "Unknown".to_string()),
        cpu_cores: num_cpus(),
        memory_gb: get_memory_gb().unwrap_or(0.0),
    };

    ReportMeta {
        schema_version: SCHEMA_VERSION,
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        seed,
        system,
        config: ReportConfig {
            time_budget_ms: millis(options.time_budget),
            min_samples: options.min_samples,
            max_wall_clock_ms: millis(options.max_wall_clock),
            batch_target_ms: millis(options.batch_target),
            warmup_batches: options.warmup_batches,
            suite_timeout_ms: options.suite_timeout.map(millis),
            confidence_level: options.confidence_level,
            pin_cpu: options.pin_cpu,
        },
    }
}

/// Banner printed before human output
pub fn format_banner(meta: &ReportMeta) -> String {
    let mut output = String::new();
    output.push_str(&"=".repeat(60));
    output.push('\n');
    output.push_str(&format!("  racebench v{}\n", meta.version));
    output.push_str(&"=".repeat(60));
    output.push('\n');
    output.push_str(&format!(
        "  Platform: {} {}\n",
        meta.system.os, meta.system.arch
    ));
    output.push_str(&format!(
        "  CPU: {} ({} cores)\n",
        meta.system.cpu, meta.system.cpu_cores
    ));
    if meta.system.memory_gb > 0.0 {
        output.push_str(&format!("  Memory: {:.1} GB\n", meta.system.memory_gb));
    }
    output.push_str(&format!(
        "  Date: {}\n",
        meta.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    output.push_str(&format!("  Seed: {}\n", meta.seed));
    output.push_str(&format!(
        "  Budget: {} ms/case, min {} samples, {:.0}% confidence\n",
        meta.config.time_budget_ms,
        meta.config.min_samples,
        meta.config.confidence_level * 100.0
    ));
    output.push_str(&"=".repeat(60));
    output.push('\n');
    output
}

fn millis(d: std::time::Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// Get CPU model name from /proc/cpuinfo (Linux only)
fn get_cpu_model() -> Option<String> {
    #[cfg(target_os = "linux")]
    {
        std::fs::read_to_string("/proc/cpuinfo")
            .ok()
            .and_then(|content| {
                content
                    .lines()
                    .find(|l| l.starts_with("model name"))
                    .and_then(|l| l.split(':').nth(1))
                    .map(|s| s.trim().to_string())
            })
    }
    #[cfg(not(target_os = "linux"))]
    {
        None
    }
}

/// Get number of available CPU cores
fn num_cpus() -> u32 {
    std::thread::available_parallelism()
        .map(|n| n.get() as u32)
        .unwrap_or(1)
}

/// Get total system memory in GB (Linux only)
fn get_memory_gb() -> Option<f64> {
    #[cfg(target_os = "linux")]
    {
        std::fs::read_to_string("/proc/meminfo")
            .ok()
            .and_then(|content| {
                content
                    .lines()
                    .find(|l| l.starts_with("MemTotal"))
                    .and_then(|l| {
                        l.split_whitespace()
                            .nth(1)
                            .and_then(|s| s.parse::<u64>().ok())
                    })
                    .map(|kb| kb as f64 / 1024.0 / 1024.0)
            })
    }
    #[cfg(not(target_os = "linux"))]
    {
        None
    }
}

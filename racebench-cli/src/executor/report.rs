//! Report Building
//!
//! Runs a batch of suites with one scheduler and assembles the [`Report`].
//!
//! ```text
//! Vec<Suite> ──► Scheduler::run_suite (per suite, same generator)
//!                        │
//!                        ▼
//!                 Vec<SuiteReport> + ReportMeta (seed, system, options)
//!                        │
//!                        ▼
//!                     Report
//! ```

use super::execution::{RunOptions, Scheduler};
use super::metadata::build_report_meta;
use racebench_core::Suite;
use racebench_report::{Report, SuiteReport};

/// Run every suite in order and build the report.
///
/// The scheduler's generator is shared, so suite orderings are independent
/// of each other but reproducible from the scheduler's seed.
pub fn run_suites(suites: &mut [Suite], scheduler: &mut Scheduler, options: &RunOptions) -> Report {
    let reports = suites
        .iter_mut()
        .map(|suite| scheduler.run_suite(suite, options))
        .collect();
    build_report(reports, scheduler.seed(), options)
}

/// Assemble a report from finished suites
pub fn build_report(suites: Vec<SuiteReport>, seed: u64, options: &RunOptions) -> Report {
    Report::new(build_report_meta(seed, options), suites)
}

#[cfg(test)]
mod tests {
    use super::*;
    use racebench_core::{ExecutionError, from_fn};
    use std::time::Duration;

    #[test]
    fn test_report_over_suites() {
        let options = RunOptions {
            time_budget: Duration::ZERO,
            min_samples: 1,
            batch_target: Duration::from_micros(20),
            warmup_batches: 0,
            show_progress: false,
            ..RunOptions::default()
        };
        let mut suites = vec![
            Suite::new("good").case("sum", from_fn(|| (0..10u32).sum::<u32>())).unwrap(),
            Suite::new("bad")
                .case("fails", || Err::<(), _>(ExecutionError::raised("always")))
                .unwrap(),
        ];

        let report = run_suites(&mut suites, &mut Scheduler::new(11), &options);
        assert_eq!(report.meta.seed, 11);
        assert_eq!(report.suites.len(), 2);
        assert_eq!(report.summary.succeeded, 1);
        assert_eq!(report.summary.failed, 1);
        assert_eq!(report.summary.suites_without_success, 1);
        assert!(report.has_unsuccessful_suite());
    }
}

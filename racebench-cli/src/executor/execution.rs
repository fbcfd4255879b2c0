//! Suite Execution
//!
//! The [`Scheduler`] runs a suite's cases one at a time in a random order:
//!
//! ```text
//!        Suite (registration order)
//!              │
//!              ▼
//!   ┌─────────────────────┐
//!   │  shuffle (StdRng)   │  one generator per process, seeded once
//!   └──────────┬──────────┘
//!              │
//!              ▼
//!   ┌─────────────────────┐
//!   │  Sampler per case   │  strictly sequential; failures recorded, run continues
//!   └──────────┬──────────┘
//!              │
//!              ▼
//!   ┌─────────────────────┐
//!   │  summarize (rayon)  │  post-measurement only
//!   └──────────┬──────────┘
//!              │
//!              ▼
//!   SuiteRun (registration order + execution order)
//! ```
//!
//! Ordering is randomized because a fixed order systematically favours (or
//! penalises) later cases through warm caches and allocator state.

use super::statistics::{CaseMeasurement, RawOutcome, compute_statistics};
use indicatif::{ProgressBar, ProgressStyle};
use racebench_core::{SamplerConfig, Suite, measure, pin_to_cpu};
use racebench_report::{CaseResult, FailureInfo, Ranking, SuiteReport, rank};
use racebench_stats::{DEFAULT_CONFIDENCE_LEVEL, is_valid_confidence};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Settings for running suites
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Measurement time per case
    pub time_budget: Duration,
    /// Minimum samples per case (floor 1)
    pub min_samples: usize,
    /// Hard ceiling per case
    pub max_wall_clock: Duration,
    /// Preferred batch duration
    pub batch_target: Duration,
    /// Discarded batches after calibration
    pub warmup_batches: u32,
    /// Deadline for the whole suite
    pub suite_timeout: Option<Duration>,
    /// Confidence level for the margin of error, in (0, 1); anything else
    /// falls back to the default with a warning
    pub confidence_level: f64,
    /// CPU to pin the calling thread to while a suite runs; the previous
    /// affinity is restored afterwards
    pub pin_cpu: Option<usize>,
    /// Draw a progress bar
    pub show_progress: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        let sampler = SamplerConfig::default();
        Self {
            time_budget: sampler.time_budget,
            min_samples: sampler.min_samples,
            max_wall_clock: sampler.max_wall_clock,
            batch_target: sampler.batch_target,
            warmup_batches: sampler.warmup_batches,
            suite_timeout: None,
            confidence_level: DEFAULT_CONFIDENCE_LEVEL,
            pin_cpu: None,
            show_progress: true,
        }
    }
}

impl RunOptions {
    /// Sampler settings for one case
    pub fn sampler_config(&self, deadline: Option<Instant>) -> SamplerConfig {
        SamplerConfig {
            time_budget: self.time_budget,
            min_samples: self.min_samples,
            max_wall_clock: self.max_wall_clock,
            batch_target: self.batch_target,
            warmup_batches: self.warmup_batches,
            deadline,
        }
    }
}

/// Outcome of one suite run
#[derive(Debug, Clone)]
pub struct SuiteRun {
    /// Suite name
    pub suite: String,
    /// Case names in the order drawn for this run; cancelled cases keep their slot
    pub execution_order: Vec<String>,
    /// One result per case, in registration order
    pub results: Vec<CaseResult>,
    /// Wall-clock time of the run
    pub duration: Duration,
}

impl SuiteRun {
    /// Rank the results
    pub fn ranking(&self) -> Ranking {
        rank(&self.suite, &self.results)
    }

    /// Convert into the report form
    pub fn into_report(self) -> SuiteReport {
        let ranking = self.ranking();
        SuiteReport {
            name: self.suite,
            execution_order: self.execution_order,
            ranking,
            duration_ms: self.duration.as_secs_f64() * 1000.0,
        }
    }
}

/// Runs suites in a randomized, reproducible order
pub struct Scheduler {
    rng: StdRng,
    seed: u64,
}

impl Scheduler {
    /// Scheduler whose orderings are reproducible from `seed`
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Scheduler with a random seed
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// Seed the generator was created with
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Draw the next execution order for `suite`: positions into
    /// [`Suite::cases`], skipped cases excluded.
    ///
    /// Advances the generator, so consecutive suites get independent orders.
    pub fn execution_order(&mut self, suite: &Suite) -> Vec<usize> {
        let mut order: Vec<usize> = suite
            .cases()
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.is_skipped())
            .map(|(i, _)| i)
            .collect();
        order.shuffle(&mut self.rng);
        order
    }

    /// Run every case of `suite` and summarize the measurements
    pub fn run(&mut self, suite: &mut Suite, options: &RunOptions) -> SuiteRun {
        let started = Instant::now();
        let deadline = options.suite_timeout.and_then(|t| started.checked_add(t));
        let order = self.execution_order(suite);
        let suite_name = suite.name().to_string();

        info!(suite = %suite_name, cases = suite.len(), "running suite");

        // Held until the suite finishes; dropping it restores the affinity
        let _pin = options.pin_cpu.and_then(|cpu| match pin_to_cpu(cpu) {
            Ok(pin) => Some(pin),
            Err(e) => {
                warn!(cpu, error = %e, "failed to pin measuring thread");
                None
            }
        });

        let pb = progress_bar(order.len(), options.show_progress);
        let mut measurements = Vec::with_capacity(suite.len());
        let mut execution_order = Vec::with_capacity(order.len());

        for &position in &order {
            let case = &mut suite.cases_mut()[position];
            let name = case.name().to_string();
            execution_order.push(name.clone());
            pb.set_message(name.clone());

            let outcome = if deadline.is_some_and(|d| Instant::now() >= d) {
                warn!(suite = %suite_name, case = %name, "suite timeout reached; case cancelled");
                RawOutcome::Failed(FailureInfo::cancelled(format!(
                    "suite timeout of {} ms reached before the case started",
                    options.suite_timeout.map_or(0, |t| t.as_millis())
                )))
            } else {
                debug!(suite = %suite_name, case = %name, "measuring");
                match measure(case.work_mut(), &options.sampler_config(deadline)) {
                    Ok(measurement) => {
                        debug!(
                            case = %name,
                            samples = measurement.samples.len(),
                            batch = measurement.iterations_per_batch,
                            "measured"
                        );
                        RawOutcome::Measured(measurement)
                    }
                    Err(e) => {
                        warn!(suite = %suite_name, case = %name, kind = e.kind(), error = %e, "case failed");
                        RawOutcome::Failed(FailureInfo::from(&e))
                    }
                }
            };

            measurements.push(CaseMeasurement {
                name,
                index: case.index(),
                is_reference: case.is_reference(),
                outcome,
            });
            pb.inc(1);
        }

        pb.finish_and_clear();

        for case in suite.cases().iter().filter(|c| c.is_skipped()) {
            measurements.push(CaseMeasurement {
                name: case.name().to_string(),
                index: case.index(),
                is_reference: case.is_reference(),
                outcome: RawOutcome::Skipped,
            });
        }

        let mut results = compute_statistics(measurements, confidence_level(options));
        results.sort_by_key(|r| r.index);

        SuiteRun {
            suite: suite_name,
            execution_order,
            results,
            duration: started.elapsed(),
        }
    }

    /// Run `suite` and rank it
    pub fn run_suite(&mut self, suite: &mut Suite, options: &RunOptions) -> SuiteReport {
        self.run(suite, options).into_report()
    }
}

fn confidence_level(options: &RunOptions) -> f64 {
    let level = options.confidence_level;
    if is_valid_confidence(level) {
        return level;
    }
    warn!(
        level,
        fallback = DEFAULT_CONFIDENCE_LEVEL,
        "confidence level outside (0, 1); using default"
    );
    DEFAULT_CONFIDENCE_LEVEL
}

fn progress_bar(len: usize, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use racebench_core::{ExecutionError, from_fn};
    use racebench_report::{CaseOutcome, RowStatus};

    fn quick() -> RunOptions {
        RunOptions {
            time_budget: Duration::ZERO,
            min_samples: 2,
            max_wall_clock: Duration::from_secs(10),
            batch_target: Duration::from_micros(20),
            warmup_batches: 0,
            show_progress: false,
            ..RunOptions::default()
        }
    }

    fn suite_of(n: usize) -> Suite {
        let mut suite = Suite::new("order");
        for i in 0..n {
            suite
                .add_case(format!("case-{}", i), from_fn(move || i * 2))
                .unwrap();
        }
        suite
    }

    #[test]
    fn test_same_seed_same_order() {
        let suite = suite_of(6);
        let mut a = Scheduler::new(1234);
        let mut b = Scheduler::new(1234);
        for _ in 0..3 {
            assert_eq!(a.execution_order(&suite), b.execution_order(&suite));
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let suite = suite_of(5);
        let orders: std::collections::HashSet<Vec<usize>> = (0..10)
            .map(|seed| Scheduler::new(seed).execution_order(&suite))
            .collect();
        assert!(orders.len() > 1);
    }

    #[test]
    fn test_order_is_permutation() {
        let suite = suite_of(8);
        let mut order = Scheduler::new(9).execution_order(&suite);
        order.sort_unstable();
        assert_eq!(order, (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn test_skipped_cases_not_run() {
        let mut suite = suite_of(2);
        suite
            .add_skipped_case("never", || -> Result<(), ExecutionError> {
                panic!("skipped case executed")
            })
            .unwrap();

        let run = Scheduler::new(1).run(&mut suite, &quick());
        assert_eq!(run.results.len(), 3);
        assert_eq!(run.execution_order.len(), 2);
        assert!(run.results[2].is_skipped());
        assert_eq!(run.ranking().rows[2].status, RowStatus::Skipped);
    }

    #[test]
    fn test_failure_does_not_stop_run() {
        let mut suite = Suite::new("mixed");
        suite
            .add_reference_case("ok", from_fn(|| 3 * 7))
            .unwrap()
            .add_case("raises", || Err::<(), _>(ExecutionError::raised("bad")))
            .unwrap()
            .add_case("panics", || -> Result<(), ExecutionError> { panic!("kaboom") })
            .unwrap();

        let run = Scheduler::new(5).run(&mut suite, &quick());
        assert!(run.results[0].is_success());
        assert_eq!(run.results[1].failure().unwrap().kind, "execution");
        assert_eq!(run.results[2].failure().unwrap().kind, "panic");

        let report = run.into_report();
        assert_eq!(report.ranking.rows[0].name, "ok");
        assert_eq!(report.ranking.rows[0].relative_to_reference_pct, Some(0.0));
    }

    #[test]
    fn test_suite_timeout_cancels_remaining() {
        let mut suite = suite_of(3);
        let options = RunOptions {
            suite_timeout: Some(Duration::ZERO),
            ..quick()
        };
        let run = Scheduler::new(3).run(&mut suite, &options);
        for result in &run.results {
            match &result.outcome {
                CaseOutcome::Failed(f) => assert_eq!(f.kind, "cancelled"),
                other => panic!("expected cancellation, got {:?}", other),
            }
        }
        assert!(run.ranking().no_successful_candidates);
    }

    #[test]
    fn test_out_of_range_confidence_falls_back_to_default() {
        let mut suite = suite_of(2);
        let options = RunOptions {
            confidence_level: 95.0,
            ..quick()
        };
        let run = Scheduler::new(8).run(&mut suite, &options);
        for result in &run.results {
            let summary = result.summary().unwrap();
            assert_eq!(summary.confidence_level, DEFAULT_CONFIDENCE_LEVEL);
            assert!(!summary.warning.as_deref().unwrap_or("").contains("confidence level"));
        }
    }

    #[test]
    fn test_empty_suite() {
        let mut suite = Suite::new("nothing");
        let report = Scheduler::new(0).run_suite(&mut suite, &quick());
        assert!(report.ranking.is_empty());
        assert!(report.execution_order.is_empty());
        assert!(report.ranking.no_successful_candidates);
    }
}

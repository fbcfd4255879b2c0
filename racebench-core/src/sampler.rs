//! Sampler - Adaptive Batch Measurement
//!
//! Timing a single call is dominated by clock resolution for fast candidates,
//! so the sampler times batches instead:
//!
//! 1. **Calibration**: run batches of 1, then geometrically more iterations
//!    until one batch lasts the target batch duration. Discarded.
//! 2. **Warm-up**: `warmup_batches` batches at the calibrated size. Discarded.
//! 3. **Measurement**: batches at the calibrated size, one [`Sample`] each,
//!    until `min_samples` exist *and* `time_budget` has elapsed.
//!
//! A per-case ceiling (`max_wall_clock`, counted from the start of
//! calibration) and an optional suite deadline bound the whole process. They
//! are only checked between batches; a started batch always completes. When
//! a calibrated batch no longer fits before the limit and samples are still
//! missing, the batch shrinks to what fits (at least one invocation).

use crate::error::{ExecutionError, MeasureError};
use crate::measure::Timer;
use crate::sample::Sample;
use crate::work::Work;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::{Duration, Instant};

/// Smallest batch duration the calibration aims for (clock-resolution floor)
pub const MIN_BATCH_NS: u64 = 10_000;

/// Upper bound on iterations per batch
pub const MAX_BATCH_ITERATIONS: u64 = 1 << 40;

/// Default target duration of one batch
pub const DEFAULT_BATCH_TARGET: Duration = Duration::from_millis(50);

/// Default minimum number of samples
pub const DEFAULT_MIN_SAMPLES: usize = 5;

const MIN_GROWTH: u64 = 2;
const MAX_GROWTH: u64 = 16;
// Overshoot so the batch after the last calibration step reliably clears the target
const GROWTH_HEADROOM: f64 = 1.25;

/// Sampler settings for one case
#[derive(Debug, Clone)]
pub struct SamplerConfig {
    /// Measurement-phase time budget
    pub time_budget: Duration,
    /// Minimum samples, enforced even when the budget is zero (floor 1)
    pub min_samples: usize,
    /// Hard ceiling for the whole case, calibration included
    pub max_wall_clock: Duration,
    /// Preferred duration of one batch
    pub batch_target: Duration,
    /// Discarded batches between calibration and measurement
    pub warmup_batches: u32,
    /// Suite-wide deadline, if any
    pub deadline: Option<Instant>,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            time_budget: Duration::from_secs(5),
            min_samples: DEFAULT_MIN_SAMPLES,
            max_wall_clock: Duration::from_secs(60),
            batch_target: DEFAULT_BATCH_TARGET,
            warmup_batches: 1,
            deadline: None,
        }
    }
}

impl SamplerConfig {
    /// Effective minimum sample count
    pub fn required_samples(&self) -> usize {
        self.min_samples.max(1)
    }

    /// Duration one batch is calibrated to reach, in nanoseconds.
    ///
    /// `batch_target`, shrunk so `min_samples` batches fit in a non-zero
    /// budget, never below [`MIN_BATCH_NS`].
    pub fn target_batch_ns(&self) -> u64 {
        let mut target = duration_nanos(self.batch_target);
        let budget = duration_nanos(self.time_budget);
        if budget > 0 {
            target = target.min(budget / self.required_samples() as u64);
        }
        target.max(MIN_BATCH_NS)
    }
}

/// Raw output of one successful measurement
#[derive(Debug, Clone)]
pub struct Measurement {
    /// Recorded samples, in measurement order
    pub samples: Vec<Sample>,
    /// Calibrated batch size
    pub iterations_per_batch: u64,
    /// Discarded calibration batches
    pub calibration_batches: u32,
    /// Invocations spent in calibration and warm-up
    pub discarded_iterations: u64,
    /// Wall-clock time of the whole case
    pub total_time: Duration,
}

impl Measurement {
    /// Invocations recorded in samples
    pub fn measured_iterations(&self) -> u64 {
        self.samples.iter().map(|s| s.iterations).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LimitKind {
    Ceiling,
    Deadline,
}

/// Runs one candidate through calibration, warm-up and measurement
pub struct Sampler<'w> {
    work: &'w mut dyn Work,
    config: SamplerConfig,
    target_batch_ns: u64,
    started: Instant,
    limit_at: Option<Instant>,
    limit_kind: LimitKind,
    last_batch_ns: u64,
    last_batch_iterations: u64,
    calibration_batches: u32,
    discarded_iterations: u64,
}

impl<'w> Sampler<'w> {
    /// Prepare a sampler; the ceiling clock starts here
    pub fn new(work: &'w mut dyn Work, config: SamplerConfig) -> Self {
        let started = Instant::now();
        let ceiling = started.checked_add(config.max_wall_clock);
        let (limit_at, limit_kind) = match (ceiling, config.deadline) {
            (Some(c), Some(d)) if d < c => (Some(d), LimitKind::Deadline),
            (None, Some(d)) => (Some(d), LimitKind::Deadline),
            (c, _) => (c, LimitKind::Ceiling),
        };
        Self {
            work,
            target_batch_ns: config.target_batch_ns(),
            config,
            started,
            limit_at,
            limit_kind,
            last_batch_ns: 0,
            last_batch_iterations: 0,
            calibration_batches: 0,
            discarded_iterations: 0,
        }
    }

    /// Run all phases. Panics inside the work are caught and reported as
    /// [`ExecutionError::Panicked`].
    pub fn run(mut self) -> Result<Measurement, MeasureError> {
        match catch_unwind(AssertUnwindSafe(|| self.run_phases())) {
            Ok(result) => result,
            Err(payload) => Err(ExecutionError::from_panic(payload).into()),
        }
    }

    fn run_phases(&mut self) -> Result<Measurement, MeasureError> {
        let iterations = self.calibrate()?;

        for _ in 0..self.config.warmup_batches {
            if self.would_cross_limit(self.estimate_ns(iterations)) {
                break;
            }
            self.run_batch(iterations)?;
            self.discarded_iterations += iterations;
        }

        let required = self.config.required_samples();
        let mut samples = Vec::with_capacity(required);
        let measure_start = Instant::now();

        loop {
            let enough_samples = samples.len() >= required;
            if enough_samples && measure_start.elapsed() >= self.config.time_budget {
                break;
            }
            let batch = if self.would_cross_limit(self.estimate_ns(iterations)) {
                if enough_samples {
                    break;
                }
                match self.fitting_batch(iterations) {
                    Some(fit) => fit,
                    None => return Err(self.limit_error(samples.len())),
                }
            } else {
                iterations
            };
            samples.push(self.run_batch(batch)?);
        }

        Ok(Measurement {
            samples,
            iterations_per_batch: iterations,
            calibration_batches: self.calibration_batches,
            discarded_iterations: self.discarded_iterations,
            total_time: self.started.elapsed(),
        })
    }

    /// Grow the batch size until one batch reaches the target duration
    fn calibrate(&mut self) -> Result<u64, MeasureError> {
        let mut iterations = 1_u64;
        loop {
            if self.would_cross_limit(0) {
                return Err(self.limit_error(0));
            }
            let sample = self.run_batch(iterations)?;
            self.calibration_batches += 1;
            self.discarded_iterations += iterations;

            if sample.elapsed_nanos >= self.target_batch_ns || iterations >= MAX_BATCH_ITERATIONS {
                return Ok(iterations);
            }

            let factor = growth_factor(sample.elapsed_nanos, self.target_batch_ns);
            if self.would_cross_limit(sample.elapsed_nanos.saturating_mul(factor)) {
                return Ok(iterations);
            }
            iterations = iterations.saturating_mul(factor).min(MAX_BATCH_ITERATIONS);
        }
    }

    #[inline]
    fn run_batch(&mut self, iterations: u64) -> Result<Sample, ExecutionError> {
        let timer = Timer::start();
        for _ in 0..iterations {
            self.work.run()?;
        }
        let elapsed = timer.stop();
        self.last_batch_ns = elapsed.nanos;
        self.last_batch_iterations = iterations;
        Ok(Sample::new(iterations, elapsed.nanos, elapsed.cycles))
    }

    /// Expected duration of a batch of `iterations`, from the last batch's rate
    fn estimate_ns(&self, iterations: u64) -> u64 {
        if self.last_batch_iterations == 0 {
            return 0;
        }
        let per_iteration = self.last_batch_ns as f64 / self.last_batch_iterations as f64;
        (per_iteration * iterations as f64).min(u64::MAX as f64) as u64
    }

    /// Largest batch, at most `iterations`, expected to end before the limit
    fn fitting_batch(&self, iterations: u64) -> Option<u64> {
        let limit = self.limit_at?;
        let remaining = duration_nanos(limit.saturating_duration_since(Instant::now()));
        let per_iteration = self.estimate_ns(1).max(1);
        let fit = (remaining / per_iteration).min(iterations);
        (fit >= 1).then_some(fit)
    }

    /// Whether a batch expected to take `next_batch_ns` would end past the limit
    fn would_cross_limit(&self, next_batch_ns: u64) -> bool {
        let Some(limit) = self.limit_at else {
            return false;
        };
        let now = Instant::now();
        match now.checked_add(Duration::from_nanos(next_batch_ns)) {
            Some(end) => now >= limit || end > limit,
            None => true,
        }
    }

    fn limit_error(&self, collected: usize) -> MeasureError {
        let required = self.config.required_samples();
        match self.limit_kind {
            LimitKind::Ceiling => MeasureError::TimeoutExceeded {
                ceiling_ms: u64::try_from(self.config.max_wall_clock.as_millis())
                    .unwrap_or(u64::MAX),
                collected,
                required,
            },
            LimitKind::Deadline => MeasureError::Cancelled {
                collected,
                required,
            },
        }
    }
}

/// Measure `work` with `config`. See the module docs for the phases.
pub fn measure(work: &mut dyn Work, config: &SamplerConfig) -> Result<Measurement, MeasureError> {
    Sampler::new(work, config.clone()).run()
}

/// Multiplier for the next calibration batch
fn growth_factor(elapsed_ns: u64, target_ns: u64) -> u64 {
    if elapsed_ns == 0 {
        return MAX_GROWTH;
    }
    let ratio = (target_ns as f64 / elapsed_ns as f64) * GROWTH_HEADROOM;
    (ratio.ceil() as u64).clamp(MIN_GROWTH, MAX_GROWTH)
}

fn duration_nanos(d: Duration) -> u64 {
    u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::work::from_fn;

    fn quick_config() -> SamplerConfig {
        SamplerConfig {
            time_budget: Duration::ZERO,
            min_samples: 3,
            max_wall_clock: Duration::from_secs(30),
            batch_target: Duration::from_micros(200),
            warmup_batches: 1,
            deadline: None,
        }
    }

    fn spin(n: u64) -> u64 {
        (0..n).fold(0_u64, |acc, i| acc.wrapping_add(std::hint::black_box(i)))
    }

    #[test]
    fn test_zero_budget_still_collects_min_samples() {
        let mut work = from_fn(|| spin(100));
        let m = measure(&mut work, &quick_config()).unwrap();

        assert_eq!(m.samples.len(), 3);
        assert!(m.samples.iter().all(|s| s.iterations == m.iterations_per_batch));
    }

    #[test]
    fn test_min_samples_floor_is_one() {
        let mut work = from_fn(|| spin(10));
        let config = SamplerConfig {
            min_samples: 0,
            ..quick_config()
        };
        let m = measure(&mut work, &config).unwrap();
        assert_eq!(m.samples.len(), 1);
    }

    #[test]
    fn test_fast_work_is_batched() {
        let mut work = from_fn(|| 1_u64 + std::hint::black_box(1));
        let m = measure(&mut work, &quick_config()).unwrap();

        // A near-empty closure cannot fill a 200us batch in one call
        assert!(m.iterations_per_batch > 1);
        assert!(m.calibration_batches > 1);
    }

    #[test]
    fn test_time_budget_is_consumed() {
        let mut work = from_fn(|| spin(50));
        let config = SamplerConfig {
            time_budget: Duration::from_millis(20),
            ..quick_config()
        };
        let m = measure(&mut work, &config).unwrap();

        let measured: u64 = m.samples.iter().map(|s| s.elapsed_nanos).sum();
        assert!(measured >= 15_000_000, "measured only {measured} ns");
        assert!(m.samples.len() >= 3);
    }

    #[test]
    fn test_failure_on_first_call() {
        let mut calls = 0_u32;
        let mut work = || -> Result<(), ExecutionError> {
            calls += 1;
            Err(ExecutionError::raised("invalid"))
        };
        let err = measure(&mut work, &quick_config()).unwrap_err();

        assert_eq!(err, MeasureError::Execution(ExecutionError::raised("invalid")));
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_failure_mid_measurement() {
        let mut calls = 0_u64;
        let mut work = || -> Result<(), ExecutionError> {
            calls += 1;
            if calls > 1_000 {
                Err(ExecutionError::raised("exhausted"))
            } else {
                Ok(())
            }
        };
        let config = SamplerConfig {
            time_budget: Duration::from_secs(5),
            ..quick_config()
        };
        let err = measure(&mut work, &config).unwrap_err();
        assert_eq!(err.kind(), "execution");
    }

    #[test]
    fn test_panic_is_caught() {
        let mut work = from_fn(|| -> u32 { panic!("candidate exploded") });
        let err = measure(&mut work, &quick_config()).unwrap_err();

        assert_eq!(
            err,
            MeasureError::Execution(ExecutionError::Panicked("candidate exploded".into()))
        );
    }

    #[test]
    fn test_zero_ceiling_times_out() {
        let mut work = from_fn(|| spin(10));
        let config = SamplerConfig {
            max_wall_clock: Duration::ZERO,
            ..quick_config()
        };
        let err = measure(&mut work, &config).unwrap_err();
        assert!(matches!(
            err,
            MeasureError::TimeoutExceeded {
                collected: 0,
                required: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_slow_work_hits_ceiling() {
        let mut work = from_fn(|| std::thread::sleep(Duration::from_millis(30)));
        let config = SamplerConfig {
            min_samples: 10,
            max_wall_clock: Duration::from_millis(100),
            batch_target: Duration::from_millis(1),
            ..quick_config()
        };
        let started = Instant::now();
        let err = measure(&mut work, &config).unwrap_err();

        assert_eq!(err.kind(), "timeout");
        // Batches are atomic, so at most one batch past the ceiling
        assert!(started.elapsed() < Duration::from_millis(500));
    }

    #[test]
    fn test_past_deadline_cancels() {
        let mut work = from_fn(|| spin(10));
        let config = SamplerConfig {
            deadline: Some(Instant::now()),
            ..quick_config()
        };
        let err = measure(&mut work, &config).unwrap_err();
        assert!(matches!(err, MeasureError::Cancelled { collected: 0, .. }));
    }

    #[test]
    fn test_batch_shrinks_to_fit_ceiling() {
        // Calibration settles on 16 x 1ms, which no longer fits the 25ms ceiling
        let mut work = from_fn(|| std::thread::sleep(Duration::from_millis(1)));
        let config = SamplerConfig {
            min_samples: 1,
            max_wall_clock: Duration::from_millis(25),
            batch_target: Duration::from_millis(50),
            warmup_batches: 0,
            ..quick_config()
        };
        let m = measure(&mut work, &config).unwrap();

        assert_eq!(m.samples.len(), 1);
        assert!(m.samples[0].iterations >= 1);
        assert!(m.samples[0].iterations < m.iterations_per_batch);
    }

    #[test]
    fn test_target_batch_ns() {
        let config = SamplerConfig {
            time_budget: Duration::from_millis(10),
            min_samples: 5,
            batch_target: Duration::from_millis(50),
            ..SamplerConfig::default()
        };
        // Budget split across the minimum samples wins over the preferred target
        assert_eq!(config.target_batch_ns(), 2_000_000);

        let zero_budget = SamplerConfig {
            time_budget: Duration::ZERO,
            ..config.clone()
        };
        assert_eq!(zero_budget.target_batch_ns(), 50_000_000);

        let tiny = SamplerConfig {
            batch_target: Duration::from_nanos(1),
            ..config
        };
        assert_eq!(tiny.target_batch_ns(), MIN_BATCH_NS);
    }

    #[test]
    fn test_growth_factor_bounds() {
        assert_eq!(growth_factor(0, 1_000), MAX_GROWTH);
        assert_eq!(growth_factor(1, 1_000_000), MAX_GROWTH);
        assert_eq!(growth_factor(900, 1_000), MIN_GROWTH);
        assert_eq!(growth_factor(250, 1_000), 5);
    }
}

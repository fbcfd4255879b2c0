//! Timing Primitives
//!
//! Wall-clock time comes from `std::time::Instant` (monotonic). Alongside it a
//! hardware tick counter is read where one exists: RDTSCP on x86_64 and
//! CNTVCT_EL0 on AArch64. Tick counts are informational; throughput is always
//! derived from nanoseconds.

use std::time::Duration;

#[cfg(target_arch = "x86_64")]
#[inline(always)]
fn read_cycles() -> u64 {
    // SAFETY: RDTSCP is available on every x86_64 CPU this crate targets and
    // waits for prior instructions to retire before reading the counter.
    unsafe {
        let mut aux: u32 = 0;
        std::arch::x86_64::__rdtscp(&mut aux)
    }
}

#[cfg(target_arch = "aarch64")]
#[inline(always)]
fn read_cycles() -> u64 {
    let cnt: u64;
    // SAFETY: CNTVCT_EL0 is readable from EL0 on all AArch64 implementations.
    unsafe {
        std::arch::asm!("mrs {}, cntvct_el0", out(reg) cnt, options(nostack, nomem));
    }
    cnt
}

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
#[inline(always)]
fn read_cycles() -> u64 {
    0
}

/// Whether [`Timer`] reports real tick counts on this platform.
pub const HAS_CYCLE_COUNTER: bool = cfg!(target_arch = "x86_64") || cfg!(target_arch = "aarch64");

/// A point in time paired with the tick counter value read at that moment
#[derive(Debug, Clone, Copy)]
pub struct Instant {
    instant: std::time::Instant,
    ticks: u64,
}

impl Instant {
    /// Capture the current instant
    #[inline(always)]
    pub fn now() -> Self {
        let ticks = read_cycles();
        Self {
            instant: std::time::Instant::now(),
            ticks,
        }
    }

    /// Wall-clock time elapsed since this instant
    #[inline(always)]
    pub fn elapsed(&self) -> Duration {
        self.instant.elapsed()
    }

    /// Raw tick count (0 where no counter exists)
    #[inline(always)]
    pub fn cycles(&self) -> u64 {
        self.ticks
    }
}

/// Elapsed time of one timed region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Elapsed {
    /// Wall-clock nanoseconds
    pub nanos: u64,
    /// Hardware ticks (0 where no counter exists)
    pub cycles: u64,
}

/// Times one region of code: `Timer::start()` .. `timer.stop()`
pub struct Timer {
    start: Instant,
}

impl Timer {
    /// Start timing
    #[inline(always)]
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Stop timing
    #[inline(always)]
    pub fn stop(&self) -> Elapsed {
        let nanos = u64::try_from(self.start.elapsed().as_nanos()).unwrap_or(u64::MAX);
        let cycles = read_cycles().saturating_sub(self.start.cycles());
        Elapsed { nanos, cycles }
    }
}

/// Affinity of the calling thread before [`pin_to_cpu`]; restored on drop
#[must_use = "the thread is unpinned as soon as the guard is dropped"]
pub struct CpuPin {
    #[cfg(target_os = "linux")]
    previous: libc::cpu_set_t,
}

/// Pin the calling thread to one CPU core until the returned guard drops.
///
/// Keeps tick readings comparable and removes migration noise between batches.
#[cfg(target_os = "linux")]
pub fn pin_to_cpu(cpu: usize) -> Result<CpuPin, std::io::Error> {
    let previous = affinity::get()?;
    let mut set = affinity::empty();
    // SAFETY: `set` is a zeroed, properly sized cpu_set_t.
    unsafe { libc::CPU_SET(cpu, &mut set) };
    affinity::set(&set)?;
    Ok(CpuPin { previous })
}

/// Pin the calling thread to one CPU core (no-op on this platform).
#[cfg(not(target_os = "linux"))]
pub fn pin_to_cpu(_cpu: usize) -> Result<CpuPin, std::io::Error> {
    Ok(CpuPin {})
}

impl Drop for CpuPin {
    fn drop(&mut self) {
        #[cfg(target_os = "linux")]
        if let Err(e) = affinity::set(&self.previous) {
            tracing::warn!(error = %e, "failed to restore thread affinity");
        }
    }
}

#[cfg(target_os = "linux")]
mod affinity {
    use std::mem::{MaybeUninit, size_of};

    pub(super) fn empty() -> libc::cpu_set_t {
        // SAFETY: cpu_set_t is plain data; all-zero is the empty set.
        unsafe { MaybeUninit::<libc::cpu_set_t>::zeroed().assume_init() }
    }

    pub(super) fn get() -> Result<libc::cpu_set_t, std::io::Error> {
        let mut set = empty();
        // SAFETY: `set` is a valid cpu_set_t of the size passed.
        let rc = unsafe { libc::sched_getaffinity(0, size_of::<libc::cpu_set_t>(), &mut set) };
        if rc == 0 {
            Ok(set)
        } else {
            Err(std::io::Error::last_os_error())
        }
    }

    pub(super) fn set(set: &libc::cpu_set_t) -> Result<(), std::io::Error> {
        // SAFETY: `set` is a valid cpu_set_t of the size passed.
        let rc = unsafe { libc::sched_setaffinity(0, size_of::<libc::cpu_set_t>(), set) };
        if rc == 0 {
            Ok(())
        } else {
            Err(std::io::Error::last_os_error())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instant_elapsed() {
        let start = Instant::now();
        std::thread::sleep(Duration::from_millis(10));
        let elapsed = start.elapsed();

        assert!(elapsed >= Duration::from_millis(5));
        assert!(elapsed < Duration::from_secs(2));
    }

    #[test]
    fn test_timer_reports_nanos() {
        let timer = Timer::start();
        std::thread::sleep(Duration::from_millis(10));
        let elapsed = timer.stop();

        assert!(elapsed.nanos >= 5_000_000);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_pin_restores_affinity() {
        fn cpus(set: &libc::cpu_set_t) -> Vec<usize> {
            (0..libc::CPU_SETSIZE as usize)
                .filter(|&cpu| unsafe { libc::CPU_ISSET(cpu, set) })
                .collect()
        }

        let before = cpus(&affinity::get().unwrap());
        let first = before[0];
        {
            let _pin = pin_to_cpu(first).unwrap();
            assert_eq!(cpus(&affinity::get().unwrap()), vec![first]);
        }
        assert_eq!(cpus(&affinity::get().unwrap()), before);
    }

    #[test]
    fn test_cycle_counter_monotonic() {
        if HAS_CYCLE_COUNTER {
            let a = read_cycles();
            let b = read_cycles();
            assert!(b >= a);
        }
    }
}

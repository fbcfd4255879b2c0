//! Work - The Candidate Capability
//!
//! A candidate is anything that can perform one fallible, argument-free
//! invocation of the benchmarked operation. Closures returning
//! `Result<T, ExecutionError>` implement [`Work`] directly; [`from_fn`] and
//! [`try_fn`] adapt infallible closures and closures with foreign error types.

use crate::error::ExecutionError;
use std::fmt::Display;
use std::hint::black_box;

/// One benchmarked operation
pub trait Work {
    /// Perform the operation once
    fn run(&mut self) -> Result<(), ExecutionError>;
}

impl<F, T> Work for F
where
    F: FnMut() -> Result<T, ExecutionError>,
{
    #[inline]
    fn run(&mut self) -> Result<(), ExecutionError> {
        black_box(self()).map(|_| ())
    }
}

/// Adapter returned by [`from_fn`]
pub struct FromFn<F>(F);

/// Wrap a closure that cannot fail. Its output is passed through `black_box`
/// so the optimizer cannot drop the call.
pub fn from_fn<F, T>(f: F) -> FromFn<F>
where
    F: FnMut() -> T,
{
    FromFn(f)
}

impl<F, T> Work for FromFn<F>
where
    F: FnMut() -> T,
{
    #[inline]
    fn run(&mut self) -> Result<(), ExecutionError> {
        black_box((self.0)());
        Ok(())
    }
}

/// Adapter returned by [`try_fn`]
pub struct TryFn<F>(F);

/// Wrap a closure whose error type is not [`ExecutionError`]; the error is
/// recorded through its `Display` output.
pub fn try_fn<F, T, E>(f: F) -> TryFn<F>
where
    F: FnMut() -> Result<T, E>,
    E: Display,
{
    TryFn(f)
}

impl<F, T, E> Work for TryFn<F>
where
    F: FnMut() -> Result<T, E>,
    E: Display,
{
    #[inline]
    fn run(&mut self) -> Result<(), ExecutionError> {
        match black_box((self.0)()) {
            Ok(_) => Ok(()),
            Err(e) => Err(ExecutionError::Raised(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_is_work() {
        let mut calls = 0;
        let mut work = || -> Result<u32, ExecutionError> {
            calls += 1;
            Ok(7)
        };
        assert!(Work::run(&mut work).is_ok());
        assert!(Work::run(&mut work).is_ok());
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_from_fn() {
        let mut counter = 0_u64;
        let mut work = from_fn(|| {
            counter += 1;
            counter
        });
        for _ in 0..3 {
            work.run().unwrap();
        }
        drop(work);
        assert_eq!(counter, 3);
    }

    #[test]
    fn test_try_fn_maps_error() {
        let mut work = try_fn(|| "abc".parse::<u32>());
        let err = work.run().unwrap_err();
        assert!(matches!(err, ExecutionError::Raised(msg) if msg.contains("invalid digit")));

        let mut ok = try_fn(|| "12".parse::<u32>());
        assert!(ok.run().is_ok());
    }

    #[test]
    fn test_boxed_dyn_work() {
        let mut boxed: Box<dyn Work> = Box::new(from_fn(|| 1 + 1));
        assert!(boxed.run().is_ok());
    }
}

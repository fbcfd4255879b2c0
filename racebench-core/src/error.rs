//! Error Taxonomy
//!
//! Three layers, each caught at a different place:
//! - [`ConfigurationError`]: raised while a suite is being built, fatal to that suite
//! - [`ExecutionError`]: raised by a candidate's work, local to that candidate
//! - [`MeasureError`]: everything that can end a measurement early, converted
//!   into a failed result by the scheduler

use thiserror::Error;

/// Invalid suite construction (duplicate names, second reference, ...)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// Case names must be non-empty
    #[error("suite `{suite}`: case name must not be empty")]
    EmptyName {
        /// Suite being built
        suite: String,
    },

    /// A case with this name is already registered
    #[error("suite `{suite}`: duplicate case `{name}`")]
    DuplicateCase {
        /// Suite being built
        suite: String,
        /// Offending case name
        name: String,
    },

    /// The suite already has a reference case
    #[error("suite `{suite}`: `{attempted}` cannot be a reference, `{existing}` already is")]
    DuplicateReference {
        /// Suite being built
        suite: String,
        /// Name of the registered reference
        existing: String,
        /// Name of the rejected case
        attempted: String,
    },
}

/// Failure raised by a candidate's unit of work
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    /// The work returned an error
    #[error("{0}")]
    Raised(String),

    /// The work panicked; the payload message is preserved
    #[error("panicked: {0}")]
    Panicked(String),
}

impl ExecutionError {
    /// Build an [`ExecutionError::Raised`] from any message
    pub fn raised(message: impl Into<String>) -> Self {
        ExecutionError::Raised(message.into())
    }

    pub(crate) fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic".to_string()
        };
        ExecutionError::Panicked(message)
    }
}

/// Reasons a measurement ends without a usable set of samples
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeasureError {
    /// The work failed; samples collected so far are discarded
    #[error(transparent)]
    Execution(#[from] ExecutionError),

    /// The per-case wall-clock ceiling was reached before enough samples existed
    #[error(
        "exceeded wall-clock ceiling of {ceiling_ms} ms with {collected} of {required} sample(s)"
    )]
    TimeoutExceeded {
        /// Configured ceiling in milliseconds
        ceiling_ms: u64,
        /// Samples collected before stopping
        collected: usize,
        /// Samples required
        required: usize,
    },

    /// The suite-wide deadline passed before enough samples existed
    #[error("suite deadline reached with {collected} of {required} sample(s)")]
    Cancelled {
        /// Samples collected before stopping
        collected: usize,
        /// Samples required
        required: usize,
    },
}

impl MeasureError {
    /// Short machine-readable kind used in reports
    pub fn kind(&self) -> &'static str {
        match self {
            MeasureError::Execution(ExecutionError::Raised(_)) => "execution",
            MeasureError::Execution(ExecutionError::Panicked(_)) => "panic",
            MeasureError::TimeoutExceeded { .. } => "timeout",
            MeasureError::Cancelled { .. } => "cancelled",
        }
    }
}

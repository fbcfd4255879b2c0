//! Per-Case Results

use racebench_core::MeasureError;
use racebench_stats::ThroughputSummary;
use serde::{Deserialize, Serialize};

/// Why a case produced no measurement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureInfo {
    /// `execution`, `panic`, `timeout` or `cancelled`
    pub kind: String,
    /// Human-readable reason
    pub message: String,
}

impl FailureInfo {
    /// Build from a kind and message
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// A case that never started because the suite deadline passed
    pub fn cancelled(message: impl Into<String>) -> Self {
        Self::new("cancelled", message)
    }
}

impl From<&MeasureError> for FailureInfo {
    fn from(err: &MeasureError) -> Self {
        Self::new(err.kind(), err.to_string())
    }
}

impl From<MeasureError> for FailureInfo {
    fn from(err: MeasureError) -> Self {
        Self::from(&err)
    }
}

/// What happened to one case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseOutcome {
    /// Measured successfully
    Measured(ThroughputSummary),
    /// Failed, timed out or was cancelled
    Failed(FailureInfo),
    /// Registered as skipped; never executed
    Skipped,
}

/// Result of one case, in registration terms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseResult {
    /// Case name
    pub name: String,
    /// Registration index within the suite
    pub index: usize,
    /// Whether the case is the suite's reference
    pub is_reference: bool,
    /// Outcome
    pub outcome: CaseOutcome,
}

impl CaseResult {
    /// Successful result
    pub fn measured(
        name: impl Into<String>,
        index: usize,
        is_reference: bool,
        summary: ThroughputSummary,
    ) -> Self {
        Self {
            name: name.into(),
            index,
            is_reference,
            outcome: CaseOutcome::Measured(summary),
        }
    }

    /// Failed result
    pub fn failed(
        name: impl Into<String>,
        index: usize,
        is_reference: bool,
        failure: FailureInfo,
    ) -> Self {
        Self {
            name: name.into(),
            index,
            is_reference,
            outcome: CaseOutcome::Failed(failure),
        }
    }

    /// Skipped result
    pub fn skipped(name: impl Into<String>, index: usize, is_reference: bool) -> Self {
        Self {
            name: name.into(),
            index,
            is_reference,
            outcome: CaseOutcome::Skipped,
        }
    }

    /// Summary, when measured
    pub fn summary(&self) -> Option<&ThroughputSummary> {
        match &self.outcome {
            CaseOutcome::Measured(s) => Some(s),
            _ => None,
        }
    }

    /// Failure, when failed
    pub fn failure(&self) -> Option<&FailureInfo> {
        match &self.outcome {
            CaseOutcome::Failed(f) => Some(f),
            _ => None,
        }
    }

    /// Measured with a positive throughput
    pub fn is_success(&self) -> bool {
        self.summary()
            .is_some_and(|s| s.ops_per_sec.is_finite() && s.ops_per_sec > 0.0)
    }

    /// Registered as skipped
    pub fn is_skipped(&self) -> bool {
        matches!(self.outcome, CaseOutcome::Skipped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use racebench_core::ExecutionError;

    #[test]
    fn test_failure_kinds_from_measure_errors() {
        let raised = MeasureError::from(ExecutionError::raised("bad input"));
        let info = FailureInfo::from(&raised);
        assert_eq!(info.kind, "execution");
        assert_eq!(info.message, "bad input");

        let timeout = MeasureError::TimeoutExceeded {
            ceiling_ms: 10,
            collected: 1,
            required: 5,
        };
        assert_eq!(FailureInfo::from(timeout).kind, "timeout");

        assert_eq!(FailureInfo::cancelled("deadline").kind, "cancelled");
    }

    #[test]
    fn test_outcome_accessors() {
        let failed = CaseResult::failed("c", 2, false, FailureInfo::new("panic", "boom"));
        assert!(!failed.is_success());
        assert!(failed.summary().is_none());
        assert_eq!(failed.failure().map(|f| f.kind.as_str()), Some("panic"));

        let skipped = CaseResult::skipped("s", 0, false);
        assert!(skipped.is_skipped());
        assert!(!skipped.is_success());
    }
}

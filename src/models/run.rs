//! Run Models
//!
//! The job run a pipeline records into: its read-only context, the verdict
//! and aggregate accumulated so far, and the previous completed run used as
//! the threshold baseline.

use serde::{Deserialize, Serialize};

use xunit_core::{RunContext, Verdict};
use xunit_gates::TestResultAggregate;

/// Snapshot of an earlier completed run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedRun {
    pub run_id: String,
    pub verdict: Option<Verdict>,
    pub test_result: Option<TestResultAggregate>,
}

/// A run being recorded.
#[derive(Debug)]
pub struct Run {
    context: RunContext,
    result: Option<Verdict>,
    test_result: Option<TestResultAggregate>,
    previous: Option<CompletedRun>,
}

impl Run {
    pub fn new(context: RunContext) -> Self {
        Self {
            context,
            result: None,
            test_result: None,
            previous: None,
        }
    }

    /// Verdict set by an earlier step of this run.
    pub fn with_result(mut self, verdict: Verdict) -> Self {
        self.result = Some(verdict);
        self
    }

    /// Aggregate recorded by an earlier step of this run.
    pub fn with_test_result(mut self, aggregate: TestResultAggregate) -> Self {
        self.test_result = Some(aggregate);
        self
    }

    pub fn with_previous(mut self, previous: CompletedRun) -> Self {
        self.previous = Some(previous);
        self
    }

    pub fn context(&self) -> &RunContext {
        &self.context
    }

    pub fn result(&self) -> Option<Verdict> {
        self.result
    }

    pub fn set_result(&mut self, verdict: Verdict) {
        self.result = Some(verdict);
    }

    pub fn test_result(&self) -> Option<&TestResultAggregate> {
        self.test_result.as_ref()
    }

    /// The run-level aggregate slot, created on first recording.
    pub fn test_result_mut(&mut self) -> &mut Option<TestResultAggregate> {
        &mut self.test_result
    }

    pub fn previous(&self) -> Option<&CompletedRun> {
        self.previous.as_ref()
    }

    /// Baseline for trend thresholds: the previous completed run's aggregate.
    pub fn previous_aggregate(&self) -> Option<&TestResultAggregate> {
        self.previous.as_ref().and_then(|p| p.test_result.as_ref())
    }
}

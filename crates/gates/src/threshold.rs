//! Threshold Evaluation
//!
//! Maps counts of failed, skipped or passed cases to a verdict. A run-wide
//! `ThresholdMode` decides whether limits are absolute counts or percentages
//! of the total. Trend limits (`*_new`) compare against the previous run.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use xunit_core::{CoreError, CoreResult, RunLog, Verdict};

use crate::models::TestResultAggregate;

/// How threshold limits are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdMode {
    /// Limits are case counts
    #[default]
    Number,
    /// Limits are percentages of the total case count
    Percent,
}

/// Which counter a threshold watches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdKind {
    Failed,
    Skipped,
    Passed,
}

impl ThresholdKind {
    fn count(self, aggregate: &TestResultAggregate) -> usize {
        match self {
            ThresholdKind::Failed => aggregate.fail_count(),
            ThresholdKind::Skipped => aggregate.skip_count(),
            ThresholdKind::Passed => aggregate.pass_count(),
        }
    }

    /// Passed thresholds are lower bounds, the others upper bounds.
    fn trips(self, measured: f64, limit: f64) -> bool {
        match self {
            ThresholdKind::Passed => measured < limit,
            ThresholdKind::Failed | ThresholdKind::Skipped => measured > limit,
        }
    }

    fn label(self) -> &'static str {
        match self {
            ThresholdKind::Failed => "failed",
            ThresholdKind::Skipped => "skipped",
            ThresholdKind::Passed => "passed",
        }
    }
}

/// A single threshold rule evaluated against the current aggregate.
pub trait ResultThreshold: Send + Sync {
    /// Display name used in the run log.
    fn name(&self) -> &str;

    /// Verdict with limits read as absolute counts.
    fn result_number(
        &self,
        log: &RunLog,
        current: &TestResultAggregate,
        previous: Option<&TestResultAggregate>,
    ) -> Verdict;

    /// Verdict with limits read as percentages of the current total.
    fn result_percent(
        &self,
        log: &RunLog,
        current: &TestResultAggregate,
        previous: Option<&TestResultAggregate>,
    ) -> Verdict;
}

/// Configured threshold with its four optional limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    pub kind: ThresholdKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unstable: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unstable_new: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_new: Option<f64>,
}

impl Threshold {
    pub fn new(kind: ThresholdKind) -> Self {
        Self {
            kind,
            unstable: None,
            unstable_new: None,
            failure: None,
            failure_new: None,
        }
    }

    pub fn failed() -> Self {
        Self::new(ThresholdKind::Failed)
    }

    pub fn skipped() -> Self {
        Self::new(ThresholdKind::Skipped)
    }

    pub fn passed() -> Self {
        Self::new(ThresholdKind::Passed)
    }

    pub fn with_unstable(mut self, limit: f64) -> Self {
        self.unstable = Some(limit);
        self
    }

    pub fn with_unstable_new(mut self, limit: f64) -> Self {
        self.unstable_new = Some(limit);
        self
    }

    pub fn with_failure(mut self, limit: f64) -> Self {
        self.failure = Some(limit);
        self
    }

    pub fn with_failure_new(mut self, limit: f64) -> Self {
        self.failure_new = Some(limit);
        self
    }

    /// Reject negative or non-finite limits.
    pub fn validate(&self) -> CoreResult<()> {
        let limits = [
            ("unstable", self.unstable),
            ("unstable_new", self.unstable_new),
            ("failure", self.failure),
            ("failure_new", self.failure_new),
        ];
        for (field, limit) in limits {
            if let Some(value) = limit {
                if !value.is_finite() || value < 0.0 {
                    return Err(CoreError::config(format!(
                        "Invalid '{}' limit {} for the {} threshold",
                        field,
                        value,
                        self.kind.label()
                    )));
                }
            }
        }
        Ok(())
    }

    /// Check order: failure, failure_new, unstable, unstable_new.
    fn check(&self, log: &RunLog, measured: f64, measured_new: f64) -> Verdict {
        let kind = self.kind;
        let direction = match kind {
            ThresholdKind::Passed => "is below",
            _ => "exceeds",
        };

        let checks = [
            (self.failure, measured, "failure", Verdict::Failure, ""),
            (self.failure_new, measured_new, "failure new", Verdict::Failure, "new "),
            (self.unstable, measured, "unstable", Verdict::Unstable, ""),
            (self.unstable_new, measured_new, "unstable new", Verdict::Unstable, "new "),
        ];
        for (limit, value, label, verdict, qualifier) in checks {
            let Some(limit) = limit else { continue };
            if kind.trips(value, limit) {
                log.info(format!(
                    "The {}{} test count ({}) {} the '{}' threshold value ({}).",
                    qualifier,
                    kind.label(),
                    value,
                    direction,
                    label,
                    limit
                ));
                return verdict;
            }
        }
        Verdict::Success
    }

    fn counts(
        &self,
        current: &TestResultAggregate,
        previous: Option<&TestResultAggregate>,
    ) -> (f64, f64) {
        let count = self.kind.count(current) as f64;
        let before = previous.map(|p| self.kind.count(p)).unwrap_or(0) as f64;
        (count, count - before)
    }
}

impl ResultThreshold for Threshold {
    fn name(&self) -> &str {
        match self.kind {
            ThresholdKind::Failed => "Failed Tests",
            ThresholdKind::Skipped => "Skipped Tests",
            ThresholdKind::Passed => "Passed Tests",
        }
    }

    fn result_number(
        &self,
        log: &RunLog,
        current: &TestResultAggregate,
        previous: Option<&TestResultAggregate>,
    ) -> Verdict {
        let (count, new_count) = self.counts(current, previous);
        self.check(log, count, new_count)
    }

    fn result_percent(
        &self,
        log: &RunLog,
        current: &TestResultAggregate,
        previous: Option<&TestResultAggregate>,
    ) -> Verdict {
        let total = current.total_count() as f64;
        let (count, new_count) = self.counts(current, previous);
        let (percent, new_percent) = if total == 0.0 {
            (0.0, 0.0)
        } else {
            (count / total * 100.0, new_count / total * 100.0)
        };
        self.check(log, percent, new_percent)
    }
}

/// Evaluates thresholds in declaration order.
pub struct ThresholdEvaluator {
    thresholds: Vec<Arc<dyn ResultThreshold>>,
    mode: ThresholdMode,
}

impl ThresholdEvaluator {
    pub fn new(mode: ThresholdMode) -> Self {
        Self {
            thresholds: Vec::new(),
            mode,
        }
    }

    /// Build from configured thresholds, validating every limit.
    pub fn from_thresholds(
        mode: ThresholdMode,
        thresholds: impl IntoIterator<Item = Threshold>,
    ) -> CoreResult<Self> {
        let mut evaluator = Self::new(mode);
        for threshold in thresholds {
            threshold.validate()?;
            evaluator.push(Arc::new(threshold));
        }
        Ok(evaluator)
    }

    pub fn push(&mut self, threshold: Arc<dyn ResultThreshold>) {
        self.thresholds.push(threshold);
    }

    pub fn mode(&self) -> ThresholdMode {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.thresholds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.thresholds.is_empty()
    }

    /// Candidate verdict: the first result worse than SUCCESS, else SUCCESS.
    pub fn evaluate(
        &self,
        log: &RunLog,
        current: &TestResultAggregate,
        previous: Option<&TestResultAggregate>,
    ) -> Verdict {
        for threshold in &self.thresholds {
            log.info(format!("Check '{}' threshold.", threshold.name()));
            let verdict = match self.mode {
                ThresholdMode::Number => threshold.result_number(log, current, previous),
                ThresholdMode::Percent => threshold.result_percent(log, current, previous),
            };
            if verdict.is_worse_than(Verdict::Success) {
                tracing::debug!(threshold = threshold.name(), verdict = %verdict, "threshold tripped");
                return verdict;
            }
        }
        Verdict::Success
    }
}

impl std::fmt::Debug for ThresholdEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThresholdEvaluator")
            .field("thresholds", &self.thresholds.len())
            .field("mode", &self.mode)
            .finish()
    }
}

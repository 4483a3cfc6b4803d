//! Test Result Models
//!
//! The aggregate of every canonical report recorded for a run.

use serde::{Deserialize, Serialize};

/// Outcome of a single test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseStatus {
    Passed,
    Failed,
    Skipped,
}

/// A single test case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseResult {
    pub name: String,
    #[serde(default)]
    pub class_name: String,
    pub status: CaseStatus,
    #[serde(default)]
    pub duration_secs: f64,
    /// Failure or skip message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CaseResult {
    pub fn new(name: impl Into<String>, status: CaseStatus) -> Self {
        Self {
            name: name.into(),
            class_name: String::new(),
            status,
            duration_secs: 0.0,
            message: None,
        }
    }

    pub fn passed(name: impl Into<String>) -> Self {
        Self::new(name, CaseStatus::Passed)
    }

    pub fn failed(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, CaseStatus::Failed).with_message(message)
    }

    pub fn skipped(name: impl Into<String>) -> Self {
        Self::new(name, CaseStatus::Skipped)
    }

    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = class_name.into();
        self
    }

    pub fn with_duration(mut self, secs: f64) -> Self {
        self.duration_secs = secs;
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Same class name and case name.
    pub fn same_case(&self, other: &CaseResult) -> bool {
        self.name == other.name && self.class_name == other.class_name
    }
}

/// A named group of test cases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuiteResult {
    pub name: String,
    pub cases: Vec<CaseResult>,
}

impl SuiteResult {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cases: Vec::new(),
        }
    }

    pub fn with_case(mut self, case: CaseResult) -> Self {
        self.push(case);
        self
    }

    /// Append a case. Cases of one report never replace each other.
    pub fn push(&mut self, case: CaseResult) {
        self.cases.push(case);
    }

    /// Replace every case of `newer` recorded earlier, then append them.
    fn supersede(&mut self, newer: Vec<CaseResult>) {
        self.cases
            .retain(|old| !newer.iter().any(|case| case.same_case(old)));
        self.cases.extend(newer);
    }

    pub fn case(&self, name: &str) -> Option<&CaseResult> {
        self.cases.iter().find(|c| c.name == name)
    }

    pub fn duration_secs(&self) -> f64 {
        self.cases.iter().map(|c| c.duration_secs).sum()
    }
}

/// Merged test results of a run.
///
/// Case identity is suite name + class name + case name. Counters are
/// private and always recomputed from the full case set (`tally`), never
/// summed across merges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResultAggregate {
    suites: Vec<SuiteResult>,
    pass_count: usize,
    fail_count: usize,
    skip_count: usize,
    /// Run start normalised to the execution node clock, epoch milliseconds.
    timestamp_ms: i64,
}

impl TestResultAggregate {
    /// Create an empty aggregate.
    pub fn new(timestamp_ms: i64) -> Self {
        Self {
            suites: Vec::new(),
            pass_count: 0,
            fail_count: 0,
            skip_count: 0,
            timestamp_ms,
        }
    }

    /// Build from the suites of one recording. Every case is kept; suites
    /// sharing a name are concatenated.
    pub fn from_suites(suites: impl IntoIterator<Item = SuiteResult>, timestamp_ms: i64) -> Self {
        let mut aggregate = Self::new(timestamp_ms);
        for suite in suites {
            match aggregate.suites.iter_mut().find(|s| s.name == suite.name) {
                Some(existing) => existing.cases.extend(suite.cases),
                None => aggregate.suites.push(suite),
            }
        }
        aggregate.tally();
        aggregate
    }

    /// Merge a newer aggregate into this one.
    ///
    /// Cases of `other` replace cases with the same identity; counters are
    /// recomputed afterwards.
    pub fn merge(&mut self, other: TestResultAggregate) {
        for suite in other.suites {
            self.merge_suite(suite);
        }
        self.timestamp_ms = self.timestamp_ms.min(other.timestamp_ms);
        self.tally();
    }

    fn merge_suite(&mut self, suite: SuiteResult) {
        match self.suites.iter_mut().find(|s| s.name == suite.name) {
            Some(existing) => existing.supersede(suite.cases),
            None => self.suites.push(suite),
        }
    }

    /// Recompute counters from the case set.
    pub fn tally(&mut self) {
        let (mut pass, mut fail, mut skip) = (0, 0, 0);
        for case in self.suites.iter().flat_map(|s| s.cases.iter()) {
            match case.status {
                CaseStatus::Passed => pass += 1,
                CaseStatus::Failed => fail += 1,
                CaseStatus::Skipped => skip += 1,
            }
        }
        self.pass_count = pass;
        self.fail_count = fail;
        self.skip_count = skip;
    }

    pub fn pass_count(&self) -> usize {
        self.pass_count
    }

    pub fn fail_count(&self) -> usize {
        self.fail_count
    }

    pub fn skip_count(&self) -> usize {
        self.skip_count
    }

    pub fn total_count(&self) -> usize {
        self.pass_count + self.fail_count + self.skip_count
    }

    /// No passed and no failed case.
    pub fn is_empty_report(&self) -> bool {
        self.pass_count == 0 && self.fail_count == 0
    }

    pub fn suites(&self) -> &[SuiteResult] {
        &self.suites
    }

    pub fn suite(&self, name: &str) -> Option<&SuiteResult> {
        self.suites.iter().find(|s| s.name == name)
    }

    pub fn case(&self, suite: &str, name: &str) -> Option<&CaseResult> {
        self.suite(suite).and_then(|s| s.case(name))
    }

    pub fn timestamp_ms(&self) -> i64 {
        self.timestamp_ms
    }

    pub fn duration_secs(&self) -> f64 {
        self.suites.iter().map(SuiteResult::duration_secs).sum()
    }
}

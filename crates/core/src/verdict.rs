//! Build Verdict
//!
//! Ordered outcome of a run. The declaration order is the badness order:
//! `Success < Unstable < Failure < NotBuilt < Aborted`.

use serde::{Deserialize, Serialize};

/// Outcome of a run, ordered from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Success,
    Unstable,
    Failure,
    NotBuilt,
    Aborted,
}

impl Verdict {
    /// Whether `self` is strictly worse than `other`.
    pub fn is_worse_than(self, other: Verdict) -> bool {
        self > other
    }

    /// Whether `self` is worse than or equal to `other`.
    pub fn is_worse_or_equal_to(self, other: Verdict) -> bool {
        self >= other
    }

    /// Combine a freshly computed verdict with the verdict a run already
    /// carries from earlier steps.
    ///
    /// A pre-existing `NotBuilt` is ignored. Otherwise the run can only get
    /// worse: an equal-or-worse pre-existing verdict wins.
    pub fn combine(existing: Option<Verdict>, candidate: Verdict) -> Verdict {
        match existing {
            Some(previous)
                if previous != Verdict::NotBuilt && previous.is_worse_or_equal_to(candidate) =>
            {
                previous
            }
            _ => candidate,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Success => "SUCCESS",
            Verdict::Unstable => "UNSTABLE",
            Verdict::Failure => "FAILURE",
            Verdict::NotBuilt => "NOT_BUILT",
            Verdict::Aborted => "ABORTED",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Verdict {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SUCCESS" => Ok(Verdict::Success),
            "UNSTABLE" => Ok(Verdict::Unstable),
            "FAILURE" => Ok(Verdict::Failure),
            "NOT_BUILT" => Ok(Verdict::NotBuilt),
            "ABORTED" => Ok(Verdict::Aborted),
            other => Err(format!("Unknown verdict: {}", other)),
        }
    }
}

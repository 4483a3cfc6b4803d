//! Run History
//!
//! JSON files, one per run, holding the run's verdict and aggregate. Gives
//! the CLI what a job host would otherwise provide: the results already
//! recorded for the current run and the previous completed run used as the
//! threshold baseline.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use xunit_core::{RunContext, Verdict};
use xunit_gates::TestResultAggregate;

use crate::models::run::{CompletedRun, Run};
use crate::utils::error::{AppError, AppResult};
use crate::utils::paths::ensure_dir;

/// Stored state of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub run_id: String,
    pub started_at_ms: i64,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub verdict: Option<Verdict>,
    #[serde(default)]
    pub test_result: Option<TestResultAggregate>,
}

impl RunRecord {
    fn into_completed(self) -> CompletedRun {
        CompletedRun {
            run_id: self.run_id,
            verdict: self.verdict,
            test_result: self.test_result,
        }
    }
}

/// Directory of run records.
#[derive(Debug, Clone)]
pub struct RunHistory {
    dir: PathBuf,
}

impl RunHistory {
    /// Open (and create) a history directory.
    pub fn open(dir: impl Into<PathBuf>) -> AppResult<Self> {
        let dir = dir.into();
        ensure_dir(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, run_id: &str) -> AppResult<PathBuf> {
        validate_run_id(run_id)?;
        Ok(self.dir.join(format!("{}.json", run_id)))
    }

    pub fn load(&self, run_id: &str) -> AppResult<Option<RunRecord>> {
        let path = self.record_path(run_id)?;
        if !path.is_file() {
            return Ok(None);
        }
        read_record(&path).map(Some)
    }

    pub fn save(&self, record: &RunRecord) -> AppResult<()> {
        let path = self.record_path(&record.run_id)?;
        let content = serde_json::to_string_pretty(record)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Most recently started completed run other than `current_run_id`.
    pub fn latest_completed(&self, current_run_id: &str) -> AppResult<Option<CompletedRun>> {
        let mut latest: Option<RunRecord> = None;
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let record = match read_record(&path) {
                Ok(record) => record,
                Err(err) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %err,
                        "skipping unreadable run record"
                    );
                    continue;
                }
            };
            if !record.completed || record.run_id == current_run_id {
                continue;
            }
            // Ties on start time go to the greater run id
            let newer = latest
                .as_ref()
                .map(|l| {
                    (record.started_at_ms, record.run_id.as_str())
                        > (l.started_at_ms, l.run_id.as_str())
                })
                .unwrap_or(true);
            if newer {
                latest = Some(record);
            }
        }
        Ok(latest.map(RunRecord::into_completed))
    }

    /// Build the run to record into, restoring what earlier steps stored.
    pub fn prepare_run(&self, context: RunContext) -> AppResult<Run> {
        let run_id = context.run_id().to_string();
        let existing = self.load(&run_id)?;
        if existing.as_ref().map(|r| r.completed).unwrap_or(false) {
            return Err(AppError::validation(format!(
                "Run '{}' is already completed",
                run_id
            )));
        }

        let mut run = Run::new(context);
        if let Some(record) = existing {
            if let Some(verdict) = record.verdict {
                run = run.with_result(verdict);
            }
            if let Some(aggregate) = record.test_result {
                run = run.with_test_result(aggregate);
            }
        }
        if let Some(previous) = self.latest_completed(&run_id)? {
            run = run.with_previous(previous);
        }
        Ok(run)
    }

    /// Persist the run's current verdict and aggregate.
    pub fn store_run(&self, run: &Run, completed: bool) -> AppResult<()> {
        let context = run.context();
        self.save(&RunRecord {
            run_id: context.run_id().to_string(),
            started_at_ms: context.started_at_ms(),
            completed,
            verdict: run.result(),
            test_result: run.test_result().cloned(),
        })
    }
}

fn read_record(path: &Path) -> AppResult<RunRecord> {
    let content = fs::read_to_string(path)?;
    let mut record: RunRecord = serde_json::from_str(&content)?;
    if let Some(aggregate) = record.test_result.as_mut() {
        aggregate.tally();
    }
    Ok(record)
}

/// Run ids become file names.
fn validate_run_id(run_id: &str) -> AppResult<()> {
    let valid = !run_id.is_empty()
        && run_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        && run_id != "."
        && run_id != "..";
    if valid {
        Ok(())
    } else {
        Err(AppError::validation(format!("Invalid run id: '{}'", run_id)))
    }
}

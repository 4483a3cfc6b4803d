//! Run Context
//!
//! Read-only information about the run being recorded, supplied by the host
//! job lifecycle. Pipeline components only read it; nothing here is mutated
//! once the pipeline starts.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::log::{LogSink, RunLog};

/// Immutable context of the run the pipeline records into.
#[derive(Debug, Clone)]
pub struct RunContext {
    run_id: String,
    /// Workspace root as seen by the execution node.
    workspace: PathBuf,
    /// Run start, epoch milliseconds on the coordinator clock.
    started_at_ms: i64,
    env: HashMap<String, String>,
    log: RunLog,
}

impl RunContext {
    pub fn new(
        run_id: impl Into<String>,
        workspace: impl Into<PathBuf>,
        started_at_ms: i64,
        sink: Arc<dyn LogSink>,
    ) -> Self {
        Self {
            run_id: run_id.into(),
            workspace: workspace.into(),
            started_at_ms,
            env: HashMap::new(),
            log: RunLog::new(sink),
        }
    }

    /// Replace the environment variables.
    pub fn with_env(mut self, env: HashMap<String, String>) -> Self {
        self.env = env;
        self
    }

    /// Add a single environment variable.
    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn workspace(&self) -> &Path {
        &self.workspace
    }

    pub fn started_at_ms(&self) -> i64 {
        self.started_at_ms
    }

    pub fn env(&self) -> &HashMap<String, String> {
        &self.env
    }

    pub fn log(&self) -> &RunLog {
        &self.log
    }
}

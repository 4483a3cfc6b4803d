//! Run Log
//!
//! Human-readable log lines for a run. Every line written through `RunLog`
//! goes to the run's `LogSink` and is mirrored to `tracing`.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

/// Severity of a run log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warning,
    Error,
}

impl LogLevel {
    fn label(&self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
        }
    }
}

/// A single log line, as shipped back from an execution node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogLine {
    pub level: LogLevel,
    pub message: String,
}

impl LogLine {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    /// Console rendering, e.g. `[xUnit] WARNING - The file 'a.xml' is empty.`
    pub fn render(&self) -> String {
        format!("[xUnit] {} - {}", self.level.label(), self.message)
    }
}

/// Destination for human-readable run log lines.
pub trait LogSink: Send + Sync {
    fn write_line(&self, line: &LogLine);
}

/// Sink that keeps every line in memory.
///
/// Used by execution nodes to collect lines for the reply envelope, and by tests.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<LogLine>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the collected lines.
    pub fn lines(&self) -> Vec<LogLine> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }

    /// Drain the collected lines.
    pub fn take(&self) -> Vec<LogLine> {
        self.lines
            .lock()
            .map(|mut l| std::mem::take(&mut *l))
            .unwrap_or_default()
    }

    /// Rendered lines, convenient for assertions.
    pub fn rendered(&self) -> Vec<String> {
        self.lines().iter().map(LogLine::render).collect()
    }

    pub fn contains(&self, fragment: &str) -> bool {
        self.lines().iter().any(|l| l.message.contains(fragment))
    }
}

impl LogSink for MemorySink {
    fn write_line(&self, line: &LogLine) {
        let mut lines = self.lines.lock().unwrap_or_else(|e| e.into_inner());
        lines.push(line.clone());
    }
}

/// Sink printing rendered lines on stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrSink;

impl LogSink for StderrSink {
    fn write_line(&self, line: &LogLine) {
        eprintln!("{}", line.render());
    }
}

/// Logger handed to pipeline components.
#[derive(Clone)]
pub struct RunLog {
    sink: Arc<dyn LogSink>,
}

impl RunLog {
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self { sink }
    }

    pub fn info(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!("{}", message);
        self.sink.write_line(&LogLine::new(LogLevel::Info, message));
    }

    pub fn warn(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{}", message);
        self.sink.write_line(&LogLine::new(LogLevel::Warning, message));
    }

    pub fn error(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::error!("{}", message);
        self.sink.write_line(&LogLine::new(LogLevel::Error, message));
    }

    /// Replay lines produced elsewhere (typically on an execution node).
    pub fn replay(&self, lines: &[LogLine]) {
        for line in lines {
            match line.level {
                LogLevel::Info => tracing::info!(target: "xunit::node", "{}", line.message),
                LogLevel::Warning => tracing::warn!(target: "xunit::node", "{}", line.message),
                LogLevel::Error => tracing::error!(target: "xunit::node", "{}", line.message),
            }
            self.sink.write_line(line);
        }
    }
}

impl std::fmt::Debug for RunLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunLog").finish_non_exhaustive()
    }
}

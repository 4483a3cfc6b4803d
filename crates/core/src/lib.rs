//! xUnit Pipeline Core
//!
//! Foundational types for the xUnit report pipeline workspace. This crate has
//! no dependency on converters, thresholds or the execution-node machinery.
//!
//! ## Module Organization
//!
//! - `error` - Core error types (`CoreError`, `CoreResult`)
//! - `verdict` - Ordered run outcome and the verdict combination rule
//! - `context` - Read-only run context (`RunContext`)
//! - `log` - Human-readable run log (`LogSink`, `RunLog`, `MemorySink`)

pub mod context;
pub mod error;
pub mod log;
pub mod verdict;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::{CoreError, CoreResult};

// ── Verdict ────────────────────────────────────────────────────────────
pub use verdict::Verdict;

// ── Run Context & Log ──────────────────────────────────────────────────
pub use context::RunContext;
pub use log::{LogLevel, LogLine, LogSink, MemorySink, RunLog, StderrSink};

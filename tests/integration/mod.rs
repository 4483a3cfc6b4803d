//! Integration Tests Module
//!
//! End-to-end pipeline scenarios run against temporary workspaces: report
//! conversion and recording, threshold verdicts, generated report cleanup,
//! the channel transport and the run history.

// Shared workspace fixtures
mod fixtures;

// Full pipeline executions through the local node
mod pipeline_test;

// Pipeline executions through the channel transport
mod channel_test;

// Run history round trips across consecutive runs
mod history_test;

//! Execution Node Protocol
//!
//! Messages exchanged between the coordinator and the node that owns the
//! workspace. Only plain data crosses the boundary: read-only job settings
//! go out, a count / parsed aggregate / file content comes back, together
//! with the run log lines the node produced.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use xunit_core::{CoreError, LogLine};
use xunit_gates::TestResultAggregate;

use crate::models::tool::ToolConfig;

/// Everything a node needs to convert one tool's reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionJob {
    pub namespace: String,
    pub tool: ToolConfig,
    /// Pattern after normalisation and macro expansion
    pub pattern: String,
    /// Resolved stylesheet content, when the conversion is stylesheet driven
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stylesheet: Option<String>,
    /// Run start on the coordinator clock, epoch milliseconds
    pub build_time_ms: i64,
    pub test_time_margin_ms: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeRequest {
    /// Convert one tool's reports into the namespace directory
    Convert(ConversionJob),
    /// Parse every canonical report of the namespace
    ParseReports {
        namespace: String,
        build_time_ms: i64,
        coordinator_now_ms: i64,
    },
    /// Read a file by absolute path on the node
    ReadFile { path: PathBuf },
    /// Read a file relative to the node's workspace
    ReadWorkspaceFile { relative: String },
    /// Remove one tool's output directory, or the whole namespace when `tool` is `None`
    DeleteOutputs {
        namespace: String,
        tool: Option<String>,
    },
}

impl NodeRequest {
    pub fn kind(&self) -> &'static str {
        match self {
            NodeRequest::Convert(_) => "convert",
            NodeRequest::ParseReports { .. } => "parse_reports",
            NodeRequest::ReadFile { .. } => "read_file",
            NodeRequest::ReadWorkspaceFile { .. } => "read_workspace_file",
            NodeRequest::DeleteOutputs { .. } => "delete_outputs",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeResponse {
    Converted { processed: usize },
    Parsed { aggregate: TestResultAggregate },
    /// `None` when the file does not exist on the node
    File { content: Option<String> },
    Deleted { existed: bool },
}

/// Failure category carried back from a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultKind {
    NoTestFound,
    OutdatedReports,
    Conversion,
    Config,
    Io,
    Internal,
}

/// Error raised on a node, flattened to plain data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeFault {
    pub kind: FaultKind,
    pub message: String,
}

impl NodeFault {
    pub fn new(kind: FaultKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Rebuild the coordinator-side error.
    pub fn into_core_error(self) -> CoreError {
        match self.kind {
            FaultKind::NoTestFound => CoreError::NoTestFound(self.message),
            FaultKind::OutdatedReports => CoreError::OutdatedReports(self.message),
            FaultKind::Conversion => CoreError::Conversion(self.message),
            FaultKind::Config => CoreError::Config(self.message),
            FaultKind::Io => CoreError::Io(std::io::Error::other(self.message)),
            FaultKind::Internal => CoreError::Internal(self.message),
        }
    }
}

impl From<CoreError> for NodeFault {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NoTestFound(msg) => NodeFault::new(FaultKind::NoTestFound, msg),
            CoreError::OutdatedReports(msg) => NodeFault::new(FaultKind::OutdatedReports, msg),
            CoreError::Conversion(msg) => NodeFault::new(FaultKind::Conversion, msg),
            CoreError::Config(msg) | CoreError::NotFound(msg) | CoreError::Validation(msg) => {
                NodeFault::new(FaultKind::Config, msg)
            }
            CoreError::Io(e) => NodeFault::new(FaultKind::Io, e.to_string()),
            other => NodeFault::new(FaultKind::Internal, other.to_string()),
        }
    }
}

/// A node's reply: the log lines it wrote plus the outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeEnvelope {
    pub log: Vec<LogLine>,
    pub outcome: Result<NodeResponse, NodeFault>,
}

impl NodeEnvelope {
    pub fn ok(log: Vec<LogLine>, response: NodeResponse) -> Self {
        Self {
            log,
            outcome: Ok(response),
        }
    }

    pub fn fault(log: Vec<LogLine>, fault: NodeFault) -> Self {
        Self {
            log,
            outcome: Err(fault),
        }
    }
}

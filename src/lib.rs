//! xUnit Pipeline - Report Processing Library
//!
//! Turns the heterogeneous test reports a job produces into one run-level
//! test result and a build verdict. It includes:
//! - Execution node protocol with local and channel transports
//! - Conversion, recording, threshold evaluation and cleanup services
//! - Storage layer (TOML configuration, JSON run history)
//! - Data models and utilities

pub mod models;
pub mod services;
pub mod storage;
pub mod utils;

pub use models::run::{CompletedRun, Run};
pub use models::settings::{ExtraConfiguration, PipelineConfig};
pub use models::tool::ToolConfig;
pub use services::node::{ChannelNode, ExecutionNode, LocalNode, NodeHandler};
pub use services::{ProcessOutcome, ReportProcessor};
pub use storage::config::load_pipeline_config;
pub use storage::history::{RunHistory, RunRecord};
pub use utils::error::{AppError, AppResult};

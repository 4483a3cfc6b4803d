//! Settings Models
//!
//! Pipeline configuration loaded from TOML.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use xunit_gates::{Threshold, ThresholdMode};

use crate::models::tool::ToolConfig;

fn default_test_time_margin_ms() -> i64 {
    3000
}

/// Settings shared by every tool of a pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtraConfiguration {
    /// Tolerance applied to the run start when checking report freshness
    #[serde(default = "default_test_time_margin_ms")]
    pub test_time_margin_ms: i64,
    /// Directory holding `<tool>.xsl` overrides for the built-in formats
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_stylesheet_dir: Option<PathBuf>,
}

impl Default for ExtraConfiguration {
    fn default() -> Self {
        Self {
            test_time_margin_ms: default_test_time_margin_ms(),
            user_stylesheet_dir: None,
        }
    }
}

/// Full pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub threshold_mode: ThresholdMode,
    #[serde(default)]
    pub extra: ExtraConfiguration,
    #[serde(default)]
    pub tools: Vec<ToolConfig>,
    #[serde(default)]
    pub thresholds: Vec<Threshold>,
}

impl PipelineConfig {
    pub fn new(tools: Vec<ToolConfig>) -> Self {
        Self {
            threshold_mode: ThresholdMode::default(),
            extra: ExtraConfiguration::default(),
            tools,
            thresholds: Vec::new(),
        }
    }

    pub fn with_threshold(mut self, threshold: Threshold) -> Self {
        self.thresholds.push(threshold);
        self
    }

    pub fn with_mode(mut self, mode: ThresholdMode) -> Self {
        self.threshold_mode = mode;
        self
    }

    pub fn with_extra(mut self, extra: ExtraConfiguration) -> Self {
        self.extra = extra;
        self
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.tools.is_empty() {
            return Err("At least one tool must be configured".to_string());
        }
        for (index, tool) in self.tools.iter().enumerate() {
            tool.validate()
                .map_err(|e| format!("tools[{}] ({}): {}", index, tool.format, e))?;
        }
        for (index, threshold) in self.thresholds.iter().enumerate() {
            threshold
                .validate()
                .map_err(|e| format!("thresholds[{}]: {}", index, e))?;
        }
        if self.extra.test_time_margin_ms < 0 {
            return Err("test_time_margin_ms must not be negative".to_string());
        }
        Ok(())
    }
}

//! TOML Configuration Loading
//!
//! Reads and validates the pipeline configuration file.

use std::fs;
use std::path::Path;

use crate::models::settings::PipelineConfig;
use crate::utils::error::{AppError, AppResult};

/// Load a pipeline configuration and validate it.
pub fn load_pipeline_config(path: &Path) -> AppResult<PipelineConfig> {
    if !path.is_file() {
        return Err(AppError::not_found(format!(
            "Configuration file '{}' does not exist",
            path.display()
        )));
    }
    let content = fs::read_to_string(path)?;
    parse_pipeline_config(&content)
}

/// Parse and validate configuration text.
pub fn parse_pipeline_config(content: &str) -> AppResult<PipelineConfig> {
    let config: PipelineConfig = toml::from_str(content)?;
    config.validate().map_err(AppError::config)?;
    Ok(config)
}

/// Write a configuration back as TOML.
pub fn save_pipeline_config(path: &Path, config: &PipelineConfig) -> AppResult<()> {
    config.validate().map_err(AppError::config)?;
    let content = toml::to_string_pretty(config)
        .map_err(|e| AppError::internal(format!("Failed to serialize configuration: {}", e)))?;
    fs::write(path, content)?;
    Ok(())
}

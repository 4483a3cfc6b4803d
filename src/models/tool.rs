//! Tool Models
//!
//! One configured tool invocation: which report format to read, where the
//! raw reports are, and how failures are handled.

use serde::{Deserialize, Serialize};

use xunit_converters::CUSTOM_FORMAT;

fn default_true() -> bool {
    true
}

/// Immutable configuration of one tool invocation within a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolConfig {
    /// Registry format identifier (`junit`, `googletest`, `nunit`, `custom`)
    pub format: String,
    /// Raw include pattern; may contain `$VAR` macros and line breaks
    #[serde(default)]
    pub pattern: String,
    /// Treat "no file matched" as zero processed instead of an error
    #[serde(default)]
    pub skip_no_test_files: bool,
    /// Every matched report must be newer than the run start
    #[serde(default = "default_true")]
    pub fail_if_not_new: bool,
    /// Remove this tool's generated reports after recording
    #[serde(default = "default_true")]
    pub delete_output_files: bool,
    /// Abort the whole pipeline on this tool's errors
    #[serde(default = "default_true")]
    pub stop_processing_if_error: bool,
    /// Stylesheet location for the `custom` format: URL, absolute or workspace-relative path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_xsl: Option<String>,
}

impl ToolConfig {
    pub fn new(format: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            pattern: pattern.into(),
            skip_no_test_files: false,
            fail_if_not_new: true,
            delete_output_files: true,
            stop_processing_if_error: true,
            custom_xsl: None,
        }
    }

    /// A `custom` tool driven by the given stylesheet location.
    pub fn custom(pattern: impl Into<String>, stylesheet: impl Into<String>) -> Self {
        Self::new(CUSTOM_FORMAT, pattern).with_custom_xsl(stylesheet)
    }

    pub fn with_skip_no_test_files(mut self, skip: bool) -> Self {
        self.skip_no_test_files = skip;
        self
    }

    pub fn with_fail_if_not_new(mut self, fail: bool) -> Self {
        self.fail_if_not_new = fail;
        self
    }

    pub fn with_delete_output_files(mut self, delete: bool) -> Self {
        self.delete_output_files = delete;
        self
    }

    pub fn with_stop_processing_if_error(mut self, stop: bool) -> Self {
        self.stop_processing_if_error = stop;
        self
    }

    pub fn with_custom_xsl(mut self, location: impl Into<String>) -> Self {
        self.custom_xsl = Some(location.into());
        self
    }

    /// Per-tool output directory name.
    pub fn tool_name(&self) -> &str {
        &self.format
    }

    pub fn is_custom(&self) -> bool {
        self.format == CUSTOM_FORMAT
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.format.trim().is_empty() {
            return Err("Tool format must not be empty".to_string());
        }
        if self.format.contains(['/', '\\']) || self.format == "." || self.format == ".." {
            return Err(format!("Invalid tool format: {}", self.format));
        }
        let has_xsl = self
            .custom_xsl
            .as_deref()
            .map(|s| !s.trim().is_empty())
            .unwrap_or(false);
        if self.is_custom() && !has_xsl {
            return Err("The custom tool requires a 'custom_xsl' stylesheet".to_string());
        }
        Ok(())
    }
}

//! Workspace Path Utilities
//!
//! Layout of the generated canonical reports inside a workspace:
//! `<workspace>/generatedJUnitFiles/<namespace>/<tool>/REPORT-<uuid>.xml`

use std::path::{Path, PathBuf};

use crate::utils::error::AppResult;

/// Directory under the workspace holding every generated canonical report.
pub const GENERATED_DIR: &str = "generatedJUnitFiles";

/// File name prefix of canonical reports.
pub const REPORT_PREFIX: &str = "REPORT-";

/// Pattern, relative to a namespace directory, matching canonical reports.
pub const REPORT_PATTERN: &str = "**/REPORT-*.xml";

/// `<workspace>/generatedJUnitFiles`
pub fn generated_root(workspace: &Path) -> PathBuf {
    workspace.join(GENERATED_DIR)
}

/// `<workspace>/generatedJUnitFiles/<namespace>`
pub fn namespace_dir(workspace: &Path, namespace: &str) -> PathBuf {
    generated_root(workspace).join(namespace)
}

/// `<workspace>/generatedJUnitFiles/<namespace>/<tool>`
pub fn tool_dir(workspace: &Path, namespace: &str, tool: &str) -> PathBuf {
    namespace_dir(workspace, namespace).join(tool)
}

/// Fresh output file name for one converted report.
pub fn report_file_name() -> String {
    format!("{}{}.xml", REPORT_PREFIX, uuid::Uuid::new_v4())
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> AppResult<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

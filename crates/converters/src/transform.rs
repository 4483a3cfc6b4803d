//! Stylesheet transform engine
//!
//! The XSLT engine is a black box behind `XslTransformer`. The default
//! implementation shells out to `xsltproc`.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use xunit_core::{CoreError, CoreResult};

/// Applies a stylesheet to an input document, writing the result to `output`.
pub trait XslTransformer: Send + Sync {
    fn transform(&self, input: &Path, stylesheet: &str, output: &Path) -> CoreResult<()>;
}

/// `xsltproc`-backed transformer.
#[derive(Debug, Clone)]
pub struct XsltprocTransformer {
    program: PathBuf,
}

impl XsltprocTransformer {
    pub fn new() -> Self {
        Self {
            program: PathBuf::from("xsltproc"),
        }
    }

    /// Use a specific executable instead of `xsltproc` from `PATH`.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for XsltprocTransformer {
    fn default() -> Self {
        Self::new()
    }
}

impl XslTransformer for XsltprocTransformer {
    fn transform(&self, input: &Path, stylesheet: &str, output: &Path) -> CoreResult<()> {
        let mut sheet = tempfile::Builder::new()
            .prefix("xunit-")
            .suffix(".xsl")
            .tempfile()?;
        sheet.write_all(stylesheet.as_bytes())?;
        sheet.flush()?;

        let result = Command::new(&self.program)
            .arg("--output")
            .arg(output)
            .arg(sheet.path())
            .arg(input)
            .output()
            .map_err(|e| {
                CoreError::conversion(format!(
                    "Failed to run '{}': {}",
                    self.program.display(),
                    e
                ))
            })?;

        if !result.status.success() {
            return Err(CoreError::conversion(format!(
                "Stylesheet transform of '{}' failed: {}",
                input.display(),
                String::from_utf8_lossy(&result.stderr).trim()
            )));
        }
        tracing::debug!(input = %input.display(), output = %output.display(), "stylesheet applied");
        Ok(())
    }
}

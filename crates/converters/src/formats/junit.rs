//! JUnit reports are already canonical; conversion is a copy.

use std::path::Path;

use xunit_core::CoreResult;

use crate::converter::FormatConverter;
use crate::validation::{validate_canonical, ValidationResult};

#[derive(Debug, Clone, Copy, Default)]
pub struct JUnitConverter;

impl JUnitConverter {
    pub const NAME: &'static str = "junit";
}

impl FormatConverter for JUnitConverter {
    fn tool_name(&self) -> &str {
        Self::NAME
    }

    fn validate_input(&self, input: &Path) -> ValidationResult {
        validate_canonical(input)
    }

    fn convert(&self, input: &Path, output: &Path) -> CoreResult<()> {
        std::fs::copy(input, output)?;
        Ok(())
    }
}

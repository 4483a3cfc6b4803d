//! Stylesheet-driven conversion.
//!
//! Used for the `custom` format and whenever a user stylesheet overrides a
//! built-in format. The input only has to be well-formed XML.

use std::path::Path;
use std::sync::Arc;

use xunit_core::CoreResult;

use crate::converter::FormatConverter;
use crate::transform::XslTransformer;
use crate::validation::{validate_well_formed, ValidationResult};

pub struct XslConverter {
    name: String,
    stylesheet: String,
    transformer: Arc<dyn XslTransformer>,
}

impl XslConverter {
    pub fn new(
        name: impl Into<String>,
        stylesheet: impl Into<String>,
        transformer: Arc<dyn XslTransformer>,
    ) -> Self {
        Self {
            name: name.into(),
            stylesheet: stylesheet.into(),
            transformer,
        }
    }
}

impl FormatConverter for XslConverter {
    fn tool_name(&self) -> &str {
        &self.name
    }

    fn validate_input(&self, input: &Path) -> ValidationResult {
        validate_well_formed(input)
    }

    fn convert(&self, input: &Path, output: &Path) -> CoreResult<()> {
        self.transformer.transform(input, &self.stylesheet, output)
    }
}

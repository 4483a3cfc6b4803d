//! Format converter contract and registry
//!
//! - `FormatConverter` - validate input, convert to the canonical format, validate output
//! - `ConverterRegistry` - format identifier -> converter constructor, insertion ordered
//!
//! Collaborators a converter needs (the transform engine, a resolved
//! stylesheet) are handed to its constructor through `ConverterSettings`.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use xunit_core::{CoreError, CoreResult};

use crate::formats::{GoogleTestConverter, JUnitConverter, NUnitConverter, XslConverter};
use crate::transform::XslTransformer;
use crate::validation::{validate_canonical, ValidationResult};

/// Converts one tool's report format into the canonical JUnit format.
pub trait FormatConverter: Send + Sync {
    /// Tool name; also the per-tool output directory name.
    fn tool_name(&self) -> &str;

    /// Check a raw report before converting it.
    fn validate_input(&self, input: &Path) -> ValidationResult;

    /// Write the canonical form of `input` to `output`.
    fn convert(&self, input: &Path, output: &Path) -> CoreResult<()>;

    /// Check a converted report against the canonical format.
    fn validate_output(&self, output: &Path) -> ValidationResult {
        validate_canonical(output)
    }
}

/// Everything a converter constructor may need.
#[derive(Clone)]
pub struct ConverterSettings {
    pub transformer: Arc<dyn XslTransformer>,
    /// Resolved stylesheet content; required by `custom`, an override for built-ins.
    pub stylesheet: Option<String>,
}

/// Builds a converter for one tool invocation.
pub type ConverterFactory =
    Arc<dyn Fn(&ConverterSettings) -> CoreResult<Box<dyn FormatConverter>> + Send + Sync>;

/// Format identifier of the stylesheet-driven converter.
pub const CUSTOM_FORMAT: &str = "custom";

/// Registry of converter constructors keyed by format identifier.
pub struct ConverterRegistry {
    factories: HashMap<String, ConverterFactory>,
    /// Insertion order for deterministic listing.
    order: Vec<String>,
    transformer: Arc<dyn XslTransformer>,
}

impl ConverterRegistry {
    /// Create an empty registry.
    pub fn new(transformer: Arc<dyn XslTransformer>) -> Self {
        Self {
            factories: HashMap::new(),
            order: Vec::new(),
            transformer,
        }
    }

    /// Registry preloaded with `junit`, `googletest`, `nunit` and `custom`.
    pub fn with_builtins(transformer: Arc<dyn XslTransformer>) -> Self {
        let mut registry = Self::new(transformer);
        registry.register(JUnitConverter::NAME, Arc::new(junit_factory));
        registry.register(GoogleTestConverter::NAME, Arc::new(googletest_factory));
        registry.register(NUnitConverter::NAME, Arc::new(nunit_factory));
        registry.register(CUSTOM_FORMAT, Arc::new(custom_factory));
        registry
    }

    /// Register a constructor. Replaces any existing one for the same format.
    pub fn register(&mut self, format: &str, factory: ConverterFactory) {
        if !self.factories.contains_key(format) {
            self.order.push(format.to_string());
        }
        self.factories.insert(format.to_string(), factory);
    }

    pub fn contains(&self, format: &str) -> bool {
        self.factories.contains_key(format)
    }

    /// Registered formats in registration order.
    pub fn formats(&self) -> Vec<String> {
        self.order.clone()
    }

    /// Construct the converter for `format`.
    ///
    /// Returns `Err(CoreError::NotFound)` if the format is not registered.
    pub fn create(
        &self,
        format: &str,
        stylesheet: Option<String>,
    ) -> CoreResult<Box<dyn FormatConverter>> {
        let factory = self
            .factories
            .get(format)
            .ok_or_else(|| CoreError::not_found(format!("No converter registered for format '{}'", format)))?;
        let settings = ConverterSettings {
            transformer: Arc::clone(&self.transformer),
            stylesheet,
        };
        factory(&settings)
    }
}

fn junit_factory(settings: &ConverterSettings) -> CoreResult<Box<dyn FormatConverter>> {
    Ok(native_or_stylesheet(JUnitConverter::NAME, settings, Box::new(JUnitConverter)))
}

fn googletest_factory(settings: &ConverterSettings) -> CoreResult<Box<dyn FormatConverter>> {
    Ok(native_or_stylesheet(
        GoogleTestConverter::NAME,
        settings,
        Box::new(GoogleTestConverter),
    ))
}

fn nunit_factory(settings: &ConverterSettings) -> CoreResult<Box<dyn FormatConverter>> {
    Ok(native_or_stylesheet(NUnitConverter::NAME, settings, Box::new(NUnitConverter)))
}

fn custom_factory(settings: &ConverterSettings) -> CoreResult<Box<dyn FormatConverter>> {
    let stylesheet = settings
        .stylesheet
        .clone()
        .ok_or_else(|| CoreError::config("The custom tool requires a stylesheet."))?;
    Ok(Box::new(XslConverter::new(
        CUSTOM_FORMAT,
        stylesheet,
        Arc::clone(&settings.transformer),
    )))
}

/// A user stylesheet, when present, replaces the native conversion.
fn native_or_stylesheet(
    name: &str,
    settings: &ConverterSettings,
    native: Box<dyn FormatConverter>,
) -> Box<dyn FormatConverter> {
    match &settings.stylesheet {
        Some(sheet) => Box::new(XslConverter::new(
            name,
            sheet.clone(),
            Arc::clone(&settings.transformer),
        )),
        None => native,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::XsltprocTransformer;

    struct EchoConverter;

    impl FormatConverter for EchoConverter {
        fn tool_name(&self) -> &str {
            "echo"
        }

        fn validate_input(&self, _input: &Path) -> ValidationResult {
            Ok(())
        }

        fn convert(&self, input: &Path, output: &Path) -> CoreResult<()> {
            std::fs::copy(input, output)?;
            Ok(())
        }
    }

    fn registry() -> ConverterRegistry {
        ConverterRegistry::with_builtins(Arc::new(XsltprocTransformer::new()))
    }

    #[test]
    fn test_builtin_formats_in_order() {
        assert_eq!(
            registry().formats(),
            vec!["junit", "googletest", "nunit", "custom"]
        );
    }

    #[test]
    fn test_create_native_converter() {
        let converter = registry().create("nunit", None).unwrap();
        assert_eq!(converter.tool_name(), "nunit");
    }

    #[test]
    fn test_unknown_format() {
        let err = registry().create("cppunit", None).err().unwrap();
        assert!(matches!(err, CoreError::NotFound(_)));
    }

    #[test]
    fn test_custom_requires_stylesheet() {
        let err = registry().create("custom", None).err().unwrap();
        assert!(matches!(err, CoreError::Config(_)));
        assert!(registry()
            .create("custom", Some("<xsl:stylesheet/>".into()))
            .is_ok());
    }

    #[test]
    fn test_stylesheet_override_keeps_tool_name() {
        let converter = registry()
            .create("junit", Some("<xsl:stylesheet/>".into()))
            .unwrap();
        assert_eq!(converter.tool_name(), "junit");
    }

    #[test]
    fn test_register_custom_factory() {
        let mut registry = registry();
        let echo: ConverterFactory = Arc::new(|_: &ConverterSettings| {
            Ok(Box::new(EchoConverter) as Box<dyn FormatConverter>)
        });
        registry.register("echo", Arc::clone(&echo));
        registry.register("echo", echo);
        assert!(registry.contains("echo"));
        assert_eq!(registry.formats().len(), 5);

        let converter = registry.create("echo", None).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.xml");
        std::fs::write(&input, "<testsuite name='s'/>").unwrap();
        let output = dir.path().join("out.xml");
        converter.convert(&input, &output).unwrap();
        assert!(converter.validate_output(&output).is_ok());
    }
}

//! xUnit Pipeline Converters
//!
//! Per-tool format conversion into the canonical JUnit report format:
//!
//! - `xml` - Minimal element tree over quick-xml
//! - `validation` - `ValidationError` and canonical report checks
//! - `converter` - `FormatConverter` contract and `ConverterRegistry`
//! - `transform` - Stylesheet engine black box (`XslTransformer`)
//! - `formats` - Built-in converters (junit, googletest, nunit, stylesheet-driven)

pub mod converter;
pub mod formats;
pub mod transform;
pub mod validation;
pub mod xml;

// Re-export the converter contract
pub use converter::{
    ConverterFactory, ConverterRegistry, ConverterSettings, FormatConverter, CUSTOM_FORMAT,
};

// Re-export built-in formats
pub use formats::{GoogleTestConverter, JUnitConverter, NUnitConverter, XslConverter};

// Re-export validation and transform types
pub use transform::{XslTransformer, XsltprocTransformer};
pub use validation::{ValidationError, ValidationResult};
pub use xml::XmlElement;

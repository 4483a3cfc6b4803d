//! Built-in report formats.

mod googletest;
mod junit;
mod nunit;
mod xsl;

pub use googletest::GoogleTestConverter;
pub use junit::JUnitConverter;
pub use nunit::NUnitConverter;
pub use xsl::XslConverter;

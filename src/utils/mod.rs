//! Utilities
//!
//! Common utilities used throughout the pipeline.

pub mod error;
pub mod paths;

pub use error::*;
pub use paths::*;

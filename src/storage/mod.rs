//! Storage Layer
//!
//! Pipeline configuration files and the JSON run history.

pub mod config;
pub mod history;

pub use config::*;
pub use history::*;

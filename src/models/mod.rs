//! Data Models
//!
//! Configuration and run state used throughout the pipeline.

pub mod run;
pub mod settings;
pub mod tool;

pub use run::*;
pub use settings::*;
pub use tool::*;

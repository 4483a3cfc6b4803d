//! Services
//!
//! Pipeline building blocks. Modules marked (node) run next to the
//! workspace files; the rest run on the coordinator.
//!
//! - `pattern` - pattern normalisation, macro expansion and globbing
//! - `conversion` - per-tool report conversion (node)
//! - `recorder` - canonical report parsing (node) and run-level merge
//! - `stylesheet` - custom and user stylesheet resolution
//! - `lifecycle` - generated report cleanup
//! - `node` - execution node protocol and transports
//! - `processor` - `ReportProcessor` coordinator

pub mod conversion;
pub mod lifecycle;
pub mod node;
pub mod pattern;
pub mod processor;
pub mod recorder;
pub mod stylesheet;

pub use processor::{ProcessOutcome, ReportProcessor};

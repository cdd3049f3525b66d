//! Logging and observability
//!
//! Structured logging with configurable levels, console output, and an
//! optional rotating JSON log file. No log record is ever the only place an
//! error is surfaced: every swallowed error path in the listener and
//! pipeline goes through `tracing` here.

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

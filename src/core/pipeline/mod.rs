//! Extract-transform-load pipeline

pub mod orchestrator;
pub mod outcome;

pub use orchestrator::{ItemBatchHandler, PipelineOrchestrator};
pub use outcome::{CycleSummary, PipelineOutcome};

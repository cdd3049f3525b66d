//! Core engine
//!
//! The pure and orchestrating pieces of the system: cursor tracking, batch
//! dedup, the item pipeline, and the supervisor restart loop. Nothing here
//! talks to the network directly; adapters are injected through traits.

pub mod cursor;
pub mod dedup;
pub mod pipeline;
pub mod supervisor;

pub use cursor::{Cursor, CursorStore, FileCursorStore, MemoryCursorStore};
pub use dedup::{plan_batch, BatchPlan};
pub use pipeline::{CycleSummary, ItemBatchHandler, PipelineOrchestrator, PipelineOutcome};
pub use supervisor::{RetryPolicy, Supervisor};

//! Cursor tracking and persistence
//!
//! The cursor survives restarts and is the only shared mutable state in the
//! system: written by the listener after each fetch cycle, read at cycle
//! start, never touched concurrently.

pub mod cursor;
pub mod store;

pub use cursor::Cursor;
pub use store::{CursorStore, FileCursorStore, MemoryCursorStore};

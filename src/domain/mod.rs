//! Domain models and types for pushcal.
//!
//! This module contains the core domain models shared by every layer:
//!
//! - **Inbound items** ([`Item`], [`ItemPayload`]) - one push from the source
//! - **Calendar events** ([`CalendarEvent`]) - the structured-extraction output
//! - **Error types** ([`PushcalError`] and its per-layer sub-errors)
//! - **Result type alias** ([`Result`])
//!
//! Errors are grouped by blast radius rather than by collaborator: a
//! [`TransportError`] restarts the connection, a [`FetchError`] aborts one
//! cycle, an [`ItemError`] skips one item, and a [`PersistenceError`] only
//! degrades cursor durability.

pub mod errors;
pub mod event;
pub mod item;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::{FetchError, ItemError, PersistenceError, PushcalError, TransportError};
pub use event::CalendarEvent;
pub use item::{Item, ItemPayload};
pub use result::Result;

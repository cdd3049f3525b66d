// pushcal - Push notification to calendar ingestion
// Licensed under the MIT License

//! # pushcal
//!
//! pushcal listens to a push-notification stream, extracts calendar events
//! from whatever the user pushes (screenshots, links, notes), and writes
//! them to a calendar.
//!
//! ## Overview
//!
//! The pipeline for each push is:
//! - **Extract** - OCR for images, page-text scraping for links, note
//!   bodies verbatim
//! - **Transform** - a structured-extraction model turns the text into an
//!   event with title, location, and times
//! - **Load** - the event is written to the configured calendar
//! - **Acknowledge** - a link push with the created event is sent back to
//!   the user's devices
//!
//! Progress is tracked with a durable cursor over `{iden, modified}` of the
//! newest fetched push, persisted after each fetch cycle. Delivery is
//! at-least-once: a crash mid-batch re-delivers the whole batch.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Cursor tracking, batch dedup, pipeline, supervisor
//! - [`adapters`] - External integrations (push source, OCR, model, calendar)
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pushcal::adapters::pushsource::PushClient;
//! use pushcal::config::load_config;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("pushcal.toml")?;
//! let client = PushClient::new(config.source.clone());
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;

// Re-export main types at crate root
pub use domain::{PushcalError, Result};

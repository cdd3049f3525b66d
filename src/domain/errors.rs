//! Domain error types
//!
//! This module defines the error hierarchy for pushcal. All errors are
//! domain-specific and don't expose third-party types. The taxonomy mirrors
//! the blast radius of each failure: transport errors kill the current
//! connection, fetch errors abort one cycle, item errors skip one item, and
//! persistence errors degrade to at-least-once re-delivery.

use thiserror::Error;

/// Main pushcal error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum PushcalError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Stream/connection failures - fatal to the current connection,
    /// propagated to the supervisor for a restart
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// List-endpoint failures - abort the current fetch cycle, cursor unchanged
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Extract/transform/load failure for a single item - logged and skipped
    #[error("Item processing error: {0}")]
    Item(#[from] ItemError),

    /// Cursor read/write failures
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Notification-stream transport errors
///
/// Any of these while connected transitions the listener to `Disconnected`
/// and propagates to the supervisor. The listener never retries internally.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Failed to establish the stream connection
    #[error("Failed to connect to notification stream: {0}")]
    ConnectFailed(String),

    /// The stream closed unexpectedly
    #[error("Notification stream closed: {0}")]
    StreamClosed(String),

    /// The stream delivered a frame we could not handle
    #[error("Stream protocol error: {0}")]
    Protocol(String),
}

/// List-endpoint errors
///
/// These abort the in-flight fetch cycle without touching the cursor;
/// the next change signal retries naturally.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Request could not be sent or the connection dropped mid-request
    #[error("List request failed: {0}")]
    RequestFailed(String),

    /// The endpoint answered with a non-success status
    #[error("List endpoint returned {status}: {message}")]
    ServerError { status: u16, message: String },

    /// The response body did not match the expected shape
    #[error("Invalid list response: {0}")]
    InvalidResponse(String),
}

/// Per-item pipeline errors
///
/// One of these fails a single item; the batch continues and the cursor
/// still advances past the whole fetched batch.
#[derive(Debug, Error)]
pub enum ItemError {
    /// Image download failed
    #[error("Failed to download file: {0}")]
    Download(String),

    /// Image bytes could not be decoded or re-encoded
    #[error("Image processing failed: {0}")]
    Image(String),

    /// The OCR service reported a processing error
    #[error("OCR failed: {0}")]
    Ocr(String),

    /// Fetching the linked page failed
    #[error("Failed to fetch page: {0}")]
    PageFetch(String),

    /// Extraction produced no usable text
    #[error("No extractable text: {0}")]
    EmptyText(String),

    /// The structured-extraction model call failed
    #[error("Event extraction failed: {0}")]
    EventParse(String),

    /// The calendar API rejected the write
    #[error("Calendar write failed: {0}")]
    CalendarWrite(String),

    /// Sending the acknowledgement push failed
    #[error("Acknowledgement failed: {0}")]
    Acknowledge(String),
}

/// Cursor persistence errors
///
/// Read failures degrade to "no cursor, start clean"; write failures are
/// logged but never block the listener (next cycle persists again).
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Cursor file could not be read
    #[error("Failed to read cursor: {0}")]
    Read(String),

    /// Cursor file could not be written
    #[error("Failed to write cursor: {0}")]
    Write(String),

    /// Cursor file contents did not parse
    #[error("Corrupt cursor record: {0}")]
    Corrupt(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for PushcalError {
    fn from(err: std::io::Error) -> Self {
        PushcalError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for PushcalError {
    fn from(err: serde_json::Error) -> Self {
        PushcalError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for PushcalError {
    fn from(err: toml::de::Error) -> Self {
        PushcalError::Configuration(format!("TOML parse error: {err}"))
    }
}

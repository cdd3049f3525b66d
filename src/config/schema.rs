//! Configuration schema types
//!
//! This module defines the configuration structure for pushcal. The root
//! [`PushcalConfig`] maps one-to-one onto the TOML file.

use crate::config::SecretString;
use serde::{Deserialize, Serialize};

/// Main pushcal configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushcalConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Notification source (stream + list + send endpoints)
    pub source: SourceConfig,

    /// OCR collaborator settings
    pub ocr: OcrConfig,

    /// Structured-extraction model settings
    pub model: ModelConfig,

    /// Calendar write settings
    pub calendar: CalendarConfig,

    /// Supervisor restart policy
    #[serde(default)]
    pub supervisor: SupervisorConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl PushcalConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.source.validate()?;
        self.ocr.validate()?;
        self.model.validate()?;
        self.calendar.validate()?;
        self.supervisor.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// Notification source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Base URL of the REST API (list + send endpoints)
    #[serde(default = "default_source_base_url")]
    pub base_url: String,

    /// WebSocket stream URL (the access token is appended as a path segment)
    #[serde(default = "default_stream_url")]
    pub stream_url: String,

    /// API access token
    pub access_token: SecretString,

    /// Device whose pushes this instance processes
    pub device_iden: String,

    /// Maximum number of items per list request
    #[serde(default = "default_batch_limit")]
    pub batch_limit: usize,

    /// Request timeout for list/send calls
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl SourceConfig {
    fn validate(&self) -> Result<(), String> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(format!("source.base_url must be http(s): {}", self.base_url));
        }
        if !self.stream_url.starts_with("ws://") && !self.stream_url.starts_with("wss://") {
            return Err(format!(
                "source.stream_url must be ws(s): {}",
                self.stream_url
            ));
        }
        if self.device_iden.trim().is_empty() {
            return Err("source.device_iden must not be empty".to_string());
        }
        if self.batch_limit == 0 || self.batch_limit > 500 {
            return Err(format!(
                "source.batch_limit must be between 1 and 500, got {}",
                self.batch_limit
            ));
        }
        Ok(())
    }
}

/// OCR collaborator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrConfig {
    /// OCR service endpoint
    #[serde(default = "default_ocr_endpoint")]
    pub endpoint: String,

    /// OCR service API key
    pub api_key: SecretString,

    /// OCR engine selector (service-specific, 1-3)
    #[serde(default = "default_ocr_engine")]
    pub engine: u8,

    /// Byte ceiling the OCR service accepts; larger images are resized once
    #[serde(default = "default_file_size_ceiling")]
    pub file_size_ceiling_bytes: usize,
}

impl OcrConfig {
    fn validate(&self) -> Result<(), String> {
        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(format!("ocr.endpoint must be http(s): {}", self.endpoint));
        }
        if !(1..=3).contains(&self.engine) {
            return Err(format!("ocr.engine must be 1-3, got {}", self.engine));
        }
        if self.file_size_ceiling_bytes == 0 {
            return Err("ocr.file_size_ceiling_bytes must be positive".to_string());
        }
        Ok(())
    }
}

/// Structured-extraction model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Chat-completions style endpoint
    pub endpoint: String,

    /// Model name to request
    pub name: String,

    /// Optional bearer token for the endpoint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<SecretString>,

    /// Request timeout; model calls can be slow
    #[serde(default = "default_model_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl ModelConfig {
    fn validate(&self) -> Result<(), String> {
        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(format!("model.endpoint must be http(s): {}", self.endpoint));
        }
        if self.name.trim().is_empty() {
            return Err("model.name must not be empty".to_string());
        }
        Ok(())
    }
}

/// Calendar write configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// Calendar REST API base URL
    #[serde(default = "default_calendar_base_url")]
    pub base_url: String,

    /// Target calendar identifier
    pub calendar_id: String,

    /// Bearer token for the calendar API
    pub api_token: SecretString,

    /// IANA timezone the calendar presents events in
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
}

impl CalendarConfig {
    fn validate(&self) -> Result<(), String> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(format!(
                "calendar.base_url must be http(s): {}",
                self.base_url
            ));
        }
        if self.calendar_id.trim().is_empty() {
            return Err("calendar.calendar_id must not be empty".to_string());
        }
        if self.time_zone.trim().is_empty() {
            return Err("calendar.time_zone must not be empty".to_string());
        }
        Ok(())
    }
}

/// Supervisor restart policy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupervisorConfig {
    /// Fixed delay between reconnect attempts
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Fraction of the delay added as random jitter (0.0 - 1.0)
    #[serde(default = "default_jitter_fraction")]
    pub jitter_fraction: f64,

    /// Give up after this many consecutive failed connections; 0 = retry forever
    #[serde(default)]
    pub max_consecutive_failures: u32,

    /// Path of the persisted cursor file
    #[serde(default = "default_cursor_path")]
    pub cursor_path: String,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            retry_delay_ms: default_retry_delay_ms(),
            jitter_fraction: default_jitter_fraction(),
            max_consecutive_failures: 0,
            cursor_path: default_cursor_path(),
        }
    }
}

impl SupervisorConfig {
    fn validate(&self) -> Result<(), String> {
        if self.retry_delay_ms == 0 {
            return Err("supervisor.retry_delay_ms must be positive".to_string());
        }
        if !(0.0..=1.0).contains(&self.jitter_fraction) {
            return Err(format!(
                "supervisor.jitter_fraction must be within 0.0-1.0, got {}",
                self.jitter_fraction
            ));
        }
        if self.cursor_path.trim().is_empty() {
            return Err("supervisor.cursor_path must not be empty".to_string());
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable JSON file logging in addition to the console
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for log files
    #[serde(default = "default_log_path")]
    pub local_path: String,

    /// Rotation policy: daily or hourly
    #[serde(default = "default_log_rotation")]
    pub local_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_log_path(),
            local_rotation: default_log_rotation(),
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        Ok(())
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_source_base_url() -> String {
    "https://api.pushbullet.com".to_string()
}

fn default_stream_url() -> String {
    "wss://stream.pushbullet.com/websocket".to_string()
}

fn default_batch_limit() -> usize {
    10
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_ocr_endpoint() -> String {
    "https://api.ocr.space/parse/image".to_string()
}

fn default_ocr_engine() -> u8 {
    2
}

/// 800 KB - the ceiling the OCR service accepts
fn default_file_size_ceiling() -> usize {
    1024 * 1024 * 8 / 10
}

fn default_model_timeout_seconds() -> u64 {
    120
}

fn default_calendar_base_url() -> String {
    "https://www.googleapis.com/calendar/v3".to_string()
}

fn default_time_zone() -> String {
    "UTC".to_string()
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_jitter_fraction() -> f64 {
    0.1
}

fn default_cursor_path() -> String {
    "pushcal-cursor.json".to_string()
}

fn default_log_path() -> String {
    "logs".to_string()
}

fn default_log_rotation() -> String {
    "daily".to_string()
}

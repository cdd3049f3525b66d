//! Configuration management for pushcal.
//!
//! TOML-based configuration with environment variable substitution
//! (`${VAR_NAME}`), `PUSHCAL_*` overrides, defaults for optional settings,
//! and validation on load.
//!
//! # Example Configuration
//!
//! ```toml
//! [source]
//! access_token = "${PUSHBULLET_ACCESS_TOKEN}"
//! device_iden = "ujpah72o0sjAoRtnM0jc"
//! batch_limit = 10
//!
//! [ocr]
//! api_key = "${OCR_SPACE_API_KEY}"
//!
//! [model]
//! endpoint = "http://localhost:8080/v1/chat/completions"
//! name = "llama-3.1-8b-instruct"
//!
//! [calendar]
//! calendar_id = "primary"
//! api_token = "${GOOGLE_CALENDAR_TOKEN}"
//! time_zone = "America/New_York"
//!
//! [supervisor]
//! retry_delay_ms = 1000
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{
    ApplicationConfig, CalendarConfig, LoggingConfig, ModelConfig, OcrConfig, PushcalConfig,
    SourceConfig, SupervisorConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};

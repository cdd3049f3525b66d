//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the pushcal configuration file.

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration file loaded successfully");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        match config.validate() {
            Ok(_) => {
                println!("✅ Configuration is valid");
                println!();
                println!("Configuration Summary:");
                println!("  Log Level: {}", config.application.log_level);
                println!("  Source API: {}", config.source.base_url);
                println!("  Stream: {}", config.source.stream_url);
                println!("  Device: {}", config.source.device_iden);
                println!("  Batch Limit: {}", config.source.batch_limit);
                println!("  OCR Endpoint: {}", config.ocr.endpoint);
                println!("  Model: {} ({})", config.model.name, config.model.endpoint);
                println!("  Calendar: {}", config.calendar.calendar_id);
                println!("  Time Zone: {}", config.calendar.time_zone);
                println!("  Cursor Path: {}", config.supervisor.cursor_path);
                println!("  Retry Delay: {}ms", config.supervisor.retry_delay_ms);
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                Ok(2)
            }
        }
    }
}

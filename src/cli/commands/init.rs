//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "pushcal.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing pushcal configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        match fs::write(&self.output, Self::sample_config()) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Create a .env file with your credentials:");
                println!("     - PUSHBULLET_ACCESS_TOKEN");
                println!("     - OCR_SPACE_API_KEY");
                println!("     - GOOGLE_CALENDAR_TOKEN");
                println!("  3. Validate configuration: pushcal validate-config");
                println!("  4. Start listening: pushcal run");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5)
            }
        }
    }

    /// Generate the sample configuration
    fn sample_config() -> String {
        r#"# pushcal configuration
# Push notification to calendar ingestion

[application]
log_level = "info"  # trace | debug | info | warn | error

[source]
# base_url = "https://api.pushbullet.com"
# stream_url = "wss://stream.pushbullet.com/websocket"
access_token = "${PUSHBULLET_ACCESS_TOKEN}"
# Device whose pushes are processed; other devices are ignored
device_iden = "your-device-iden"
batch_limit = 10

[ocr]
# endpoint = "https://api.ocr.space/parse/image"
api_key = "${OCR_SPACE_API_KEY}"
engine = 2

[model]
endpoint = "http://localhost:8080/v1/chat/completions"
name = "llama-3.1-8b-instruct"
# api_key = "${MODEL_API_KEY}"

[calendar]
# base_url = "https://www.googleapis.com/calendar/v3"
calendar_id = "primary"
api_token = "${GOOGLE_CALENDAR_TOKEN}"
time_zone = "America/New_York"

[supervisor]
retry_delay_ms = 1000
jitter_fraction = 0.1
# 0 retries forever
max_consecutive_failures = 0
cursor_path = "pushcal-cursor.json"

[logging]
local_enabled = false
local_path = "logs"
local_rotation = "daily"  # daily | hourly
"#
        .to_string()
    }
}

//! Run command implementation
//!
//! This module implements the `run` command: assemble the adapters, hand
//! them to the supervisor, and listen until a shutdown signal arrives.

use crate::adapters::calendar::GoogleCalendarClient;
use crate::adapters::extract::CollaboratorExtractor;
use crate::adapters::pushsource::PushClient;
use crate::adapters::transform::LlmEventParser;
use crate::config::load_config;
use crate::core::cursor::FileCursorStore;
use crate::core::pipeline::PipelineOrchestrator;
use crate::core::supervisor::Supervisor;
use clap::Args;
use std::sync::Arc;
use tokio::sync::watch;

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Override the cursor file path from the configuration
    #[arg(long)]
    pub cursor_path: Option<String>,
}

impl RunArgs {
    /// Execute the run command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to load configuration: {e}");
                return Ok(2);
            }
        };

        let cursor_path = self
            .cursor_path
            .clone()
            .unwrap_or_else(|| config.supervisor.cursor_path.clone());

        tracing::info!(
            config_path = %config_path,
            cursor_path = %cursor_path,
            device_iden = %config.source.device_iden,
            "Starting push listener"
        );

        let client = Arc::new(PushClient::new(config.source.clone()));
        let extractor = Arc::new(CollaboratorExtractor::new(
            &config.source,
            config.ocr.clone(),
        ));
        let parser = Arc::new(LlmEventParser::new(config.model.clone()));
        let calendar = Arc::new(GoogleCalendarClient::new(config.calendar.clone()));
        let store = Arc::new(FileCursorStore::new(&cursor_path));

        let orchestrator = Arc::new(PipelineOrchestrator::new(
            extractor,
            parser,
            calendar,
            client.clone(),
        ));

        let mut supervisor = Supervisor::new(
            config.source.clone(),
            &config.supervisor,
            client,
            orchestrator,
            store,
            shutdown,
        );

        match supervisor.run().await {
            Ok(()) => {
                tracing::info!("Listener stopped");
                Ok(0)
            }
            Err(e) => {
                tracing::error!(error = %e, "Listener gave up");
                eprintln!("Error: {e}");
                Ok(5)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_config_is_config_error_exit() {
        let args = RunArgs { cursor_path: None };
        let (_tx, rx) = watch::channel(false);
        let code = args.execute("/nonexistent/pushcal.toml", rx).await.unwrap();
        assert_eq!(code, 2);
    }
}

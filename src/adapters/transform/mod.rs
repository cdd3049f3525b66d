//! Transform step of the pipeline
//!
//! Sends extracted text to a chat-completions endpoint and parses the
//! response into a [`CalendarEvent`]. The request pins a JSON schema so the
//! model cannot drift from the event shape.

use crate::config::ModelConfig;
use crate::domain::errors::ItemError;
use crate::domain::CalendarEvent;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

/// Transform step seam
#[async_trait]
pub trait EventParser: Send + Sync {
    /// Parse one calendar event out of free text
    ///
    /// `now` anchors relative dates ("next Friday") in the prompt.
    async fn parse_event(&self, text: &str, now: DateTime<Utc>)
        -> Result<CalendarEvent, ItemError>;
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: String,
}

/// Event parser backed by an OpenAI-compatible chat-completions endpoint
pub struct LlmEventParser {
    client: reqwest::Client,
    config: ModelConfig,
}

impl LlmEventParser {
    /// Build the parser from model configuration
    pub fn new(config: ModelConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .unwrap_or_default();

        Self { client, config }
    }

    fn system_prompt(now: DateTime<Utc>) -> String {
        format!(
            "You extract calendar events from text. Respond with only the \
             event fields, nothing else. Dates are ISO-8601 in UTC. The start \
             and end dates must differ; assume a one hour duration when the \
             text gives none. Keep the title short. Today's date is {}.",
            now.format("%Y-%m-%d")
        )
    }

    fn event_schema() -> serde_json::Value {
        json!({
            "name": "calendar_event",
            "strict": true,
            "schema": {
                "type": "object",
                "properties": {
                    "title": { "type": "string" },
                    "location": { "type": "string" },
                    "description": { "type": "string" },
                    "startDate": { "type": "string" },
                    "endDate": { "type": "string" }
                },
                "required": ["title", "location", "description", "startDate", "endDate"],
                "additionalProperties": false
            }
        })
    }
}

#[async_trait]
impl EventParser for LlmEventParser {
    async fn parse_event(
        &self,
        text: &str,
        now: DateTime<Utc>,
    ) -> Result<CalendarEvent, ItemError> {
        let body = json!({
            "model": self.config.name,
            "messages": [
                { "role": "system", "content": Self::system_prompt(now) },
                { "role": "user", "content": text }
            ],
            "response_format": {
                "type": "json_schema",
                "json_schema": Self::event_schema()
            }
        });

        let mut request = self.client.post(&self.config.endpoint).json(&body);
        if let Some(api_key) = &self.config.api_key {
            request = request.bearer_auth(api_key.expose_secret());
        }

        let response = request
            .send()
            .await
            .map_err(|e| ItemError::EventParse(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ItemError::EventParse(format!(
                "model endpoint returned {status}: {body}"
            )));
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| ItemError::EventParse(format!("invalid response: {e}")))?;

        let content = completion
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .ok_or_else(|| ItemError::EventParse("response carried no choices".to_string()))?;

        serde_json::from_str(content)
            .map_err(|e| ItemError::EventParse(format!("model emitted invalid event: {e}")))
    }
}

/// Append the source context to the event description
///
/// The context (file URL, page URL, or note body) lands at the end of the
/// description so the calendar entry always links back to its origin.
pub fn enrich_event(event: &mut CalendarEvent, context: Option<&str>) {
    let Some(context) = context else {
        return;
    };
    if context.trim().is_empty() {
        return;
    }
    if event.description.trim().is_empty() {
        event.description = context.to_string();
    } else {
        event.description = format!("{}\n\n{context}", event.description);
    }
}

//! Load step of the pipeline
//!
//! Writes extracted events into a Google-style calendar REST API. Event
//! timestamps are sent as wall-clock date-times paired with the configured
//! IANA timezone; the calendar resolves them to instants.

use crate::config::CalendarConfig;
use crate::domain::errors::ItemError;
use crate::domain::event::{parse_wall_clock, CalendarEvent};
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, NaiveDateTime};
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

/// Load step seam
#[async_trait]
pub trait CalendarWriter: Send + Sync {
    /// Write one event; returns a link to the created entry
    async fn write_event(&self, event: &CalendarEvent) -> Result<String, ItemError>;
}

#[derive(Debug, Deserialize)]
struct CreatedEvent {
    #[serde(rename = "htmlLink", default)]
    html_link: Option<String>,
}

/// Calendar client for a Google Calendar-compatible API
pub struct GoogleCalendarClient {
    client: reqwest::Client,
    config: CalendarConfig,
}

/// Resolve an event's start and end as wall-clock times
///
/// Zero-length events get a one hour duration here rather than being
/// rejected upstream.
pub fn event_times(event: &CalendarEvent) -> Result<(NaiveDateTime, NaiveDateTime), ItemError> {
    let start = parse_wall_clock(&event.start_date)
        .map_err(|e| ItemError::CalendarWrite(format!("bad startDate: {e}")))?;
    let mut end = parse_wall_clock(&event.end_date)
        .map_err(|e| ItemError::CalendarWrite(format!("bad endDate: {e}")))?;

    if start == end {
        end = start + ChronoDuration::hours(1);
    }

    Ok((start, end))
}

impl GoogleCalendarClient {
    /// Build the client from calendar configuration
    pub fn new(config: CalendarConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        Self { client, config }
    }

    fn events_url(&self) -> String {
        format!(
            "{}/calendars/{}/events",
            self.config.base_url, self.config.calendar_id
        )
    }
}

#[async_trait]
impl CalendarWriter for GoogleCalendarClient {
    async fn write_event(&self, event: &CalendarEvent) -> Result<String, ItemError> {
        let (start, end) = event_times(event)?;

        let body = json!({
            "summary": event.title,
            "location": event.location,
            "description": event.description,
            "start": {
                "dateTime": start.format("%Y-%m-%dT%H:%M:%S").to_string(),
                "timeZone": self.config.time_zone,
            },
            "end": {
                "dateTime": end.format("%Y-%m-%dT%H:%M:%S").to_string(),
                "timeZone": self.config.time_zone,
            },
        });

        let response = self
            .client
            .post(self.events_url())
            .bearer_auth(self.config.api_token.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| ItemError::CalendarWrite(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ItemError::CalendarWrite(format!(
                "calendar returned {status}: {body}"
            )));
        }

        let created: CreatedEvent = response
            .json()
            .await
            .map_err(|e| ItemError::CalendarWrite(format!("invalid response: {e}")))?;

        tracing::info!(title = %event.title, "Calendar event created");
        Ok(created.html_link.unwrap_or_default())
    }
}

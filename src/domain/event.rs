//! Calendar event model
//!
//! A [`CalendarEvent`] is produced by the structured-extraction collaborator
//! and consumed by the calendar writer. Timestamps stay in the ISO-8601 form
//! the model emitted; interpreting them in the target calendar's timezone is
//! a presentation concern that belongs to the load step.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A calendar event extracted from free text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    /// Concise event title
    pub title: String,

    /// Location, empty if the source text named none
    #[serde(default)]
    pub location: String,

    /// Free-text description; enrichment appends the source context here
    #[serde(default)]
    pub description: String,

    /// ISO-8601 start timestamp as emitted by the model
    pub start_date: String,

    /// ISO-8601 end timestamp as emitted by the model
    pub end_date: String,
}

impl CalendarEvent {
    /// Validate that both timestamps parse and are ordered
    ///
    /// Equal start/end is accepted here - the load step corrects zero-length
    /// events, not the model contract.
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("event title is empty".to_string());
        }
        let start = parse_wall_clock(&self.start_date)
            .map_err(|e| format!("invalid startDate '{}': {e}", self.start_date))?;
        let end = parse_wall_clock(&self.end_date)
            .map_err(|e| format!("invalid endDate '{}': {e}", self.end_date))?;
        if start > end {
            return Err(format!(
                "startDate {} is after endDate {}",
                self.start_date, self.end_date
            ));
        }
        Ok(())
    }
}

/// Parse an ISO-8601 timestamp as wall-clock time
///
/// The model is asked for UTC timestamps, but the calendar presents the
/// event in the user's timezone, so any `Z` or numeric offset suffix is
/// stripped and the remainder read as naive wall-clock time.
pub fn parse_wall_clock(value: &str) -> Result<NaiveDateTime, String> {
    let trimmed = value.trim();
    let naive = trimmed
        .trim_end_matches('Z')
        .split('+')
        .next()
        .unwrap_or(trimmed);

    // Tolerate fractional seconds and a missing seconds field.
    for format in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
    ] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(naive, format) {
            return Ok(parsed);
        }
    }
    Err(format!("unrecognized timestamp format: {value}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(start: &str, end: &str) -> CalendarEvent {
        CalendarEvent {
            title: "Lunch with Sam".to_string(),
            location: "Cafe".to_string(),
            description: String::new(),
            start_date: start.to_string(),
            end_date: end.to_string(),
        }
    }

    #[test_case::test_case("2026-08-28T13:00:00Z"; "utc suffix")]
    #[test_case::test_case("2026-08-28T13:00:00+02:00"; "numeric offset")]
    #[test_case::test_case("2026-08-28T13:00:00"; "no suffix")]
    #[test_case::test_case("2026-08-28T13:00"; "no seconds")]
    fn test_parse_wall_clock_reads_local_time(input: &str) {
        let parsed = parse_wall_clock(input).unwrap();
        assert_eq!(parsed.date().to_string(), "2026-08-28");
        assert_eq!(parsed.format("%H:%M").to_string(), "13:00");
    }

    #[test]
    fn test_parse_wall_clock_fractional_seconds() {
        let parsed = parse_wall_clock("2026-08-28T13:00:00.250Z").unwrap();
        assert_eq!(parsed.date().to_string(), "2026-08-28");
    }

    #[test]
    fn test_parse_wall_clock_rejects_garbage() {
        assert!(parse_wall_clock("next friday").is_err());
    }

    #[test]
    fn test_validate_ordered_event() {
        let e = event("2026-08-28T13:00:00Z", "2026-08-28T14:00:00Z");
        assert!(e.validate().is_ok());
    }

    #[test]
    fn test_validate_accepts_zero_length() {
        // Zero-length events are corrected at the load step, not rejected here.
        let e = event("2026-08-28T13:00:00Z", "2026-08-28T13:00:00Z");
        assert!(e.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_reversed_dates() {
        let e = event("2026-08-28T15:00:00Z", "2026-08-28T13:00:00Z");
        assert!(e.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_title() {
        let mut e = event("2026-08-28T13:00:00Z", "2026-08-28T14:00:00Z");
        e.title = "  ".to_string();
        assert!(e.validate().is_err());
    }

    #[test]
    fn test_event_serde_uses_camel_case() {
        let e = event("2026-08-28T13:00:00Z", "2026-08-28T14:00:00Z");
        let json = serde_json::to_string(&e).unwrap();
        assert!(json.contains("startDate"));
        assert!(json.contains("endDate"));

        let back: CalendarEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, e);
    }
}

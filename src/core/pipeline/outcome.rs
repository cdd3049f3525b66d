//! Per-cycle pipeline results
//!
//! Outcomes exist for logging and acknowledgment only; they are never
//! persisted. The cursor advances on fetch-cycle completion regardless of
//! individual item outcomes.

use std::time::Duration;

/// Result of running the pipeline for one item
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutcome {
    /// The item produced a calendar event; `link` points at it
    Delivered { iden: String, link: String },

    /// The item failed at some pipeline step and was skipped
    Failed { iden: String, error: String },
}

/// Summary of one batch run through the pipeline
#[derive(Debug, Clone, Default)]
pub struct CycleSummary {
    /// Per-item outcomes in delivery order
    pub outcomes: Vec<PipelineOutcome>,

    /// Wall-clock duration of the batch run
    pub duration: Duration,
}

impl CycleSummary {
    /// Create an empty summary
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a delivered item
    pub fn add_delivered(&mut self, iden: impl Into<String>, link: impl Into<String>) {
        self.outcomes.push(PipelineOutcome::Delivered {
            iden: iden.into(),
            link: link.into(),
        });
    }

    /// Record a failed item
    pub fn add_failed(&mut self, iden: impl Into<String>, error: impl Into<String>) {
        self.outcomes.push(PipelineOutcome::Failed {
            iden: iden.into(),
            error: error.into(),
        });
    }

    /// Number of delivered items
    pub fn delivered(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, PipelineOutcome::Delivered { .. }))
            .count()
    }

    /// Number of failed items
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.delivered()
    }

    /// Attach the run duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Log the summary at the appropriate level
    pub fn log_summary(&self) {
        if self.failed() > 0 {
            tracing::warn!(
                delivered = self.delivered(),
                failed = self.failed(),
                duration_ms = self.duration.as_millis() as u64,
                "Batch completed with failures"
            );
        } else if !self.outcomes.is_empty() {
            tracing::info!(
                delivered = self.delivered(),
                duration_ms = self.duration.as_millis() as u64,
                "Batch completed"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_summary() {
        let summary = CycleSummary::new();
        assert_eq!(summary.delivered(), 0);
        assert_eq!(summary.failed(), 0);
    }

    #[test]
    fn test_counts() {
        let mut summary = CycleSummary::new();
        summary.add_delivered("a", "https://cal/1");
        summary.add_delivered("b", "https://cal/2");
        summary.add_failed("c", "OCR failed");

        assert_eq!(summary.delivered(), 2);
        assert_eq!(summary.failed(), 1);
        assert_eq!(summary.outcomes.len(), 3);
    }

    #[test]
    fn test_outcomes_keep_delivery_order() {
        let mut summary = CycleSummary::new();
        summary.add_failed("a", "boom");
        summary.add_delivered("b", "https://cal/2");

        assert!(matches!(
            &summary.outcomes[0],
            PipelineOutcome::Failed { iden, .. } if iden == "a"
        ));
        assert!(matches!(
            &summary.outcomes[1],
            PipelineOutcome::Delivered { iden, .. } if iden == "b"
        ));
    }

    #[test]
    fn test_with_duration() {
        let summary = CycleSummary::new().with_duration(Duration::from_millis(250));
        assert_eq!(summary.duration, Duration::from_millis(250));
    }
}

//! Pipeline orchestrator
//!
//! Runs each deliverable item through extract, transform, load, and
//! acknowledge. Item failures are isolated: a failed item is logged and
//! skipped, the rest of the batch proceeds, and failed items are never
//! retried on later cycles.

use crate::adapters::calendar::CalendarWriter;
use crate::adapters::extract::TextExtractor;
use crate::adapters::pushsource::PushSink;
use crate::adapters::transform::{enrich_event, EventParser};
use crate::core::pipeline::CycleSummary;
use crate::domain::errors::ItemError;
use crate::domain::Item;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;

/// Title of the acknowledgement push sent after each delivery
const ACK_TITLE: &str = "Event written to calendar";

/// Seam between the listener and the pipeline
#[async_trait]
pub trait ItemBatchHandler: Send + Sync {
    /// Process one deliverable batch, oldest first
    async fn handle_batch(&self, items: Vec<Item>) -> CycleSummary;
}

/// Extract-transform-load-acknowledge pipeline
pub struct PipelineOrchestrator {
    extractor: Arc<dyn TextExtractor>,
    parser: Arc<dyn EventParser>,
    calendar: Arc<dyn CalendarWriter>,
    sink: Arc<dyn PushSink>,
}

impl PipelineOrchestrator {
    /// Assemble the pipeline from its four collaborator seams
    pub fn new(
        extractor: Arc<dyn TextExtractor>,
        parser: Arc<dyn EventParser>,
        calendar: Arc<dyn CalendarWriter>,
        sink: Arc<dyn PushSink>,
    ) -> Self {
        Self {
            extractor,
            parser,
            calendar,
            sink,
        }
    }

    /// Run one item end to end; returns the calendar link
    async fn process_item(&self, item: &Item) -> Result<String, ItemError> {
        let extracted = self.extractor.extract(item).await?;

        let mut event = self.parser.parse_event(&extracted.text, Utc::now()).await?;
        event.validate().map_err(ItemError::EventParse)?;
        enrich_event(&mut event, extracted.context.as_deref());

        let link = self.calendar.write_event(&event).await?;

        self.sink.send_link(ACK_TITLE, &event.title, &link).await?;

        Ok(link)
    }
}

#[async_trait]
impl ItemBatchHandler for PipelineOrchestrator {
    async fn handle_batch(&self, items: Vec<Item>) -> CycleSummary {
        let started = Instant::now();
        let mut summary = CycleSummary::new();

        for item in &items {
            match self.process_item(item).await {
                Ok(link) => {
                    tracing::info!(iden = %item.iden, kind = item.payload.kind(), "Item delivered");
                    summary.add_delivered(&item.iden, link);
                }
                Err(err) => {
                    tracing::warn!(
                        iden = %item.iden,
                        kind = item.payload.kind(),
                        error = %err,
                        "Item failed, skipping"
                    );
                    summary.add_failed(&item.iden, err.to_string());
                }
            }
        }

        let summary = summary.with_duration(started.elapsed());
        summary.log_summary();
        summary
    }
}

//! Extraction step of the pipeline
//!
//! Turns an inbound [`Item`] into plain text for the structured-extraction
//! model. Files are downloaded, shrunk below the OCR byte ceiling, and sent
//! through OCR; links are fetched and stripped to their visible text; notes
//! pass through verbatim.

pub mod html;
pub mod image;
pub mod ocr;

use crate::config::{OcrConfig, SourceConfig};
use crate::domain::errors::ItemError;
use crate::domain::{Item, ItemPayload};
use async_trait::async_trait;
use std::time::Duration;

pub use ocr::OcrClient;

/// Text extracted from one item
#[derive(Debug, Clone, PartialEq)]
pub struct Extracted {
    /// Plain text handed to the structured-extraction model
    pub text: String,

    /// Source context appended to the event description after parsing
    /// (the file or page URL, or the original note body)
    pub context: Option<String>,
}

/// Extraction step seam
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Extract plain text from one item
    async fn extract(&self, item: &Item) -> Result<Extracted, ItemError>;
}

/// Extractor backed by the OCR collaborator and plain HTTP fetches
pub struct CollaboratorExtractor {
    http: reqwest::Client,
    ocr: OcrClient,
    file_size_ceiling: usize,
}

impl CollaboratorExtractor {
    /// Build the extractor from source and OCR configuration
    pub fn new(source: &SourceConfig, ocr_config: OcrConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(source.timeout_seconds))
            .build()
            .unwrap_or_default();

        Self {
            http,
            file_size_ceiling: ocr_config.file_size_ceiling_bytes,
            ocr: OcrClient::new(ocr_config),
        }
    }

    async fn extract_file(
        &self,
        file_url: &str,
        file_type: &str,
    ) -> Result<String, ItemError> {
        let response = self
            .http
            .get(file_url)
            .send()
            .await
            .map_err(|e| ItemError::Download(format!("{file_url}: {e}")))?;

        if !response.status().is_success() {
            return Err(ItemError::Download(format!(
                "{file_url}: status {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ItemError::Download(format!("{file_url}: {e}")))?;

        let original_len = bytes.len();
        let sized = image::shrink_to_ceiling(&bytes, self.file_size_ceiling)?;

        // Resized images are re-encoded as JPEG regardless of input type.
        let content_type = if sized.len() == original_len {
            file_type
        } else {
            "image/jpeg"
        };

        self.ocr.recognize(&sized, content_type).await
    }

    async fn extract_link(&self, title: &str, url: &str) -> Result<String, ItemError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ItemError::PageFetch(format!("{url}: {e}")))?;

        if !response.status().is_success() {
            return Err(ItemError::PageFetch(format!(
                "{url}: status {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ItemError::PageFetch(format!("{url}: {e}")))?;

        let page_text = html::strip_html(&body);
        Ok(format!("{title}\n\n{page_text}"))
    }
}

#[async_trait]
impl TextExtractor for CollaboratorExtractor {
    async fn extract(&self, item: &Item) -> Result<Extracted, ItemError> {
        let (text, context) = match &item.payload {
            ItemPayload::File {
                file_url,
                file_type,
                file_name,
            } => {
                tracing::debug!(iden = %item.iden, file = %file_name, "Extracting text via OCR");
                let text = self.extract_file(file_url, file_type).await?;
                (text, Some(file_url.clone()))
            }
            ItemPayload::Link { title, url } => {
                tracing::debug!(iden = %item.iden, url = %url, "Extracting text from linked page");
                let text = self.extract_link(title, url).await?;
                (text, Some(url.clone()))
            }
            ItemPayload::Note { body } => (body.clone(), Some(body.clone())),
        };

        if text.trim().is_empty() {
            return Err(ItemError::EmptyText(format!(
                "{} item {} yielded no text",
                item.payload.kind(),
                item.iden
            )));
        }

        Ok(Extracted { text, context })
    }
}

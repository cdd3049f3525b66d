//! OCR collaborator client
//!
//! Sends an image as a base64 data URI to an OCR.Space-compatible endpoint
//! and returns the recognized text. A response flagged as errored-on-
//! processing maps to [`ItemError::Ocr`].

use crate::config::OcrConfig;
use crate::domain::errors::ItemError;
use base64::{engine::general_purpose, Engine as _};
use secrecy::ExposeSecret;
use serde::Deserialize;
use std::time::Duration;

/// OCR service response shape
#[derive(Debug, Deserialize)]
struct OcrResponse {
    #[serde(rename = "IsErroredOnProcessing", default)]
    is_errored_on_processing: bool,

    /// String or array of strings depending on the failure
    #[serde(rename = "ErrorMessage", default)]
    error_message: Option<serde_json::Value>,

    #[serde(rename = "ParsedResults", default)]
    parsed_results: Vec<ParsedResult>,
}

#[derive(Debug, Deserialize)]
struct ParsedResult {
    #[serde(rename = "ParsedText", default)]
    parsed_text: String,
}

impl OcrResponse {
    fn error_text(&self) -> String {
        match &self.error_message {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(serde_json::Value::Array(parts)) => parts
                .iter()
                .filter_map(|v| v.as_str())
                .collect::<Vec<_>>()
                .join("; "),
            _ => "unspecified OCR error".to_string(),
        }
    }
}

/// Client for the OCR collaborator
pub struct OcrClient {
    client: reqwest::Client,
    config: OcrConfig,
}

impl OcrClient {
    /// Create an OCR client from configuration
    pub fn new(config: OcrConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap_or_default();

        Self { client, config }
    }

    /// Recognize text in an encoded image
    ///
    /// `content_type` is the MIME type of the encoded bytes, used to build
    /// the data URI the service expects.
    pub async fn recognize(&self, bytes: &[u8], content_type: &str) -> Result<String, ItemError> {
        let data_uri = format!(
            "data:{content_type};base64,{}",
            general_purpose::STANDARD.encode(bytes)
        );

        let form = [
            ("base64Image", data_uri),
            ("OCREngine", self.config.engine.to_string()),
            ("detectOrientation", "true".to_string()),
            ("scale", "true".to_string()),
        ];

        let response = self
            .client
            .post(&self.config.endpoint)
            .header("apikey", self.config.api_key.expose_secret().as_ref())
            .form(&form)
            .send()
            .await
            .map_err(|e| ItemError::Ocr(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ItemError::Ocr(format!("service returned {status}: {body}")));
        }

        let parsed: OcrResponse = response
            .json()
            .await
            .map_err(|e| ItemError::Ocr(format!("invalid response: {e}")))?;

        if parsed.is_errored_on_processing {
            return Err(ItemError::Ocr(parsed.error_text()));
        }

        let text = parsed
            .parsed_results
            .iter()
            .map(|r| r.parsed_text.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        Ok(text)
    }
}

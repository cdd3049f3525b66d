//! REST client for the notification source
//!
//! Covers the two HTTP surfaces of the source: listing pushes modified after
//! a timestamp (newest-first) and sending outbound pushes back to the user's
//! devices.

use crate::adapters::pushsource::models::{OutboundPush, PushListResponse};
use crate::config::SourceConfig;
use crate::domain::errors::{FetchError, ItemError};
use crate::domain::Item;
use async_trait::async_trait;
use secrecy::ExposeSecret;
use std::time::Duration;

const ACCESS_TOKEN_HEADER: &str = "Access-Token";

/// Fetch seam for the list endpoint
#[async_trait]
pub trait PushFetcher: Send + Sync {
    /// List pushes modified strictly after `modified_after`, newest first
    ///
    /// `modified_after` of 0.0 lists from the beginning of history, bounded
    /// by `limit`.
    async fn fetch_since(&self, modified_after: f64, limit: usize)
        -> Result<Vec<Item>, FetchError>;
}

/// Send seam for outbound pushes
#[async_trait]
pub trait PushSink: Send + Sync {
    /// Push a link back to the configured device
    async fn send_link(&self, title: &str, body: &str, url: &str) -> Result<(), ItemError>;

    /// Push a note back to the configured device
    async fn send_note(&self, title: &str, body: &str) -> Result<(), ItemError>;
}

/// HTTP client for the source's REST API
pub struct PushClient {
    client: reqwest::Client,
    config: SourceConfig,
}

impl PushClient {
    /// Build the client from source configuration
    pub fn new(config: SourceConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .unwrap_or_default();

        Self { client, config }
    }

    fn pushes_url(&self) -> String {
        format!("{}/v2/pushes", self.config.base_url)
    }

    async fn send(&self, push: &OutboundPush) -> Result<(), ItemError> {
        let response = self
            .client
            .post(self.pushes_url())
            .header(ACCESS_TOKEN_HEADER, self.config.access_token.expose_secret().as_ref())
            .json(push)
            .send()
            .await
            .map_err(|e| ItemError::Acknowledge(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ItemError::Acknowledge(format!(
                "push endpoint returned {status}: {body}"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl PushFetcher for PushClient {
    async fn fetch_since(
        &self,
        modified_after: f64,
        limit: usize,
    ) -> Result<Vec<Item>, FetchError> {
        let response = self
            .client
            .get(self.pushes_url())
            .header(ACCESS_TOKEN_HEADER, self.config.access_token.expose_secret().as_ref())
            .query(&[
                ("active", "true".to_string()),
                ("modified_after", modified_after.to_string()),
                ("limit", limit.to_string()),
            ])
            .send()
            .await
            .map_err(|e| FetchError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(FetchError::ServerError { status, message });
        }

        let list: PushListResponse = response
            .json()
            .await
            .map_err(|e| FetchError::InvalidResponse(e.to_string()))?;

        let items: Vec<Item> = list
            .pushes
            .into_iter()
            .filter_map(|push| push.into_item())
            .collect();

        tracing::debug!(count = items.len(), modified_after, "Fetched push batch");
        Ok(items)
    }
}

#[async_trait]
impl PushSink for PushClient {
    async fn send_link(&self, title: &str, body: &str, url: &str) -> Result<(), ItemError> {
        self.send(&OutboundPush::Link {
            title: title.to_string(),
            body: body.to_string(),
            url: url.to_string(),
            device_iden: self.config.device_iden.clone(),
        })
        .await
    }

    async fn send_note(&self, title: &str, body: &str) -> Result<(), ItemError> {
        self.send(&OutboundPush::Note {
            title: title.to_string(),
            body: body.to_string(),
            device_iden: self.config.device_iden.clone(),
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;
    use crate::domain::ItemPayload;

    fn client(base_url: String) -> PushClient {
        PushClient::new(SourceConfig {
            base_url,
            stream_url: "wss://stream.example.com/websocket".to_string(),
            access_token: secret_string("o.token".to_string()),
            device_iden: "dev-1".to_string(),
            batch_limit: 10,
            timeout_seconds: 5,
        })
    }

    #[tokio::test]
    async fn test_fetch_since_sends_query_and_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/v2/pushes")
            .match_header("access-token", "o.token")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("active".into(), "true".into()),
                mockito::Matcher::UrlEncoded("modified_after".into(), "1700000000.5".into()),
                mockito::Matcher::UrlEncoded("limit".into(), "10".into()),
            ]))
            .with_status(200)
            .with_body(
                r#"{"pushes": [
                    {"iden": "p2", "type": "note", "modified": 1700000002.0,
                     "source_device_iden": "dev-1", "body": "newer"},
                    {"iden": "p1", "type": "note", "modified": 1700000001.0,
                     "source_device_iden": "dev-1", "body": "older"}
                ]}"#,
            )
            .create_async()
            .await;

        let items = client(server.url())
            .fetch_since(1700000000.5, 10)
            .await
            .unwrap();

        // Source order (newest first) is preserved.
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].iden, "p2");
        assert_eq!(items[1].iden, "p1");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_since_drops_unsupported_kinds() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v2/pushes")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(
                r#"{"pushes": [
                    {"iden": "p2", "type": "dismissal", "modified": 2.0},
                    {"iden": "p1", "type": "note", "modified": 1.0, "body": "kept"}
                ]}"#,
            )
            .create_async()
            .await;

        let items = client(server.url()).fetch_since(0.0, 10).await.unwrap();
        assert_eq!(items.len(), 1);
        assert!(matches!(items[0].payload, ItemPayload::Note { .. }));
    }

    #[tokio::test]
    async fn test_fetch_since_server_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v2/pushes")
            .match_query(mockito::Matcher::Any)
            .with_status(401)
            .with_body("invalid token")
            .create_async()
            .await;

        let result = client(server.url()).fetch_since(0.0, 10).await;
        assert!(matches!(
            result,
            Err(FetchError::ServerError { status: 401, .. })
        ));
    }

    #[tokio::test]
    async fn test_fetch_since_invalid_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v2/pushes")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let result = client(server.url()).fetch_since(0.0, 10).await;
        assert!(matches!(result, Err(FetchError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn test_send_link_posts_outbound_push() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v2/pushes")
            .match_header("access-token", "o.token")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "type": "link",
                "title": "Event written to calendar",
                "body": "Lunch with Sam",
                "url": "https://calendar.example.com/event/abc",
                "device_iden": "dev-1",
            })))
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        client(server.url())
            .send_link(
                "Event written to calendar",
                "Lunch with Sam",
                "https://calendar.example.com/event/abc",
            )
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_send_failure_is_acknowledge_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v2/pushes")
            .with_status(500)
            .create_async()
            .await;

        let result = client(server.url()).send_note("title", "body").await;
        assert!(matches!(result, Err(ItemError::Acknowledge(_))));
    }
}

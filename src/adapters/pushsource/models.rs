//! Wire models for the notification source
//!
//! Serde shapes for the list endpoint, the outbound push endpoint, and the
//! WebSocket signal frames. Wire records convert into domain [`Item`]s here
//! so the rest of the crate never sees source field names.

use crate::domain::{Item, ItemPayload};
use serde::{Deserialize, Serialize};

/// One frame from the notification stream
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamSignal {
    /// Keep-alive; carries no information beyond liveness
    Nop,

    /// Something changed server-side; `subtype` says what
    Tickle {
        #[serde(default)]
        subtype: String,
    },

    /// Any frame type this build does not know
    #[serde(other)]
    Unknown,
}

impl StreamSignal {
    /// Whether this signal means new pushes may be waiting
    pub fn is_push_tickle(&self) -> bool {
        matches!(self, StreamSignal::Tickle { subtype } if subtype == "push")
    }
}

/// List-endpoint response envelope
#[derive(Debug, Deserialize)]
pub struct PushListResponse {
    #[serde(default)]
    pub pushes: Vec<WirePush>,
}

/// One push record as the list endpoint returns it
#[derive(Debug, Clone, Deserialize)]
pub struct WirePush {
    pub iden: String,

    #[serde(rename = "type", default)]
    pub push_type: String,

    #[serde(default)]
    pub modified: f64,

    #[serde(default)]
    pub source_device_iden: Option<String>,

    // file pushes
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub file_type: Option<String>,
    #[serde(default)]
    pub file_url: Option<String>,

    // link pushes
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,

    // note pushes (links reuse body as extra text)
    #[serde(default)]
    pub body: Option<String>,
}

impl WirePush {
    /// Convert to a domain item
    ///
    /// Pushes of kinds this build cannot process (dismissals, mirrored
    /// notifications, files without a URL) return `None` and are logged.
    pub fn into_item(self) -> Option<Item> {
        let payload = match self.push_type.as_str() {
            "file" => match (self.file_url, self.file_type) {
                (Some(file_url), Some(file_type)) => Some(ItemPayload::File {
                    file_name: self.file_name.unwrap_or_default(),
                    file_type,
                    file_url,
                }),
                _ => None,
            },
            "link" => self.url.map(|url| ItemPayload::Link {
                title: self.title.unwrap_or_default(),
                url,
            }),
            "note" => Some(ItemPayload::Note {
                body: self.body.unwrap_or_default(),
            }),
            _ => None,
        };

        let Some(payload) = payload else {
            tracing::debug!(iden = %self.iden, push_type = %self.push_type, "Skipping unsupported push");
            return None;
        };

        Some(Item {
            iden: self.iden,
            modified: self.modified,
            source_device_iden: self.source_device_iden,
            payload,
        })
    }
}

/// Body of an outbound push
///
/// `device_iden` targets the push at one device instead of broadcasting
/// to all of the user's devices.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundPush {
    /// A link push (used for delivery acknowledgements)
    Link {
        title: String,
        body: String,
        url: String,
        device_iden: String,
    },
    /// A note push
    Note {
        title: String,
        body: String,
        device_iden: String,
    },
}

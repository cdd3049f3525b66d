//! Inbound item model
//!
//! An [`Item`] is one inbound notification ("push") fetched from the
//! notification source. Items are immutable once fetched: the pipeline owns
//! them for the duration of one run and discards them on completion.

use serde::{Deserialize, Serialize};

/// Variant-specific payload of an inbound item
///
/// The tagged representation forces exhaustive matching at the extraction
/// step, so a new kind cannot be silently dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemPayload {
    /// A pushed file (treated as an image to be OCR'd)
    File {
        file_name: String,
        file_type: String,
        file_url: String,
    },
    /// A pushed hyperlink
    Link { title: String, url: String },
    /// A free-text note
    Note { body: String },
}

impl ItemPayload {
    /// Short kind name for logging
    pub fn kind(&self) -> &'static str {
        match self {
            ItemPayload::File { .. } => "file",
            ItemPayload::Link { .. } => "link",
            ItemPayload::Note { .. } => "note",
        }
    }
}

/// One inbound notification from the source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Source-assigned identifier
    pub iden: String,

    /// Modification timestamp (seconds since epoch, as reported by the source)
    pub modified: f64,

    /// Device that originated the push, if the source reported one
    pub source_device_iden: Option<String>,

    /// Variant-specific fields
    pub payload: ItemPayload,
}

impl Item {
    /// Whether this item originated from the given device
    pub fn is_from_device(&self, device_iden: &str) -> bool {
        self.source_device_iden.as_deref() == Some(device_iden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(iden: &str, modified: f64) -> Item {
        Item {
            iden: iden.to_string(),
            modified,
            source_device_iden: Some("dev-1".to_string()),
            payload: ItemPayload::Note {
                body: "hello".to_string(),
            },
        }
    }

    #[test]
    fn test_payload_kind_names() {
        let file = ItemPayload::File {
            file_name: "a.png".to_string(),
            file_type: "image/png".to_string(),
            file_url: "https://example.com/a.png".to_string(),
        };
        assert_eq!(file.kind(), "file");
        assert_eq!(
            ItemPayload::Link {
                title: "t".to_string(),
                url: "https://example.com".to_string()
            }
            .kind(),
            "link"
        );
        assert_eq!(
            ItemPayload::Note {
                body: "b".to_string()
            }
            .kind(),
            "note"
        );
    }

    #[test]
    fn test_is_from_device() {
        let item = note("a", 100.0);
        assert!(item.is_from_device("dev-1"));
        assert!(!item.is_from_device("dev-2"));

        let mut orphan = note("b", 100.0);
        orphan.source_device_iden = None;
        assert!(!orphan.is_from_device("dev-1"));
    }

    #[test]
    fn test_item_serde_round_trip() {
        let item = note("push-1", 1700000000.5);
        let json = serde_json::to_string(&item).unwrap();
        let back: Item = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item);
    }
}

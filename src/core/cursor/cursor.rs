//! Cursor model for tracking the last processed item
//!
//! The cursor is the identity and modification timestamp of the most
//! recently processed item. It is persisted after each completed fetch
//! cycle, never per item, so a crash mid-pipeline re-delivers the whole
//! batch (at-least-once).

use crate::domain::Item;
use serde::{Deserialize, Serialize};

/// Durable pointer to the last processed item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cursor {
    /// Identifier of the most recently processed item
    pub iden: String,

    /// Modification timestamp of that item (seconds since epoch)
    pub modified: f64,
}

impl Cursor {
    /// Create a cursor pointing at the given item
    pub fn from_item(item: &Item) -> Self {
        Self {
            iden: item.iden.clone(),
            modified: item.modified,
        }
    }

    /// Whether replacing `self` with `candidate` keeps the monotonicity
    /// invariant: `modified` never decreases across updates.
    pub fn accepts(&self, candidate: &Cursor) -> bool {
        candidate.modified >= self.modified
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ItemPayload;

    fn item(iden: &str, modified: f64) -> Item {
        Item {
            iden: iden.to_string(),
            modified,
            source_device_iden: None,
            payload: ItemPayload::Note {
                body: String::new(),
            },
        }
    }

    #[test]
    fn test_from_item() {
        let cursor = Cursor::from_item(&item("push-9", 123.5));
        assert_eq!(cursor.iden, "push-9");
        assert_eq!(cursor.modified, 123.5);
    }

    #[test]
    fn test_accepts_enforces_monotonicity() {
        let cursor = Cursor {
            iden: "a".to_string(),
            modified: 100.0,
        };

        assert!(cursor.accepts(&Cursor {
            iden: "b".to_string(),
            modified: 100.0,
        }));
        assert!(cursor.accepts(&Cursor {
            iden: "c".to_string(),
            modified: 150.0,
        }));
        assert!(!cursor.accepts(&Cursor {
            iden: "d".to_string(),
            modified: 99.0,
        }));
    }

    #[test]
    fn test_cursor_serde_round_trip() {
        let cursor = Cursor {
            iden: "push-1".to_string(),
            modified: 1700000000.25,
        };
        let json = serde_json::to_string(&cursor).unwrap();
        let back: Cursor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cursor);
    }
}

//! Dedup and ordering engine
//!
//! Given a newest-first batch from the list endpoint and the current cursor,
//! [`plan_batch`] computes which items are genuinely new, the order they must
//! be delivered in, and the cursor value to persist once the cycle completes.
//! The computation is pure; all I/O stays in the listener.

use crate::core::cursor::Cursor;
use crate::domain::Item;

/// Outcome of deduplicating one fetched batch
#[derive(Debug, Clone, PartialEq)]
pub struct BatchPlan {
    /// Items to deliver, oldest-first and filtered to the configured device
    pub deliverable: Vec<Item>,

    /// Cursor to persist after the cycle; `None` only for an empty batch
    pub next_cursor: Option<Cursor>,
}

impl BatchPlan {
    fn empty() -> Self {
        Self {
            deliverable: Vec::new(),
            next_cursor: None,
        }
    }
}

/// Compute the delivery plan for one newest-first batch
///
/// Scanning from newest to oldest, an item is new while its `(modified,
/// iden)` pair is strictly past the cursor's: the scan stops at the first
/// item carrying the cursor's iden, and independently at the first item
/// whose `modified` is older than the cursor's. The second stop covers the
/// case where the cursor's exact iden fell outside the fetch window because
/// of the batch limit. With no cursor (first run) the entire batch is new.
///
/// The surviving items are filtered to the configured source device and
/// reversed so delivery order is chronological.
///
/// The next cursor is the newest item of the *unfiltered* batch, not the
/// newest surviving item; otherwise items from unrelated devices would be
/// re-fetched on every cycle.
pub fn plan_batch(batch: Vec<Item>, cursor: Option<&Cursor>, device_iden: &str) -> BatchPlan {
    if batch.is_empty() {
        return BatchPlan::empty();
    }

    let next_cursor = Some(Cursor::from_item(&batch[0]));

    let mut fresh: Vec<Item> = Vec::new();
    for item in batch {
        if let Some(cursor) = cursor {
            if item.iden == cursor.iden || item.modified < cursor.modified {
                break;
            }
        }
        fresh.push(item);
    }

    let mut deliverable: Vec<Item> = fresh
        .into_iter()
        .filter(|item| item.is_from_device(device_iden))
        .collect();
    deliverable.reverse();

    BatchPlan {
        deliverable,
        next_cursor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ItemPayload;

    const DEVICE: &str = "dev-1";

    fn item(iden: &str, modified: f64) -> Item {
        item_from(iden, modified, DEVICE)
    }

    fn item_from(iden: &str, modified: f64, device: &str) -> Item {
        Item {
            iden: iden.to_string(),
            modified,
            source_device_iden: Some(device.to_string()),
            payload: ItemPayload::Note {
                body: format!("note {iden}"),
            },
        }
    }

    fn cursor(iden: &str, modified: f64) -> Cursor {
        Cursor {
            iden: iden.to_string(),
            modified,
        }
    }

    fn idens(plan: &BatchPlan) -> Vec<&str> {
        plan.deliverable.iter().map(|i| i.iden.as_str()).collect()
    }

    #[test]
    fn test_empty_batch_leaves_cursor_unchanged() {
        let plan = plan_batch(Vec::new(), Some(&cursor("a", 100.0)), DEVICE);
        assert!(plan.deliverable.is_empty());
        assert!(plan.next_cursor.is_none());
    }

    #[test]
    fn test_first_run_delivers_entire_batch() {
        let batch = vec![item("b", 110.0), item("a", 100.0)];
        let plan = plan_batch(batch, None, DEVICE);

        assert_eq!(idens(&plan), vec!["a", "b"]);
        assert_eq!(plan.next_cursor, Some(cursor("b", 110.0)));
    }

    #[test]
    fn test_scan_stops_at_cursor_iden() {
        let batch = vec![item("c", 120.0), item("b", 110.0), item("a", 100.0)];
        let plan = plan_batch(batch, Some(&cursor("a", 100.0)), DEVICE);

        // Delivery order is oldest-first.
        assert_eq!(idens(&plan), vec!["b", "c"]);
        assert_eq!(plan.next_cursor, Some(cursor("c", 120.0)));
    }

    #[test]
    fn test_scan_stops_at_older_timestamp_when_cursor_fell_off_window() {
        // Cursor iden "x" is not in the window; the timestamp stop kicks in.
        let batch = vec![item("c", 120.0), item("b", 110.0), item("a", 90.0)];
        let plan = plan_batch(batch, Some(&cursor("x", 100.0)), DEVICE);

        assert_eq!(idens(&plan), vec!["b", "c"]);
    }

    #[test]
    fn test_cursor_outside_window_delivers_whole_batch() {
        // All items are newer than the cursor and its iden is absent:
        // conservative over-delivery rather than silent loss.
        let batch = vec![item("c", 120.0), item("b", 110.0), item("a", 105.0)];
        let plan = plan_batch(batch, Some(&cursor("x", 100.0)), DEVICE);

        assert_eq!(idens(&plan), vec!["a", "b", "c"]);
        assert_eq!(plan.next_cursor, Some(cursor("c", 120.0)));
    }

    #[test]
    fn test_equal_timestamp_different_iden_is_taken() {
        let batch = vec![item("b", 100.0), item("a", 100.0)];
        let plan = plan_batch(batch, Some(&cursor("a", 100.0)), DEVICE);

        assert_eq!(idens(&plan), vec!["b"]);
    }

    #[test]
    fn test_replaying_batch_with_updated_cursor_is_empty() {
        let batch = vec![item("c", 120.0), item("b", 110.0), item("a", 100.0)];
        let plan = plan_batch(batch.clone(), Some(&cursor("a", 100.0)), DEVICE);
        let advanced = plan.next_cursor.unwrap();

        // Idempotence: same batch against the advanced cursor yields nothing.
        let replay = plan_batch(batch, Some(&advanced), DEVICE);
        assert!(replay.deliverable.is_empty());
        assert_eq!(replay.next_cursor, Some(advanced));
    }

    #[test]
    fn test_no_delivered_item_is_at_or_before_cursor() {
        let batch = vec![
            item("e", 140.0),
            item("d", 130.0),
            item("c", 120.0),
            item("b", 110.0),
            item("a", 100.0),
        ];
        let c = cursor("c", 120.0);
        let plan = plan_batch(batch, Some(&c), DEVICE);

        for delivered in &plan.deliverable {
            assert!(delivered.modified > c.modified || delivered.iden != c.iden);
            assert!(delivered.modified >= c.modified);
        }
        assert_eq!(idens(&plan), vec!["d", "e"]);
    }

    #[test]
    fn test_delivery_order_is_ascending_by_modified() {
        let batch = vec![
            item("d", 130.0),
            item("c", 120.0),
            item("b", 110.0),
        ];
        let plan = plan_batch(batch, None, DEVICE);

        let times: Vec<f64> = plan.deliverable.iter().map(|i| i.modified).collect();
        let mut sorted = times.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).expect("finite timestamps"));
        assert_eq!(times, sorted);
    }

    #[test]
    fn test_other_devices_filtered_but_still_move_cursor() {
        let batch = vec![
            item_from("c", 120.0, "dev-other"),
            item("b", 110.0),
            item("a", 100.0),
        ];
        let plan = plan_batch(batch, Some(&cursor("a", 100.0)), DEVICE);

        // "c" is filtered out, yet the cursor still points at it.
        assert_eq!(idens(&plan), vec!["b"]);
        assert_eq!(plan.next_cursor, Some(cursor("c", 120.0)));
    }

    #[test]
    fn test_batch_entirely_from_other_devices() {
        let batch = vec![
            item_from("b", 110.0, "dev-other"),
            item_from("a", 100.0, "dev-other"),
        ];
        let plan = plan_batch(batch, None, DEVICE);

        assert!(plan.deliverable.is_empty());
        assert_eq!(plan.next_cursor, Some(cursor("b", 110.0)));
    }

    #[test]
    fn test_items_without_source_device_are_filtered() {
        let mut orphan = item("b", 110.0);
        orphan.source_device_iden = None;
        let batch = vec![orphan, item("a", 100.0)];
        let plan = plan_batch(batch, None, DEVICE);

        assert_eq!(idens(&plan), vec!["a"]);
    }
}

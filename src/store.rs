//! In-memory state for the live transaction feed.
//!
//! Pure state-update logic with no I/O: a bounded, newest-first list of
//! recently observed transactions plus a single ephemeral notification that
//! is replaced wholesale on every new feed event.

use chrono::{DateTime, Local};
use std::collections::VecDeque;

/// Maximum number of transactions retained in the feed window.
pub const MAX_TRANSACTIONS: usize = 20;

/// A transaction observed on the feed.
///
/// The hash is a first-class field; the human-readable message shown in the
/// list is derived from it, never the other way around.
#[derive(Clone, Debug, PartialEq)]
pub struct Transaction {
    pub hash: String,
    pub received_at: DateTime<Local>,
}

impl Transaction {
    pub fn new(hash: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            received_at: Local::now(),
        }
    }

    /// Display message for the feed list.
    pub fn message(&self) -> String {
        format!("New transaction: {}", self.hash)
    }
}

/// An ephemeral banner notification for the most recent feed event.
#[derive(Clone, Debug)]
pub struct Notification {
    pub message: String,
    pub timestamp: DateTime<Local>,
}

impl Notification {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timestamp: Local::now(),
        }
    }

    /// Relative age of the notification for banner display.
    pub fn time_ago(&self) -> String {
        let duration = Local::now().signed_duration_since(self.timestamp);
        if duration.num_seconds() < 60 {
            "just now".to_string()
        } else if duration.num_minutes() < 60 {
            format!("{}m ago", duration.num_minutes())
        } else if duration.num_hours() < 24 {
            format!("{}h ago", duration.num_hours())
        } else {
            self.timestamp.format("%m/%d %H:%M").to_string()
        }
    }
}

/// Bounded feed state: recent transactions plus the latest notification.
#[derive(Default)]
pub struct FeedStore {
    transactions: VecDeque<Transaction>,
    notification: Option<Notification>,
}

impl FeedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a newly observed transaction hash.
    ///
    /// Prepends to the list, evicts beyond [`MAX_TRANSACTIONS`], and replaces
    /// the notification with one for this event.
    pub fn record(&mut self, hash: impl Into<String>) {
        let tx = Transaction::new(hash);
        self.notification = Some(Notification::new(tx.message()));
        self.transactions.push_front(tx);
        while self.transactions.len() > MAX_TRANSACTIONS {
            self.transactions.pop_back();
        }
    }

    /// Transactions in display order, newest first.
    pub fn transactions(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// The latest notification, if any event has been seen.
    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_prepends_newest_first() {
        let mut store = FeedStore::new();
        store.record("aaa");
        store.record("bbb");
        store.record("ccc");

        let hashes: Vec<&str> = store.transactions().map(|t| t.hash.as_str()).collect();
        assert_eq!(hashes, vec!["ccc", "bbb", "aaa"]);
    }

    #[test]
    fn test_window_never_exceeds_max() {
        let mut store = FeedStore::new();
        for i in 0..25 {
            store.record(format!("hash{}", i));
        }
        assert_eq!(store.len(), MAX_TRANSACTIONS);

        // The 5 oldest entries are gone; the newest survives at the front.
        let hashes: Vec<&str> = store.transactions().map(|t| t.hash.as_str()).collect();
        assert_eq!(hashes[0], "hash24");
        assert_eq!(hashes[19], "hash5");
        assert!(!hashes.contains(&"hash4"));
    }

    #[test]
    fn test_list_length_is_min_of_events_and_max() {
        for n in [0usize, 1, 19, 20, 21, 40] {
            let mut store = FeedStore::new();
            for i in 0..n {
                store.record(format!("h{}", i));
            }
            assert_eq!(store.len(), n.min(MAX_TRANSACTIONS));
        }
    }

    #[test]
    fn test_notification_is_replaced_not_accumulated() {
        let mut store = FeedStore::new();
        assert!(store.notification().is_none());

        store.record("abc123");
        store.record("def456");

        let note = store.notification().expect("notification present");
        assert_eq!(note.message, "New transaction: def456");
    }

    #[test]
    fn test_transaction_message_format() {
        let tx = Transaction::new("abc123");
        assert_eq!(tx.message(), "New transaction: abc123");
    }

    #[test]
    fn test_notification_time_ago_fresh() {
        let note = Notification::new("test");
        assert_eq!(note.time_ago(), "just now");
    }
}

//! Realtime Change Feed
//!
//! Broadcast notifications for remote inserts/updates/deletes on watched
//! tables. Subscribers do not patch incrementally; any event (including a
//! lagged receiver that missed events) triggers a full re-fetch, so the
//! payload carries no row data.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Tables the feed reports on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WatchedTable {
    Boards,
    Columns,
    Cards,
}

/// Kind of remote change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// One remote change notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableChange {
    pub table: WatchedTable,
    pub kind: ChangeKind,
}

/// Fan-out handle for table change events
#[derive(Clone)]
pub struct ChangeFeed {
    tx: broadcast::Sender<TableChange>,
}

impl ChangeFeed {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TableChange> {
        self.tx.subscribe()
    }

    /// Notify all subscribers. Returns how many received it; zero
    /// subscribers is not an error.
    pub fn publish(&self, change: TableChange) -> usize {
        self.tx.send(change).unwrap_or(0)
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        // Overflow only drops events a subscriber would have coalesced into
        // one refresh anyway
        Self::new(16)
    }
}

/// Wait for the next change. `Lagged` still means "something changed", so it
/// is reported as an event; `Closed` ends the subscription.
pub async fn next_change(rx: &mut broadcast::Receiver<TableChange>) -> Option<TableChange> {
    match rx.recv().await {
        Ok(change) => Some(change),
        Err(broadcast::error::RecvError::Lagged(skipped)) => {
            log::debug!("change feed lagged, {} events coalesced", skipped);
            // Report the oldest retained event, or a generic card update if
            // none is ready; the refresh is total either way.
            Some(rx.try_recv().unwrap_or(TableChange {
                table: WatchedTable::Cards,
                kind: ChangeKind::Update,
            }))
        }
        Err(broadcast::error::RecvError::Closed) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_reaches_subscriber() {
        let feed = ChangeFeed::default();
        let mut rx = feed.subscribe();

        let change = TableChange {
            table: WatchedTable::Cards,
            kind: ChangeKind::Update,
        };
        assert_eq!(feed.publish(change), 1);
        assert_eq!(next_change(&mut rx).await, Some(change));
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_fine() {
        let feed = ChangeFeed::default();
        let change = TableChange {
            table: WatchedTable::Boards,
            kind: ChangeKind::Delete,
        };
        assert_eq!(feed.publish(change), 0);
    }

    #[tokio::test]
    async fn test_closed_feed_ends_subscription() {
        let feed = ChangeFeed::new(4);
        let mut rx = feed.subscribe();
        drop(feed);
        assert_eq!(next_change(&mut rx).await, None);
    }

    #[tokio::test]
    async fn test_lagged_receiver_still_sees_a_change() {
        let feed = ChangeFeed::new(1);
        let mut rx = feed.subscribe();

        for kind in [ChangeKind::Insert, ChangeKind::Update, ChangeKind::Delete] {
            feed.publish(TableChange {
                table: WatchedTable::Cards,
                kind,
            });
        }

        // Capacity 1: the receiver lagged, but an event still comes through
        assert!(next_change(&mut rx).await.is_some());
    }
}

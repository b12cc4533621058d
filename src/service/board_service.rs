//! Board Service
//!
//! One service instance manages one board on screen. Moves follow the
//! optimistic protocol: compute the fractional position synchronously, write
//! it into the cache so the UI reflects the drop immediately, then persist.
//! A failed write discards the optimistic state by re-fetching the
//! authoritative board; there is no partial or merged recovery.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::{Card, Column, DomainError, DomainResult, Placement};
use crate::feed::TableChange;
use crate::positioning;
use crate::repository::{CardPositioningOperations, CardRepository, ColumnRepository, Repository};
use crate::store::{BoardStore, RefreshReason};

/// Persistence seam for the service. Implemented over the repositories in
/// production; tests substitute an in-memory fake.
#[async_trait]
pub trait BoardPersistence: Send + Sync {
    /// Authoritative columns and cards of a board
    async fn load_board(&self, board_id: u32) -> DomainResult<(Vec<Column>, Vec<Card>)>;

    /// The single-row move write: placement and position together
    async fn persist_move(&self, card_id: u32, placement: &Placement, position: f64)
        -> DomainResult<()>;

    /// Insert a new card, returning it with its assigned id
    async fn persist_card(&self, card: &Card) -> DomainResult<Card>;
}

/// Production persistence over the SQLite repositories
pub struct RepositoryPersistence {
    columns: ColumnRepository,
    cards: CardRepository,
}

impl RepositoryPersistence {
    pub fn new(conn: Arc<Mutex<libsql::Connection>>) -> Self {
        Self {
            columns: ColumnRepository::new(conn.clone()),
            cards: CardRepository::new(conn),
        }
    }
}

#[async_trait]
impl BoardPersistence for RepositoryPersistence {
    async fn load_board(&self, board_id: u32) -> DomainResult<(Vec<Column>, Vec<Card>)> {
        let columns = self.columns.list_by_board(board_id).await?;
        let cards = self.cards.list_by_board(board_id).await?;
        Ok((columns, cards))
    }

    async fn persist_move(
        &self,
        card_id: u32,
        placement: &Placement,
        position: f64,
    ) -> DomainResult<()> {
        self.cards.move_card(card_id, placement, position).await
    }

    async fn persist_card(&self, card: &Card) -> DomainResult<Card> {
        self.cards.create(card).await
    }
}

/// Board operations over one cached board
pub struct BoardService<P: BoardPersistence> {
    persistence: P,
    board_id: u32,
    store: BoardStore,
}

impl<P: BoardPersistence> BoardService<P> {
    /// Service for `board_id`; call `refresh` to load the initial state
    pub fn new(persistence: P, board_id: u32) -> Self {
        Self {
            persistence,
            board_id,
            store: BoardStore::new(),
        }
    }

    /// Read access for rendering
    pub fn store(&self) -> &BoardStore {
        &self.store
    }

    /// Full re-fetch of the board into the cache
    pub async fn refresh(&mut self, reason: RefreshReason) -> DomainResult<()> {
        let (columns, cards) = self.persistence.load_board(self.board_id).await?;
        log::debug!(
            "board {} refreshed ({:?}): {} columns, {} cards",
            self.board_id,
            reason,
            columns.len(),
            cards.len()
        );
        self.store.replace_all(columns, cards);
        Ok(())
    }

    /// Any remote event invalidates the whole cache
    pub async fn handle_remote_change(&mut self, change: TableChange) -> DomainResult<()> {
        log::debug!("remote change on board {}: {:?}", self.board_id, change);
        self.refresh(RefreshReason::RemoteChange).await
    }

    /// Create a card appended to the bottom of `column_id`
    pub async fn create_card(&mut self, column_id: u32, title: String) -> DomainResult<Card> {
        let target = self
            .store
            .find_column(column_id)
            .ok_or_else(|| DomainError::InvalidInput(format!("No column {}", column_id)))?
            .clone();

        let neighbors: Vec<f64> = self
            .store
            .cards_in_column(column_id)
            .iter()
            .map(|card| card.position)
            .collect();
        let position = positioning::position_for_append(&neighbors);
        let placement = Placement::for_column(&self.store.columns, &target);

        let card = Card::new(0, self.board_id, placement, position, title);
        let created = self.persistence.persist_card(&card).await?;
        self.store.insert_card(created.clone());
        Ok(created)
    }

    /// Move a card to `column_id` at `target_index` (zero-based, clamped).
    ///
    /// Returns the card as placed. On persistence failure the optimistic
    /// state is discarded by re-fetching the authoritative board, and the
    /// original error is returned for notification mapping.
    pub async fn move_card(
        &mut self,
        card_id: u32,
        column_id: u32,
        target_index: usize,
    ) -> DomainResult<Card> {
        if self.store.find_card(card_id).is_none() {
            return Err(DomainError::NotFound(format!("Card {} not found", card_id)));
        }
        let target = self
            .store
            .find_column(column_id)
            .ok_or_else(|| DomainError::InvalidInput(format!("No column {}", column_id)))?
            .clone();

        // Neighbor list excludes the moving card; leaving it in corrupts the
        // gap calculation when moving within its own column.
        let neighbors: Vec<f64> = self
            .store
            .cards_in_column(column_id)
            .iter()
            .filter(|card| card.id != card_id)
            .map(|card| card.position)
            .collect();

        let position = positioning::position_for_insert(&neighbors, target_index);
        let placement = Placement::for_column(&self.store.columns, &target);

        // Optimistic: the UI sees the drop before the write completes
        self.store.apply_move(card_id, placement.clone(), position);

        if let Err(err) = self
            .persistence
            .persist_move(card_id, &placement, position)
            .await
        {
            log::warn!("move of card {} failed, reconciling: {}", card_id, err);
            if let Err(refresh_err) = self.refresh(RefreshReason::MutationApplied).await {
                log::warn!("reconciliation re-fetch also failed: {}", refresh_err);
            }
            return Err(err);
        }

        self.store
            .find_card(card_id)
            .cloned()
            .ok_or_else(|| DomainError::Internal("Moved card missing from cache".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TERMINAL_LABEL;
    use crate::feed::{ChangeKind, WatchedTable};
    use crate::service::messages::{user_message, MOVE_FAILED};
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
    use std::sync::Mutex as StdMutex;

    /// In-memory persistence with a failure switch for the move write
    struct FakePersistence {
        columns: Vec<Column>,
        cards: StdMutex<Vec<Card>>,
        next_id: AtomicU32,
        fail_moves: AtomicBool,
    }

    impl FakePersistence {
        fn new(columns: Vec<Column>, cards: Vec<Card>) -> Arc<Self> {
            let next_id = cards.iter().map(|c| c.id).max().unwrap_or(0) + 1;
            Arc::new(Self {
                columns,
                cards: StdMutex::new(cards),
                next_id: AtomicU32::new(next_id),
                fail_moves: AtomicBool::new(false),
            })
        }
    }

    #[async_trait]
    impl BoardPersistence for Arc<FakePersistence> {
        async fn load_board(&self, _board_id: u32) -> DomainResult<(Vec<Column>, Vec<Card>)> {
            Ok((self.columns.clone(), self.cards.lock().unwrap().clone()))
        }

        async fn persist_move(
            &self,
            card_id: u32,
            placement: &Placement,
            position: f64,
        ) -> DomainResult<()> {
            if self.fail_moves.load(Ordering::SeqCst) {
                return Err(DomainError::Internal("Failed to connect to replica".to_string()));
            }
            let mut cards = self.cards.lock().unwrap();
            let card = cards
                .iter_mut()
                .find(|c| c.id == card_id)
                .ok_or_else(|| DomainError::NotFound(format!("Card {} not found", card_id)))?;
            card.placement = placement.clone();
            card.position = position;
            Ok(())
        }

        async fn persist_card(&self, card: &Card) -> DomainResult<Card> {
            let mut created = card.clone();
            created.id = self.next_id.fetch_add(1, Ordering::SeqCst);
            self.cards.lock().unwrap().push(created.clone());
            Ok(created)
        }
    }

    fn board_columns() -> Vec<Column> {
        vec![
            Column::new(1, 1, "Backlog".to_string(), "TODO".to_string(), 0),
            Column::new(2, 1, "In Progress".to_string(), "IN_PROGRESS".to_string(), 1),
            Column::new(3, 1, "Done".to_string(), "Finished".to_string(), 2).as_terminal(),
        ]
    }

    fn card(id: u32, column_id: u32, label: &str, position: f64) -> Card {
        Card::new(
            id,
            1,
            Placement {
                column_id,
                label: label.to_string(),
            },
            position,
            format!("card-{}", id),
        )
    }

    async fn service_with(cards: Vec<Card>) -> (BoardService<Arc<FakePersistence>>, Arc<FakePersistence>) {
        let persistence = FakePersistence::new(board_columns(), cards);
        let mut service = BoardService::new(persistence.clone(), 1);
        service.refresh(RefreshReason::ManualRefresh).await.unwrap();
        (service, persistence)
    }

    #[tokio::test]
    async fn test_move_between_neighbors_takes_their_midpoint() {
        let (mut service, _) = service_with(vec![
            card(10, 1, "TODO", 1000.0),
            card(11, 1, "TODO", 3000.0),
            card(12, 2, "IN_PROGRESS", 1000.0),
        ])
        .await;

        let moved = service.move_card(12, 1, 1).await.expect("Move failed");
        assert_eq!(moved.position, 2000.0);
        assert_eq!(moved.placement.label, "TODO");

        let ids: Vec<u32> = service.store().cards_in_column(1).iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![10, 12, 11]);
    }

    #[tokio::test]
    async fn test_move_within_column_excludes_self_from_neighbors() {
        let (mut service, _) = service_with(vec![
            card(10, 1, "TODO", 1000.0),
            card(11, 1, "TODO", 2000.0),
            card(12, 1, "TODO", 3000.0),
        ])
        .await;

        // Card 12 to the top: half of the first remaining neighbor
        let moved = service.move_card(12, 1, 0).await.unwrap();
        assert_eq!(moved.position, 500.0);

        let ids: Vec<u32> = service.store().cards_in_column(1).iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![12, 10, 11]);
    }

    #[tokio::test]
    async fn test_move_into_terminal_column_derives_done_label() {
        let (mut service, persistence) = service_with(vec![card(10, 1, "TODO", 1000.0)]).await;

        let moved = service.move_card(10, 3, 0).await.unwrap();
        assert_eq!(moved.placement.column_id, 3);
        // Terminal label, not the column's nominal "Finished" label
        assert_eq!(moved.placement.label, TERMINAL_LABEL);

        // The same placement reached the durable store
        let stored = persistence.cards.lock().unwrap()[0].clone();
        assert_eq!(stored.placement.label, TERMINAL_LABEL);
    }

    #[tokio::test]
    async fn test_out_of_range_index_clamps_to_tail() {
        let (mut service, _) = service_with(vec![
            card(10, 2, "IN_PROGRESS", 1000.0),
            card(11, 1, "TODO", 1000.0),
        ])
        .await;

        let moved = service.move_card(11, 2, 99).await.unwrap();
        assert_eq!(moved.position, 2000.0);
    }

    #[tokio::test]
    async fn test_failed_move_reverts_to_authoritative_state() {
        let (mut service, persistence) = service_with(vec![
            card(10, 1, "TODO", 1000.0),
            card(11, 1, "TODO", 2000.0),
        ])
        .await;
        persistence.fail_moves.store(true, Ordering::SeqCst);

        let err = service.move_card(10, 2, 0).await.unwrap_err();

        // Optimistic state is gone: the card is back where the store of
        // record says it is
        let reverted = service.store().find_card(10).unwrap();
        assert_eq!(reverted.placement.column_id, 1);
        assert_eq!(reverted.position, 1000.0);
        assert!(service.store().cards_in_column(2).is_empty());

        // The failure maps to a friendly connection message; the UI also has
        // fixed failed-move text available
        assert_eq!(
            user_message(&err),
            "Could not reach the data store. Check your connection and try again."
        );
        assert!(!MOVE_FAILED.is_empty());
    }

    #[tokio::test]
    async fn test_create_card_appends_to_column() {
        let (mut service, _) = service_with(vec![card(10, 1, "TODO", 1000.0)]).await;

        let created = service.create_card(1, "New card".to_string()).await.unwrap();
        assert!(created.id > 10);
        assert_eq!(created.position, 2000.0);
        assert_eq!(created.placement.label, "TODO");

        let empty = service.create_card(2, "First in column".to_string()).await.unwrap();
        assert_eq!(empty.position, 1000.0);
    }

    #[tokio::test]
    async fn test_remote_change_triggers_full_refetch() {
        let (mut service, persistence) = service_with(vec![card(10, 1, "TODO", 1000.0)]).await;

        // Another client added a card behind our back
        persistence
            .cards
            .lock()
            .unwrap()
            .push(card(99, 2, "IN_PROGRESS", 1000.0));

        service
            .handle_remote_change(TableChange {
                table: WatchedTable::Cards,
                kind: ChangeKind::Insert,
            })
            .await
            .unwrap();

        assert!(service.store().find_card(99).is_some());
    }

    #[tokio::test]
    async fn test_move_unknown_card_is_not_found() {
        let (mut service, _) = service_with(vec![]).await;
        let err = service.move_card(404, 1, 0).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }
}

//! Board Cache Store
//!
//! Client-side copy of one board's columns and cards. The database owns the
//! authoritative state; this store is a read-through cache that is written
//! optimistically on mutation and replaced wholesale on refresh. Readers in
//! one render cycle treat its contents as immutable.

use crate::domain::{Card, Column, Placement};

/// Why a refresh ran. Every path that invalidates the cache names itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshReason {
    /// A local mutation was persisted (or failed and needs reconciliation)
    MutationApplied,
    /// The change feed reported a remote insert/update/delete
    RemoteChange,
    /// Caller-requested reload
    ManualRefresh,
}

/// Cached state for the board currently on screen
#[derive(Debug, Clone, Default)]
pub struct BoardStore {
    /// Columns in display order
    pub columns: Vec<Column>,
    /// All cards of the board, unordered; sort per column on read
    pub cards: Vec<Card>,
}

impl BoardStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wholesale replacement, the only way authoritative state enters
    pub fn replace_all(&mut self, columns: Vec<Column>, cards: Vec<Card>) {
        self.columns = columns;
        self.cards = cards;
    }

    /// Cards of one column, ascending by position with id as tiebreak
    pub fn cards_in_column(&self, column_id: u32) -> Vec<&Card> {
        let mut cards: Vec<&Card> = self
            .cards
            .iter()
            .filter(|card| card.placement.column_id == column_id)
            .collect();
        cards.sort_by(|a, b| {
            a.position
                .partial_cmp(&b.position)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.id.cmp(&b.id))
        });
        cards
    }

    pub fn find_card(&self, card_id: u32) -> Option<&Card> {
        self.cards.iter().find(|card| card.id == card_id)
    }

    pub fn find_column(&self, column_id: u32) -> Option<&Column> {
        self.columns.iter().find(|col| col.id == column_id)
    }

    /// Optimistic move: reassign placement and position in place
    pub fn apply_move(&mut self, card_id: u32, placement: Placement, position: f64) {
        if let Some(card) = self.cards.iter_mut().find(|card| card.id == card_id) {
            card.placement = placement;
            card.position = position;
        }
    }

    /// Add a card to the cache
    pub fn insert_card(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// Update a card in the cache by ID
    pub fn update_card(&mut self, updated: Card) {
        if let Some(card) = self.cards.iter_mut().find(|card| card.id == updated.id) {
            *card = updated;
        }
    }

    /// Remove a card from the cache by ID
    pub fn remove_card(&mut self, card_id: u32) {
        self.cards.retain(|card| card.id != card_id);
    }
}

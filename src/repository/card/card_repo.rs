//! Card Repository - Core CRUD Operations
//!
//! SQLite-backed implementation for Card CRUD operations.
//! Positioning operations (append keys, the single-row move write) are in
//! card_positioning.

use async_trait::async_trait;
use libsql::Connection;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::{Card, DomainError, DomainResult, Placement};
use super::super::traits::Repository;

pub(super) const SELECT_CARDS: &str =
    "SELECT id, board_id, column_id, label, position, title, description, assignee, due_at, created_at, updated_at FROM cards";

/// SQLite implementation of the Card repository
pub struct CardRepository {
    pub(super) conn: Arc<Mutex<Connection>>,
}

impl CardRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Cards of one column, ascending by position with id as tiebreak
    pub async fn list_by_column(&self, column_id: u32) -> DomainResult<Vec<Card>> {
        let conn = self.conn.lock().await;

        let mut rows = conn
            .query(
                &format!("{} WHERE column_id = ? ORDER BY position, id", SELECT_CARDS),
                libsql::params![column_id],
            )
            .await
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let mut cards = Vec::new();
        while let Ok(Some(row)) = rows.next().await {
            cards.push(row_to_card(&row)?);
        }
        Ok(cards)
    }

    /// All cards of one board
    pub async fn list_by_board(&self, board_id: u32) -> DomainResult<Vec<Card>> {
        let conn = self.conn.lock().await;

        let mut rows = conn
            .query(
                &format!("{} WHERE board_id = ? ORDER BY column_id, position, id", SELECT_CARDS),
                libsql::params![board_id],
            )
            .await
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let mut cards = Vec::new();
        while let Ok(Some(row)) = rows.next().await {
            cards.push(row_to_card(&row)?);
        }
        Ok(cards)
    }
}

#[async_trait]
impl Repository<Card> for CardRepository {
    async fn create(&self, entity: &Card) -> DomainResult<Card> {
        let conn = self.conn.lock().await;
        let now = chrono::Utc::now().timestamp_millis();

        conn.execute(
            "INSERT INTO cards (board_id, column_id, label, position, title, description, assignee, due_at, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            libsql::params![
                entity.board_id,
                entity.placement.column_id,
                entity.placement.label.clone(),
                entity.position,
                entity.title.clone(),
                entity.description.clone(),
                entity.assignee.clone(),
                entity.due_at,
                now,
                now
            ],
        )
        .await
        .map_err(|e| DomainError::Internal(e.to_string()))?;

        let id = conn.last_insert_rowid() as u32;

        let mut created = entity.clone();
        created.id = id;
        created.created_at = Some(now);
        created.updated_at = Some(now);
        Ok(created)
    }

    async fn find_by_id(&self, id: u32) -> DomainResult<Option<Card>> {
        let conn = self.conn.lock().await;

        let mut rows = conn
            .query(
                &format!("{} WHERE id = ?", SELECT_CARDS),
                libsql::params![id],
            )
            .await
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        if let Ok(Some(row)) = rows.next().await {
            Ok(Some(row_to_card(&row)?))
        } else {
            Ok(None)
        }
    }

    async fn list(&self) -> DomainResult<Vec<Card>> {
        let conn = self.conn.lock().await;

        let mut rows = conn
            .query(
                &format!("{} ORDER BY board_id, column_id, position, id", SELECT_CARDS),
                (),
            )
            .await
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let mut cards = Vec::new();
        while let Ok(Some(row)) = rows.next().await {
            cards.push(row_to_card(&row)?);
        }
        Ok(cards)
    }

    async fn update(&self, entity: &Card) -> DomainResult<Card> {
        let conn = self.conn.lock().await;

        conn.execute(
            "UPDATE cards SET column_id = ?, label = ?, position = ?, title = ?, description = ?, assignee = ?, due_at = ?, updated_at = ? WHERE id = ?",
            libsql::params![
                entity.placement.column_id,
                entity.placement.label.clone(),
                entity.position,
                entity.title.clone(),
                entity.description.clone(),
                entity.assignee.clone(),
                entity.due_at,
                chrono::Utc::now().timestamp_millis(),
                entity.id
            ],
        )
        .await
        .map_err(|e| DomainError::Internal(e.to_string()))?;

        Ok(entity.clone())
    }

    async fn delete(&self, id: u32) -> DomainResult<()> {
        let conn = self.conn.lock().await;

        conn.execute("DELETE FROM cards WHERE id = ?", libsql::params![id])
            .await
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        Ok(())
    }
}

/// Convert a database row to Card
pub(super) fn row_to_card(row: &libsql::Row) -> DomainResult<Card> {
    Ok(Card {
        id: row.get::<u32>(0).map_err(|e| DomainError::Internal(e.to_string()))?,
        board_id: row.get::<u32>(1).map_err(|e| DomainError::Internal(e.to_string()))?,
        placement: Placement {
            column_id: row.get::<u32>(2).map_err(|e| DomainError::Internal(e.to_string()))?,
            label: row.get::<String>(3).map_err(|e| DomainError::Internal(e.to_string()))?,
        },
        position: row.get::<f64>(4).map_err(|e| DomainError::Internal(e.to_string()))?,
        title: row.get::<String>(5).map_err(|e| DomainError::Internal(e.to_string()))?,
        description: row.get::<Option<String>>(6).ok().flatten(),
        assignee: row.get::<Option<String>>(7).ok().flatten(),
        due_at: row.get::<Option<i64>>(8).ok().flatten(),
        created_at: row.get::<Option<i64>>(9).ok().flatten(),
        updated_at: row.get::<Option<i64>>(10).ok().flatten(),
    })
}

//! Column Repository
//!
//! SQLite-backed CRUD for columns, plus the per-board listing in display
//! order that the service and label derivation rely on.

use async_trait::async_trait;
use libsql::Connection;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::{Column, DomainError, DomainResult};
use super::traits::Repository;

/// SQLite implementation of the Column repository
pub struct ColumnRepository {
    conn: Arc<Mutex<Connection>>,
}

const SELECT_COLUMNS: &str = "SELECT id, board_id, name, label, terminal, position FROM columns";

impl ColumnRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Columns of one board in display order
    pub async fn list_by_board(&self, board_id: u32) -> DomainResult<Vec<Column>> {
        let conn = self.conn.lock().await;

        let mut rows = conn
            .query(
                &format!("{} WHERE board_id = ? ORDER BY position, id", SELECT_COLUMNS),
                libsql::params![board_id],
            )
            .await
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let mut columns = Vec::new();
        while let Ok(Some(row)) = rows.next().await {
            columns.push(row_to_column(&row)?);
        }
        Ok(columns)
    }
}

#[async_trait]
impl Repository<Column> for ColumnRepository {
    async fn create(&self, entity: &Column) -> DomainResult<Column> {
        let conn = self.conn.lock().await;

        conn.execute(
            "INSERT INTO columns (board_id, name, label, terminal, position) VALUES (?, ?, ?, ?, ?)",
            libsql::params![
                entity.board_id,
                entity.name.clone(),
                entity.label.clone(),
                if entity.terminal { 1 } else { 0 },
                entity.position
            ],
        )
        .await
        .map_err(|e| DomainError::Internal(e.to_string()))?;

        let mut created = entity.clone();
        created.id = conn.last_insert_rowid() as u32;
        Ok(created)
    }

    async fn find_by_id(&self, id: u32) -> DomainResult<Option<Column>> {
        let conn = self.conn.lock().await;

        let mut rows = conn
            .query(
                &format!("{} WHERE id = ?", SELECT_COLUMNS),
                libsql::params![id],
            )
            .await
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        if let Ok(Some(row)) = rows.next().await {
            Ok(Some(row_to_column(&row)?))
        } else {
            Ok(None)
        }
    }

    async fn list(&self) -> DomainResult<Vec<Column>> {
        let conn = self.conn.lock().await;

        let mut rows = conn
            .query(
                &format!("{} ORDER BY board_id, position, id", SELECT_COLUMNS),
                (),
            )
            .await
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let mut columns = Vec::new();
        while let Ok(Some(row)) = rows.next().await {
            columns.push(row_to_column(&row)?);
        }
        Ok(columns)
    }

    async fn update(&self, entity: &Column) -> DomainResult<Column> {
        let conn = self.conn.lock().await;

        conn.execute(
            "UPDATE columns SET name = ?, label = ?, terminal = ?, position = ? WHERE id = ?",
            libsql::params![
                entity.name.clone(),
                entity.label.clone(),
                if entity.terminal { 1 } else { 0 },
                entity.position,
                entity.id
            ],
        )
        .await
        .map_err(|e| DomainError::Internal(e.to_string()))?;

        Ok(entity.clone())
    }

    async fn delete(&self, id: u32) -> DomainResult<()> {
        let conn = self.conn.lock().await;

        // Reject while cards remain in the column
        let mut rows = conn
            .query(
                "SELECT COUNT(*) FROM cards WHERE column_id = ?",
                libsql::params![id],
            )
            .await
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        if let Ok(Some(row)) = rows.next().await {
            let count: i64 = row.get(0).map_err(|e| DomainError::Internal(e.to_string()))?;
            if count > 0 {
                return Err(DomainError::Conflict(format!(
                    "Column {} still has {} cards",
                    id, count
                )));
            }
        }

        conn.execute("DELETE FROM columns WHERE id = ?", libsql::params![id])
            .await
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        Ok(())
    }
}

/// Convert a database row to Column
fn row_to_column(row: &libsql::Row) -> DomainResult<Column> {
    Ok(Column {
        id: row.get::<u32>(0).map_err(|e| DomainError::Internal(e.to_string()))?,
        board_id: row.get::<u32>(1).map_err(|e| DomainError::Internal(e.to_string()))?,
        name: row.get::<String>(2).map_err(|e| DomainError::Internal(e.to_string()))?,
        label: row.get::<String>(3).map_err(|e| DomainError::Internal(e.to_string()))?,
        terminal: row.get::<i32>(4).unwrap_or(0) != 0,
        position: row.get::<i32>(5).unwrap_or(0),
    })
}

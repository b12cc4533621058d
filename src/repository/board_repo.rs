//! Board Repository
//!
//! SQLite-backed CRUD for boards.

use async_trait::async_trait;
use libsql::Connection;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::{Board, DomainError, DomainResult};
use super::traits::Repository;

/// SQLite implementation of the Board repository
pub struct BoardRepository {
    conn: Arc<Mutex<Connection>>,
}

impl BoardRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl Repository<Board> for BoardRepository {
    async fn create(&self, entity: &Board) -> DomainResult<Board> {
        let conn = self.conn.lock().await;

        conn.execute(
            "INSERT INTO boards (name, created_at) VALUES (?, ?)",
            libsql::params![entity.name.clone(), chrono::Utc::now().timestamp_millis()],
        )
        .await
        .map_err(|e| DomainError::Internal(e.to_string()))?;

        let id = conn.last_insert_rowid() as u32;
        self.find_by_id_locked(&conn, id)
            .await?
            .ok_or_else(|| DomainError::Internal("Created board not found".to_string()))
    }

    async fn find_by_id(&self, id: u32) -> DomainResult<Option<Board>> {
        let conn = self.conn.lock().await;
        self.find_by_id_locked(&conn, id).await
    }

    async fn list(&self) -> DomainResult<Vec<Board>> {
        let conn = self.conn.lock().await;

        let mut rows = conn
            .query("SELECT id, name, created_at FROM boards ORDER BY id", ())
            .await
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let mut boards = Vec::new();
        while let Ok(Some(row)) = rows.next().await {
            boards.push(row_to_board(&row)?);
        }
        Ok(boards)
    }

    async fn update(&self, entity: &Board) -> DomainResult<Board> {
        let conn = self.conn.lock().await;

        conn.execute(
            "UPDATE boards SET name = ? WHERE id = ?",
            libsql::params![entity.name.clone(), entity.id],
        )
        .await
        .map_err(|e| DomainError::Internal(e.to_string()))?;

        Ok(entity.clone())
    }

    async fn delete(&self, id: u32) -> DomainResult<()> {
        let conn = self.conn.lock().await;

        // Reject while the board still has columns
        let mut rows = conn
            .query(
                "SELECT COUNT(*) FROM columns WHERE board_id = ?",
                libsql::params![id],
            )
            .await
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        if let Ok(Some(row)) = rows.next().await {
            let count: i64 = row.get(0).map_err(|e| DomainError::Internal(e.to_string()))?;
            if count > 0 {
                return Err(DomainError::Conflict(format!(
                    "Board {} still has {} columns",
                    id, count
                )));
            }
        }

        conn.execute("DELETE FROM boards WHERE id = ?", libsql::params![id])
            .await
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        Ok(())
    }
}

impl BoardRepository {
    async fn find_by_id_locked(
        &self,
        conn: &Connection,
        id: u32,
    ) -> DomainResult<Option<Board>> {
        let mut rows = conn
            .query(
                "SELECT id, name, created_at FROM boards WHERE id = ?",
                libsql::params![id],
            )
            .await
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        if let Ok(Some(row)) = rows.next().await {
            Ok(Some(row_to_board(&row)?))
        } else {
            Ok(None)
        }
    }
}

/// Convert a database row to Board
fn row_to_board(row: &libsql::Row) -> DomainResult<Board> {
    Ok(Board {
        id: row.get::<u32>(0).map_err(|e| DomainError::Internal(e.to_string()))?,
        name: row.get::<String>(1).map_err(|e| DomainError::Internal(e.to_string()))?,
        created_at: row.get::<Option<i64>>(2).ok().flatten(),
    })
}

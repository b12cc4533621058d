//! Card Positioning Operations
//!
//! Append keys for new cards and the single-row move write. A move changes
//! only the moved card's row: column membership, derived label, fractional
//! position and the update timestamp, all in one statement. Sibling rows are
//! never renumbered.

use async_trait::async_trait;

use crate::domain::{DomainError, DomainResult, Placement};
use crate::positioning;

/// Trait for card positioning operations
#[async_trait]
pub trait CardPositioningOperations {
    /// Get the append position for a column (used in create)
    async fn next_position(&self, column_id: u32) -> DomainResult<f64>;

    /// Move a card: write placement and position atomically
    async fn move_card(&self, id: u32, placement: &Placement, position: f64) -> DomainResult<()>;
}

#[async_trait]
impl CardPositioningOperations for super::card_repo::CardRepository {
    async fn next_position(&self, column_id: u32) -> DomainResult<f64> {
        let conn = self.conn.lock().await;

        let mut rows = conn
            .query(
                "SELECT MAX(position) FROM cards WHERE column_id = ?",
                libsql::params![column_id],
            )
            .await
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        // MAX over an empty column yields NULL
        let tail: Option<f64> = if let Ok(Some(row)) = rows.next().await {
            row.get::<Option<f64>>(0).ok().flatten()
        } else {
            None
        };

        Ok(match tail {
            Some(max) => positioning::position_for_append(&[max]),
            None => positioning::position_for_append(&[]),
        })
    }

    async fn move_card(&self, id: u32, placement: &Placement, position: f64) -> DomainResult<()> {
        let conn = self.conn.lock().await;

        let affected = conn
            .execute(
                "UPDATE cards SET column_id = ?, label = ?, position = ?, updated_at = ? WHERE id = ?",
                libsql::params![
                    placement.column_id,
                    placement.label.clone(),
                    position,
                    chrono::Utc::now().timestamp_millis(),
                    id
                ],
            )
            .await
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        if affected == 0 {
            return Err(DomainError::NotFound(format!("Card {} not found", id)));
        }

        Ok(())
    }
}

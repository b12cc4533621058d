//! Card Entity
//!
//! The unit of work being ordered and tracked. A card belongs to exactly one
//! column at a time (via its placement) and carries a fractional position
//! used for sorting within that column.

use serde::{Deserialize, Serialize};
use super::entity::Entity;
use super::placement::Placement;

/// A task card on a board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    /// Unique identifier
    pub id: u32,
    /// Owning board
    pub board_id: u32,
    /// Column membership plus the label it implies
    pub placement: Placement,
    /// Fractional sort key within the column; lower sorts first.
    /// Not unique across columns, ties break by id.
    pub position: f64,
    /// Card title
    pub title: String,
    /// Optional longer description
    pub description: Option<String>,
    /// Optional assignee identifier
    pub assignee: Option<String>,
    /// Optional due date (ms since epoch)
    pub due_at: Option<i64>,
    /// Creation timestamp (ms since epoch)
    pub created_at: Option<i64>,
    /// Last update timestamp (ms since epoch)
    pub updated_at: Option<i64>,
}

impl Card {
    /// Create a new card in a column at the given position
    pub fn new(id: u32, board_id: u32, placement: Placement, position: f64, title: String) -> Self {
        Self {
            id,
            board_id,
            placement,
            position,
            title,
            description: None,
            assignee: None,
            due_at: None,
            created_at: None,
            updated_at: None,
        }
    }
}

impl Entity for Card {
    type Id = u32;

    fn id(&self) -> Self::Id {
        self.id
    }
}

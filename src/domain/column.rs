//! Column Entity
//!
//! A column is an ordered bucket of cards on a board, corresponding to one
//! workflow stage. Columns keep integer display order; they are few and
//! rarely reordered, unlike cards.

use serde::{Deserialize, Serialize};
use super::entity::Entity;

/// A workflow column on a board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Unique identifier
    pub id: u32,
    /// Owning board
    pub board_id: u32,
    /// Column display name
    pub name: String,
    /// Primary workflow label applied to cards placed here
    pub label: String,
    /// Explicitly marks this column as the "done" stage
    pub terminal: bool,
    /// Display order within the board (ascending)
    pub position: i32,
}

impl Column {
    pub fn new(id: u32, board_id: u32, name: String, label: String, position: i32) -> Self {
        Self {
            id,
            board_id,
            name,
            label,
            terminal: false,
            position,
        }
    }

    /// Same column, explicitly flagged as the terminal (done) stage
    pub fn as_terminal(mut self) -> Self {
        self.terminal = true;
        self
    }
}

impl Entity for Column {
    type Id = u32;

    fn id(&self) -> Self::Id {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_creation() {
        let col = Column::new(1, 7, "In Progress".to_string(), "IN_PROGRESS".to_string(), 1);
        assert_eq!(col.id(), 1);
        assert_eq!(col.board_id, 7);
        assert!(!col.terminal);
    }

    #[test]
    fn test_terminal_flag() {
        let col = Column::new(2, 7, "Done".to_string(), "DONE".to_string(), 2).as_terminal();
        assert!(col.terminal);
    }
}

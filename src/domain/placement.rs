//! Card Placement
//!
//! Column membership and the workflow label derived from it, kept as one
//! value so the two can never disagree. Every write that changes a card's
//! column carries the matching label in the same update.

use serde::{Deserialize, Serialize};
use super::column::Column;

/// Label applied to any card entering a terminal column, regardless of the
/// column's own label.
pub const TERMINAL_LABEL: &str = "DONE";

/// Where a card lives: its column and the label that membership implies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    /// Column the card belongs to
    pub column_id: u32,
    /// Workflow label derived from the column
    pub label: String,
}

impl Placement {
    /// Build the placement for a card entering `target`.
    ///
    /// `board_columns` must be the target board's columns in display order.
    /// The terminal label applies when the target is explicitly flagged
    /// terminal; on boards where no column carries the flag, the last column
    /// in display order is treated as terminal instead. The explicit flag
    /// always wins over display order.
    pub fn for_column(board_columns: &[Column], target: &Column) -> Self {
        let label = if is_terminal(board_columns, target) {
            TERMINAL_LABEL.to_string()
        } else {
            target.label.clone()
        };
        Self {
            column_id: target.id,
            label,
        }
    }
}

fn is_terminal(board_columns: &[Column], target: &Column) -> bool {
    if target.terminal {
        return true;
    }
    if board_columns.iter().any(|c| c.terminal) {
        // Some column is explicitly flagged; the positional rule is off.
        return false;
    }
    board_columns.last().map(|c| c.id) == Some(target.id)
}

//! Board Entity
//!
//! A board groups columns and cards for one project/workflow.

use serde::{Deserialize, Serialize};
use super::entity::Entity;

/// A kanban board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    /// Unique identifier
    pub id: u32,
    /// Board display name
    pub name: String,
    /// Creation timestamp (ms since epoch)
    pub created_at: Option<i64>,
}

impl Board {
    pub fn new(id: u32, name: String) -> Self {
        Self {
            id,
            name,
            created_at: None,
        }
    }
}

impl Entity for Board {
    type Id = u32;

    fn id(&self) -> Self::Id {
        self.id
    }
}

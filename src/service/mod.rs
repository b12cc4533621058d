//! Service Layer
//!
//! Orchestrates board operations over the cache store and the persistence
//! seam: optimistic mutation, the durable write, and reconciliation when the
//! write fails. Also maps backend errors to user-facing notification text.

mod board_service;
mod messages;

pub use board_service::{BoardPersistence, BoardService, RepositoryPersistence};
pub use messages::{user_message, MOVE_FAILED};

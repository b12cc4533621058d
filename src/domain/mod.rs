//! Domain Layer
//!
//! Contains all domain entities and core abstractions.
//! This layer has NO external dependencies (except serde for serialization).

mod entity;
mod board;
mod column;
mod card;
mod placement;

pub use entity::{Entity, DomainError, DomainResult};
pub use board::Board;
pub use column::Column;
pub use card::Card;
pub use placement::{Placement, TERMINAL_LABEL};

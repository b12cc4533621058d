//! Card Repository Module
//!
//! Core CRUD lives in card_repo; positioning (append keys and the
//! single-row move write) is split into card_positioning.

mod card_repo;
mod card_positioning;

pub use card_repo::CardRepository;
pub use card_positioning::CardPositioningOperations;

//! Repository Layer
//!
//! Data access abstractions and implementations.

mod traits;
mod db;
mod board_repo;
mod column_repo;
mod card;


pub use traits::Repository;
pub use db::{init_db, DbState};
pub use board_repo::BoardRepository;
pub use column_repo::ColumnRepository;
pub use card::{CardRepository, CardPositioningOperations};

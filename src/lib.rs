//! Boardflow - Kanban Board Core
//!
//! Layered architecture:
//! - domain: Core entities (boards, columns, cards, placement) and business rules
//! - positioning: Fractional sort keys for drag-and-drop reordering
//! - repository: Data access abstractions and SQLite implementations
//! - store: Client-side cache of the board on screen
//! - service: Optimistic mutation flow over store and repository
//! - feed: Realtime change notifications driving cache refresh

pub mod domain;
pub mod positioning;
pub mod repository;
pub mod store;
pub mod service;
pub mod feed;

//! User-Facing Error Messages
//!
//! Backend errors carry technical text; the UI shows a short friendly line
//! instead. Mapping is a lowercase substring match against known phrases
//! with a generic fallback, so unknown backend wording degrades gracefully.

use crate::domain::DomainError;

/// Notification shown when a drag-and-drop move could not be persisted
pub const MOVE_FAILED: &str = "Could not move the card. The board has been reloaded.";

/// Map a domain error to notification text
pub fn user_message(err: &DomainError) -> &'static str {
    let text = err.to_string().to_lowercase();

    if text.contains("not found") {
        "That item no longer exists. The board has been refreshed."
    } else if text.contains("invalid input") {
        "That action is not valid here."
    } else if text.contains("conflict") {
        "Someone else changed this at the same time. Please try again."
    } else if text.contains("database") || text.contains("connect") || text.contains("network") {
        "Could not reach the data store. Check your connection and try again."
    } else {
        "Something went wrong. Please try again."
    }
}

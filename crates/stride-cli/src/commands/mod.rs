//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `coaching` - Coaching advice for a goal
//! - `core` - Shared utilities (open_store, settings, confirmation) and reset
//! - `goals` - Goal management commands (list, add, show, status, delete)
//! - `progress` - Journal entries and estimates (update, history, estimate)
//! - `prompts` - Prompt library management commands
//! - `serve` - Web server command

pub mod coaching;
pub mod core;
pub mod goals;
pub mod progress;
pub mod prompts;
pub mod serve;

// Re-export command functions for main.rs
pub use coaching::*;
pub use core::*;
pub use goals::*;
pub use progress::*;
pub use prompts::*;
pub use serve::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// First 8 characters of an id, enough to address a goal
pub fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

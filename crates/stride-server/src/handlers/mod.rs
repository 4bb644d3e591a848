//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod coaching;
pub mod health;
pub mod progress;

// Re-export all handlers for use in router
pub use coaching::*;
pub use health::*;
pub use progress::*;

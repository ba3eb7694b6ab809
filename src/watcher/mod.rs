//! File watcher for continuous rebuilds
//!
//! Implements the `watch` command with:
//! - Debouncing (100ms)
//! - Coalescing of changes that arrive during a rebuild
//! - Graceful Ctrl+C shutdown
//! - NDJSON output for CI

mod event;
mod session;

pub use event::{WatchEvent, WatchOptions, DEBOUNCE_MS};
pub use session::watch;

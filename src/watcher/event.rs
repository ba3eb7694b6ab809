//! Watch event types and options

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::domain::{to_asset_path, Variant};

/// Debounce duration in milliseconds
pub const DEBOUNCE_MS: u64 = 100;

/// Watch options
#[derive(Debug, Clone)]
pub struct WatchOptions {
    /// Source root; any change below it triggers a rebuild
    pub source: PathBuf,
    /// Variants rebuilt for every application
    pub variants: Vec<Variant>,
    /// Destination override for bundled variants
    pub dest: Option<PathBuf>,
}

/// Watch event types for NDJSON output
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WatchEvent {
    WatchStarted {
        source: String,
        tasks: usize,
    },
    FileChanged {
        path: String,
    },
    RebuildStarted {
        plan: String,
        /// Changed paths coalesced into this rebuild, 0 for the initial build
        changes: usize,
    },
    RebuildComplete {
        succeeded: usize,
        failed: usize,
    },
    Error {
        message: String,
    },
    Shutdown,
}

impl WatchEvent {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Changed paths waiting for the source tree to go quiet.
///
/// Paths are kept relative to the source root, so the same file reported
/// under two spellings counts once. Anything that arrives while a rebuild
/// runs is folded into the next batch.
pub(crate) struct PendingChanges {
    source: PathBuf,
    paths: BTreeSet<String>,
    last_seen: Option<Instant>,
}

impl PendingChanges {
    pub(crate) fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            paths: BTreeSet::new(),
            last_seen: None,
        }
    }

    pub(crate) fn record(&mut self, path: &Path) {
        let relative = path
            .strip_prefix(&self.source)
            .map(to_asset_path)
            .unwrap_or_else(|_| path.display().to_string());
        self.paths.insert(relative);
        self.last_seen = Some(Instant::now());
    }

    pub(crate) fn len(&self) -> usize {
        self.paths.len()
    }

    /// The sorted batch, once nothing has changed for `DEBOUNCE_MS`.
    pub(crate) fn settle(&mut self) -> Option<Vec<String>> {
        let quiet = self
            .last_seen
            .is_some_and(|last| last.elapsed() >= Duration::from_millis(DEBOUNCE_MS));
        if !quiet || self.paths.is_empty() {
            return None;
        }
        self.last_seen = None;
        Some(std::mem::take(&mut self.paths).into_iter().collect())
    }
}

//! Cleaning: delete output roots before any pipeline starts

use std::path::PathBuf;

use serde::Serialize;

use crate::error::{BuildError, BuildResult};

/// Result of a clean operation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanResult {
    /// Roots that existed and were deleted
    pub deleted: Vec<PathBuf>,
    /// Roots that did not exist
    pub missing: Vec<PathBuf>,
}

impl CleanResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_count(&self) -> usize {
        self.deleted.len() + self.missing.len()
    }
}

/// Recursively delete every root. The first failure aborts.
pub async fn clean_roots(roots: &[PathBuf]) -> BuildResult<CleanResult> {
    let mut result = CleanResult::new();
    for root in roots {
        match tokio::fs::remove_dir_all(root).await {
            Ok(()) => {
                tracing::debug!(root = %root.display(), "deleted output root");
                result.deleted.push(root.clone());
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                result.missing.push(root.clone());
            }
            Err(e) => return Err(BuildError::io_at(root, e)),
        }
    }
    Ok(result)
}

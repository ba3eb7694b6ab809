//! Staged output writer
//!
//! A pair's files are written into a staging directory next to the final
//! output directory, then the staging directory is renamed into place.
//! A pair that fails before this point leaves no output directory behind.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::{BuildError, BuildResult};

/// Where the bytes of an output file come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Assembled in memory
    Bytes(Vec<u8>),
    /// Copied verbatim from a source file
    CopyFrom(PathBuf),
}

/// One file of a pair's output, relative to the output directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    pub path: String,
    pub payload: Payload,
}

impl OutputFile {
    pub fn bytes(path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            payload: Payload::Bytes(content.into()),
        }
    }

    pub fn copy(path: impl Into<String>, source: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            payload: Payload::CopyFrom(source.into()),
        }
    }
}

/// Write `files` under `output_dir`, replacing it as a whole.
pub async fn write_staged(output_dir: &Path, files: Vec<OutputFile>) -> BuildResult<()> {
    let output_dir = output_dir.to_path_buf();
    tokio::task::spawn_blocking(move || write_staged_blocking(&output_dir, &files))
        .await
        .map_err(|e| BuildError::Io(std::io::Error::other(e.to_string())))?
}

fn write_staged_blocking(output_dir: &Path, files: &[OutputFile]) -> BuildResult<()> {
    let parent = output_dir.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent).map_err(|e| BuildError::io_at(parent, e))?;

    let staging = tempfile::Builder::new()
        .prefix(".assetry-staging-")
        .tempdir_in(parent)
        .map_err(|e| BuildError::io_at(parent, e))?;

    for file in files {
        let target = staging.path().join(&file.path);
        match &file.payload {
            Payload::Bytes(content) => atomic_write(&target, content)?,
            Payload::CopyFrom(source) => {
                if let Some(dir) = target.parent() {
                    fs::create_dir_all(dir).map_err(|e| BuildError::io_at(dir, e))?;
                }
                fs::copy(source, &target).map_err(|e| BuildError::io_at(source, e))?;
            }
        }
    }

    if output_dir.exists() {
        fs::remove_dir_all(output_dir).map_err(|e| BuildError::io_at(output_dir, e))?;
    }
    // The emptied staging handle is dropped afterwards; its cleanup is a no-op.
    fs::rename(staging.path(), output_dir).map_err(|e| BuildError::io_at(output_dir, e))?;
    Ok(())
}

/// Write content to a file atomically (tempfile + rename)
pub fn atomic_write(path: &Path, content: &[u8]) -> BuildResult<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir).map_err(|e| BuildError::io_at(dir, e))?;

    let mut temp = NamedTempFile::new_in(dir).map_err(|e| BuildError::io_at(dir, e))?;
    temp.write_all(content)
        .map_err(|e| BuildError::io_at(path, e))?;
    temp.persist(path)
        .map_err(|e| BuildError::io_at(path, e.error))?;
    Ok(())
}

//! Error types for assetry
//!
//! Library code returns [`BuildError`]; the binary wraps it with `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::Variant;

/// Result type alias for build operations
pub type BuildResult<T> = Result<T, BuildError>;

/// Broad failure classes, used to decide how far a failure propagates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad layout, missing declared file, unresolved environment tag.
    /// Fails the affected (application, variant) pair only.
    Configuration,
    /// Template compiler or minifier rejected its input.
    Compiler,
    /// Disk-level failure. Fatal for the whole invocation.
    Filesystem,
    /// Two distinct assets mapped to one fingerprinted name.
    Collision,
}

/// Main error type for build operations
#[derive(Error, Debug)]
pub enum BuildError {
    /// Application identifier not declared in the layout
    #[error("unknown application '{app}' (declared: {declared})")]
    UnknownApp { app: String, declared: String },

    /// Configuration file could not be parsed or failed validation
    #[error("invalid configuration in {file}: {message}")]
    InvalidConfig { file: PathBuf, message: String },

    /// Index page for an application does not exist
    #[error("index page not found: {path}")]
    MissingIndexPage { path: PathBuf },

    /// The index page references a file that is not in the resolved file set
    #[error("missing file '{path}' referenced by {page}")]
    MissingReference { path: String, page: String },

    /// An environment block names a target tag nobody knows about
    #[error("unresolved environment tag '{tag}' in {page}")]
    UnresolvedTag { tag: String, page: String },

    /// Environment or build blocks are not well formed
    #[error("malformed index page {page}: {message}")]
    InvalidIndexPage { page: String, message: String },

    /// Template compiler failure
    #[error("failed to compile template {path}: {message}")]
    Template { path: String, message: String },

    /// Script or style minifier failure
    #[error("failed to minify {path}: {message}")]
    Minify { path: String, message: String },

    /// Two assets would be written under the same fingerprinted name
    #[error("fingerprint collision: '{first}' and '{second}' both map to '{name}'")]
    FingerprintCollision {
        name: String,
        first: String,
        second: String,
    },

    /// An output root would delete or overwrite sources
    #[error("output directory {output} overlaps source tree {source_root}")]
    OutputOverlapsSource {
        output: PathBuf,
        source_root: PathBuf,
    },

    /// An output root would delete the project itself
    #[error("output directory {output} contains the project root {root}")]
    OutputContainsProject { output: PathBuf, root: PathBuf },

    /// Two tasks in one run would write the same directory
    #[error("tasks '{first}' and '{second}' both write to {path}")]
    SharedOutput {
        path: PathBuf,
        first: String,
        second: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// IO error with the path it happened on
    #[error("IO error on {path}: {source}")]
    PathIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Source tree walk failed
    #[error("failed to scan {path}: {message}")]
    Walk { path: PathBuf, message: String },

    /// File watcher setup failed
    #[error("file watcher error: {0}")]
    Watch(String),

    /// A failure attributed to one (application, variant) pair
    #[error("{app} [{variant}]: {source}")]
    Pair {
        app: String,
        variant: Variant,
        #[source]
        source: Box<BuildError>,
    },
}

impl BuildError {
    /// Wrap an IO error with the path it concerns
    pub fn io_at(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BuildError::PathIo {
            path: path.into(),
            source,
        }
    }

    /// Attribute this error to an (application, variant) pair
    pub fn in_pair(self, app: &str, variant: Variant) -> Self {
        match self {
            already @ BuildError::Pair { .. } => already,
            other => BuildError::Pair {
                app: app.to_string(),
                variant,
                source: Box::new(other),
            },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            BuildError::UnknownApp { .. }
            | BuildError::InvalidConfig { .. }
            | BuildError::MissingIndexPage { .. }
            | BuildError::MissingReference { .. }
            | BuildError::UnresolvedTag { .. }
            | BuildError::InvalidIndexPage { .. }
            | BuildError::OutputOverlapsSource { .. }
            | BuildError::OutputContainsProject { .. }
            | BuildError::SharedOutput { .. } => ErrorKind::Configuration,
            BuildError::Template { .. } | BuildError::Minify { .. } => ErrorKind::Compiler,
            BuildError::FingerprintCollision { .. } => ErrorKind::Collision,
            BuildError::Io(_)
            | BuildError::PathIo { .. }
            | BuildError::Walk { .. }
            | BuildError::Watch(_) => ErrorKind::Filesystem,
            BuildError::Pair { source, .. } => source.kind(),
        }
    }

    /// Whether this failure must stop every other pipeline of the invocation
    pub fn is_fatal(&self) -> bool {
        self.kind() == ErrorKind::Filesystem
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_missing_reference() {
        let err = BuildError::MissingReference {
            path: "alpha/app.js".to_string(),
            page: "alpha.html".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "missing file 'alpha/app.js' referenced by alpha.html"
        );
    }

    #[test]
    fn test_error_display_pair_names_app_and_variant() {
        let err = BuildError::UnresolvedTag {
            tag: "staging".to_string(),
            page: "beta.html".to_string(),
        }
        .in_pair("beta", Variant::Distribution);
        assert_eq!(
            err.to_string(),
            "beta [dist]: unresolved environment tag 'staging' in beta.html"
        );
    }

    #[test]
    fn test_in_pair_does_not_double_wrap() {
        let err = BuildError::Watch("boom".to_string())
            .in_pair("alpha", Variant::Development)
            .in_pair("beta", Variant::Debug);
        assert!(err.to_string().starts_with("alpha [dev]"));
    }

    #[test]
    fn test_kind_classification() {
        let collision = BuildError::FingerprintCollision {
            name: "a-1.js".to_string(),
            first: "a.js".to_string(),
            second: "b.js".to_string(),
        };
        assert_eq!(collision.kind(), ErrorKind::Collision);
        assert!(!collision.is_fatal());

        let io = BuildError::io_at("/tmp/x", std::io::Error::other("disk full"));
        assert_eq!(io.kind(), ErrorKind::Filesystem);
        assert!(io.in_pair("alpha", Variant::Concatenated).is_fatal());
    }
}

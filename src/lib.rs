//! Assetry - multi-application front-end asset build orchestrator
//!
//! Assetry builds several single-page applications from one source tree.
//! Every application is built in five variants: three verbatim copies
//! (dev, debug, e2e) and two bundled ones (concat, dist) whose scripts and
//! styles are concatenated, optionally minified, and fingerprinted.

pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod orchestrator;
pub mod pipeline;
pub mod resolver;
pub mod selector;
pub mod watcher;

// Re-exports for convenience
pub use config::{Config, ProjectLayout};
pub use domain::{
    AssetItem, AssetKind, FingerprintManifest, Namespace, ScriptMinifier, StyleMinifier,
    TemplateCompiler, Variant,
};
pub use error::{BuildError, BuildResult, ErrorKind};
pub use orchestrator::{CleanResult, Orchestrator, PairReport, Plan, RunReport, TaskTable};
pub use pipeline::{Collaborators, Pipeline, PipelineOutput, Stage};
pub use watcher::{watch, WatchEvent, WatchOptions};

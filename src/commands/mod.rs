//! Command handlers
//!
//! Every handler loads the project through [`Context::load`], runs one
//! library operation, then renders the outcome as text or NDJSON.

pub mod build;
pub mod clean;
pub mod tasks;
pub mod watch;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};

use assetry::config::{with_env_overrides, Config, ProjectLayout};
use assetry::pipeline::Collaborators;
use assetry::Orchestrator;

/// Everything a command needs, resolved to absolute paths
pub struct Context {
    pub orchestrator: Arc<Orchestrator>,
    pub dest: Option<PathBuf>,
    pub json: bool,
}

impl Context {
    /// Load `config_path` (defaults when absent), apply `ASSETRY_*`
    /// overrides and validate the layout. Paths in the file are relative to
    /// the directory holding it.
    pub fn load(config_path: &Path, dest: Option<&Path>, json: bool) -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to read the working directory")?;
        let config_path = cwd.join(config_path);
        let root = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| cwd.clone());

        let (config, warnings) = Config::load_or_default(&config_path)
            .with_context(|| format!("failed to load {}", config_path.display()))?;
        for warning in &warnings {
            tracing::warn!("{warning}");
        }
        let config = with_env_overrides(config);

        let layout = ProjectLayout::from_config(&config, &root)?;
        if layout.apps().is_empty() {
            tracing::warn!(config = %config_path.display(), "no applications declared");
        }

        Ok(Self {
            orchestrator: Arc::new(Orchestrator::new(
                Arc::new(layout),
                Collaborators::default(),
            )),
            dest: dest.map(|d| cwd.join(d)),
            json,
        })
    }

    pub fn layout(&self) -> &ProjectLayout {
        self.orchestrator.layout()
    }
}

/// `path` relative to `base` when below it, for display
pub(crate) fn display_path(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .display()
        .to_string()
}

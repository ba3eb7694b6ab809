//! Configuration type definitions

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::BuildResult;

use super::loader::{self, ConfigWarning};

/// Source tree conventions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Source root, relative to the configuration file
    #[serde(default = "default_src")]
    pub src: PathBuf,

    #[serde(default = "default_shared")]
    pub shared: String,

    #[serde(default = "default_vendor")]
    pub vendor: String,

    #[serde(default = "default_assets")]
    pub assets: String,

    /// Script bundle that receives the compiled templates
    #[serde(default = "default_main_script")]
    pub main_script: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            src: default_src(),
            shared: default_shared(),
            vendor: default_vendor(),
            assets: default_assets(),
            main_script: default_main_script(),
        }
    }
}

fn default_src() -> PathBuf {
    PathBuf::from("src")
}

fn default_shared() -> String {
    "shared".to_string()
}

fn default_vendor() -> String {
    "vendor".to_string()
}

fn default_assets() -> String {
    "assets".to_string()
}

fn default_main_script() -> String {
    "app.js".to_string()
}

/// One application folder under the source root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub name: String,
    pub namespace: String,
}

/// Output directory per variant, relative to the configuration file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_dev")]
    pub dev: PathBuf,

    #[serde(default = "default_debug")]
    pub debug: PathBuf,

    #[serde(default = "default_e2e")]
    pub e2e: PathBuf,

    #[serde(default = "default_concat")]
    pub concat: PathBuf,

    #[serde(default = "default_dist")]
    pub dist: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dev: default_dev(),
            debug: default_debug(),
            e2e: default_e2e(),
            concat: default_concat(),
            dist: default_dist(),
        }
    }
}

fn default_dev() -> PathBuf {
    PathBuf::from("build-dev")
}

fn default_debug() -> PathBuf {
    PathBuf::from("build-debug")
}

fn default_e2e() -> PathBuf {
    PathBuf::from("build-e2e")
}

fn default_concat() -> PathBuf {
    PathBuf::from("build")
}

fn default_dist() -> PathBuf {
    PathBuf::from("dist")
}

/// Files pulled into bundled builds from their own base directory,
/// e.g. bootstrap fonts landing in `fonts/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraAssetConfig {
    /// Base directory, relative to the source root
    pub base: String,
    /// Gitignore-style globs, relative to `base`
    pub patterns: Vec<String>,
}

/// Literal text replacement applied to bundled scripts and styles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteRule {
    pub from: String,
    pub to: String,
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub project: ProjectConfig,

    #[serde(default)]
    pub apps: Vec<AppConfig>,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub extra_assets: Vec<ExtraAssetConfig>,

    #[serde(default)]
    pub rewrites: Vec<RewriteRule>,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> BuildResult<Self> {
        let (config, _warnings) = loader::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and collect non-fatal warnings (e.g. unknown keys).
    pub fn load_with_warnings(path: &Path) -> BuildResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Load from `path` if it exists, otherwise return defaults
    pub fn load_or_default(path: &Path) -> BuildResult<(Self, Vec<ConfigWarning>)> {
        loader::load_or_default(path)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> BuildResult<Self> {
        toml::from_str(content).map_err(|e| crate::error::BuildError::InvalidConfig {
            file: PathBuf::from("<inline>"),
            message: e.to_string(),
        })
    }
}

//! Configuration module for assetry
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (ASSETRY_*)
//! 3. Project config (assetry.toml)
//! 4. Built-in defaults (lowest priority)

mod layout;
mod loader;
mod types;

pub use layout::{AppSpec, ExtraAssetSet, ProjectLayout};
pub use loader::ConfigWarning;
pub use types::{AppConfig, Config, ExtraAssetConfig, OutputConfig, ProjectConfig, RewriteRule};

/// Default configuration file name
pub const CONFIG_FILE: &str = "assetry.toml";

/// Apply environment variable overrides (ASSETRY_* prefix)
pub fn with_env_overrides(mut config: Config) -> Config {
    // ASSETRY_SRC
    if let Ok(src) = std::env::var("ASSETRY_SRC") {
        if !src.trim().is_empty() {
            config.project.src = src.into();
        }
    }

    // ASSETRY_MAIN_SCRIPT
    if let Ok(main_script) = std::env::var("ASSETRY_MAIN_SCRIPT") {
        if !main_script.trim().is_empty() {
            config.project.main_script = main_script;
        }
    }

    config
}

//! Project layout - the validated, immutable view of a configuration
//!
//! Built once at startup and shared (behind an `Arc`) by every pipeline.

use std::collections::{BTreeMap, HashSet};
use std::path::{Component, Path, PathBuf};

use crate::domain::{Namespace, Variant};
use crate::error::{BuildError, BuildResult};

use super::types::{Config, RewriteRule};

/// A declared application
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSpec {
    pub name: String,
    pub namespace: Namespace,
}

/// Extra asset globs resolved against their own base directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtraAssetSet {
    /// Absolute base directory
    pub base: PathBuf,
    pub patterns: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ProjectLayout {
    root: PathBuf,
    src: PathBuf,
    apps: Vec<AppSpec>,
    shared: String,
    vendor: String,
    assets: String,
    main_script: String,
    outputs: BTreeMap<Variant, PathBuf>,
    extra_assets: Vec<ExtraAssetSet>,
    rewrites: Vec<RewriteRule>,
}

impl ProjectLayout {
    /// Validate `config` and resolve its paths against `root`
    /// (the directory holding the configuration file).
    pub fn from_config(config: &Config, root: &Path) -> BuildResult<Self> {
        let invalid = |message: String| BuildError::InvalidConfig {
            file: root.join("assetry.toml"),
            message,
        };

        let reserved = [
            config.project.shared.as_str(),
            config.project.vendor.as_str(),
            config.project.assets.as_str(),
        ];
        let mut names = HashSet::new();
        let mut namespaces = HashSet::new();
        let mut apps = Vec::with_capacity(config.apps.len());
        for app in &config.apps {
            if app.name.is_empty() || app.name.contains(['/', '\\']) || app.name.starts_with('.')
            {
                return Err(invalid(format!("invalid application name '{}'", app.name)));
            }
            if reserved.contains(&app.name.as_str()) {
                return Err(invalid(format!(
                    "application '{}' collides with a reserved folder",
                    app.name
                )));
            }
            if !names.insert(app.name.clone()) {
                return Err(invalid(format!("application '{}' declared twice", app.name)));
            }
            let namespace = Namespace::parse(&app.namespace).map_err(&invalid)?;
            if !namespaces.insert(namespace.clone()) {
                return Err(invalid(format!(
                    "namespace '{}' used by more than one application",
                    namespace
                )));
            }
            apps.push(AppSpec {
                name: app.name.clone(),
                namespace,
            });
        }

        if config.project.main_script.is_empty() {
            return Err(invalid("main_script must not be empty".to_string()));
        }
        for rule in &config.rewrites {
            if rule.from.is_empty() {
                return Err(invalid("rewrite rule with empty 'from'".to_string()));
            }
        }

        let root = normalize(root);
        let src = normalize(&root.join(&config.project.src));
        let outputs: BTreeMap<Variant, PathBuf> = [
            (Variant::Development, &config.output.dev),
            (Variant::Debug, &config.output.debug),
            (Variant::EndToEnd, &config.output.e2e),
            (Variant::Concatenated, &config.output.concat),
            (Variant::Distribution, &config.output.dist),
        ]
        .into_iter()
        .map(|(variant, dir)| (variant, normalize(&root.join(dir))))
        .collect();
        for output in outputs.values() {
            check_output(output, &root, &src)?;
        }

        let extra_assets = config
            .extra_assets
            .iter()
            .map(|extra| ExtraAssetSet {
                base: src.join(&extra.base),
                patterns: extra.patterns.clone(),
            })
            .collect();

        Ok(Self {
            root,
            src,
            apps,
            shared: config.project.shared.clone(),
            vendor: config.project.vendor.clone(),
            assets: config.project.assets.clone(),
            main_script: config.project.main_script.clone(),
            outputs,
            extra_assets,
            rewrites: config.rewrites.clone(),
        })
    }

    /// Directory holding the configuration file
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn src(&self) -> &Path {
        &self.src
    }

    pub fn apps(&self) -> &[AppSpec] {
        &self.apps
    }

    pub fn app_names(&self) -> Vec<&str> {
        self.apps.iter().map(|a| a.name.as_str()).collect()
    }

    /// Look up a declared application
    pub fn app(&self, name: &str) -> BuildResult<&AppSpec> {
        self.apps
            .iter()
            .find(|a| a.name == name)
            .ok_or_else(|| BuildError::UnknownApp {
                app: name.to_string(),
                declared: self.app_names().join(", "),
            })
    }

    pub fn shared(&self) -> &str {
        &self.shared
    }

    pub fn vendor(&self) -> &str {
        &self.vendor
    }

    pub fn assets(&self) -> &str {
        &self.assets
    }

    pub fn main_script(&self) -> &str {
        &self.main_script
    }

    pub fn extra_assets(&self) -> &[ExtraAssetSet] {
        &self.extra_assets
    }

    pub fn rewrites(&self) -> &[RewriteRule] {
        &self.rewrites
    }

    /// Configured output root of a variant, before any override
    pub fn configured_output(&self, variant: Variant) -> &Path {
        self.outputs
            .get(&variant)
            .map(PathBuf::as_path)
            .unwrap_or_else(|| Path::new(variant.policy().default_output))
    }

    /// Directory owned by one (application, variant) pair
    pub fn pair_output(&self, app: &str, variant: Variant, dest: Option<&Path>) -> PathBuf {
        variant
            .output_root(self.configured_output(variant), dest)
            .join(app)
    }

    /// Every root the Cleaning phase deletes
    pub fn output_roots(&self, dest: Option<&Path>) -> Vec<PathBuf> {
        let mut roots: Vec<PathBuf> = self.outputs.values().cloned().collect();
        if let Some(dest) = dest {
            roots.push(dest.to_path_buf());
        }
        roots.sort();
        roots.dedup();
        roots
    }

    /// Reject a destination override that would clobber sources
    pub fn check_dest(&self, dest: &Path) -> BuildResult<()> {
        check_output(&normalize(dest), &self.root, &self.src)
    }
}

/// Resolve `.` and `..` without touching the filesystem.
///
/// Output roots may not exist yet, so canonicalizing is not an option.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other),
        }
    }
    out
}

/// `output` must be normalized
fn check_output(output: &Path, root: &Path, src: &Path) -> BuildResult<()> {
    if root.starts_with(output) {
        return Err(BuildError::OutputContainsProject {
            output: output.to_path_buf(),
            root: root.to_path_buf(),
        });
    }
    if src.starts_with(output) || output.starts_with(src) {
        return Err(BuildError::OutputOverlapsSource {
            output: output.to_path_buf(),
            source_root: src.to_path_buf(),
        });
    }
    Ok(())
}

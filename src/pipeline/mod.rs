//! Per (application, variant) build pipeline
//!
//! ## Flow
//!
//! 1. Resolve inputs and read the index page
//! 2. Keep the environment blocks of the variant's target
//! 3. Copy variants: copy the resolved file set verbatim
//! 4. Bundled variants: concatenate, inject templates, rewrite paths,
//!    minify (dist only), fingerprint and patch references
//! 5. Write everything through a staging directory
//!
//! The output is assembled in memory; nothing touches the output
//! directory until every stage has succeeded.

pub mod concat;
pub mod copy;
pub mod fingerprint;
pub mod output;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::ProjectLayout;
use crate::domain::{
    AssetItem, AssetKind, FingerprintManifest, ScriptMinifier, StyleMinifier, TemplateCompiler,
    Variant,
};
use crate::error::{BuildError, BuildResult};
use crate::infrastructure::{CssMinifier, JsMinifier, TemplateCacheCompiler};
use crate::resolver::{self, SourceSet};
use crate::selector;

use self::concat::{append_templates, apply_rewrites, concatenate, parse_build_blocks};
use self::fingerprint::{fingerprint, INDEX_PAGE};
use self::output::{write_staged, OutputFile};

/// Sets copied by the copy variants
const COPY_SETS: [SourceSet; 4] = [
    SourceSet::App,
    SourceSet::Shared,
    SourceSet::Vendor,
    SourceSet::Assets,
];

/// Sets the bundled variants read from
const BUNDLE_SETS: [SourceSet; 5] = [
    SourceSet::App,
    SourceSet::Shared,
    SourceSet::Vendor,
    SourceSet::Assets,
    SourceSet::Extra,
];

/// States of one (application, variant) run
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Idle,
    Cleaning,
    Copying,
    Concatenating,
    Minifying,
    Fingerprinting,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::Cleaning => "cleaning",
            Stage::Copying => "copying",
            Stage::Concatenating => "concatenating",
            Stage::Minifying => "minifying",
            Stage::Fingerprinting => "fingerprinting",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// External collaborators driven by a pipeline
#[derive(Clone)]
pub struct Collaborators {
    pub templates: Arc<dyn TemplateCompiler>,
    pub scripts: Arc<dyn ScriptMinifier>,
    pub styles: Arc<dyn StyleMinifier>,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            templates: Arc::new(TemplateCacheCompiler::new()),
            scripts: Arc::new(JsMinifier),
            styles: Arc::new(CssMinifier),
        }
    }
}

impl fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}

/// What a successful run produced
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub app: String,
    pub variant: Variant,
    pub output_dir: PathBuf,
    /// Written paths relative to `output_dir`, sorted
    pub files: Vec<String>,
    /// Empty for copy variants
    pub manifest: FingerprintManifest,
    /// Stages passed through, in order
    pub stages: Vec<Stage>,
}

/// Builds one (application, variant) pair
#[derive(Debug, Clone)]
pub struct Pipeline {
    layout: Arc<ProjectLayout>,
    collaborators: Collaborators,
}

struct Assembled {
    files: Vec<OutputFile>,
    manifest: FingerprintManifest,
    stages: Vec<Stage>,
}

impl Pipeline {
    pub fn new(layout: Arc<ProjectLayout>, collaborators: Collaborators) -> Self {
        Self {
            layout,
            collaborators,
        }
    }

    pub fn layout(&self) -> &ProjectLayout {
        &self.layout
    }

    /// Build `app` for `variant`. `dest` redirects bundled variants.
    ///
    /// Errors are attributed to the pair.
    pub async fn run(
        &self,
        app: &str,
        variant: Variant,
        dest: Option<&Path>,
    ) -> BuildResult<PipelineOutput> {
        let output_dir = self.layout.pair_output(app, variant, dest);
        tracing::info!(app, variant = %variant, output = %output_dir.display(), "pipeline started");

        let result = self.build(app, variant, &output_dir).await;
        match result {
            Ok(output) => {
                tracing::info!(app, variant = %variant, files = output.files.len(), "pipeline done");
                Ok(output)
            }
            Err(e) => {
                tracing::warn!(app, variant = %variant, error = %e, "pipeline failed");
                Err(e.in_pair(app, variant))
            }
        }
    }

    async fn build(
        &self,
        app: &str,
        variant: Variant,
        output_dir: &Path,
    ) -> BuildResult<PipelineOutput> {
        let Assembled {
            files,
            manifest,
            mut stages,
        } = self.assemble(app, variant).await?;

        let mut written: Vec<String> = files.iter().map(|f| f.path.clone()).collect();
        written.sort();

        write_staged(output_dir, files).await?;
        stages.push(Stage::Done);

        Ok(PipelineOutput {
            app: app.to_string(),
            variant,
            output_dir: output_dir.to_path_buf(),
            files: written,
            manifest,
            stages,
        })
    }

    /// Produce the pair's output in memory
    async fn assemble(&self, app: &str, variant: Variant) -> BuildResult<Assembled> {
        let inputs = resolver::resolve_inputs(&self.layout, app)?;
        let page = inputs.index_name();
        let raw = resolver::read_index_page(&inputs).await?;
        let policy = variant.policy();
        let html = selector::select(&page, &raw, policy.index_target)?;

        if variant.is_copy() {
            tracing::debug!(app, variant = %variant, stage = %Stage::Copying);
            let files = resolver::collect(&inputs, &COPY_SETS).await?;
            return Ok(Assembled {
                files: copy::copy_outputs(html, &files),
                manifest: FingerprintManifest::new(),
                stages: vec![Stage::Copying],
            });
        }

        let mut stages = vec![Stage::Concatenating];
        tracing::debug!(app, variant = %variant, stage = %Stage::Concatenating);
        let files = resolver::collect(&inputs, &BUNDLE_SETS).await?;
        let index = parse_build_blocks(&page, &html)?;

        let main_script = self.layout.main_script();
        if index.bundle(main_script).is_none() {
            return Err(BuildError::InvalidIndexPage {
                page: page.clone(),
                message: format!("no '{main_script}' script bundle to receive templates"),
            });
        }

        let templates = self.compile_templates(app, &files).await?;

        let mut assets: Vec<AssetItem> = Vec::with_capacity(index.bundles.len());
        for bundle in &index.bundles {
            let mut item = concatenate(&page, bundle, &files).await?;
            if bundle.name == main_script {
                append_templates(&mut item, &templates);
            }
            apply_rewrites(&mut item, self.layout.rewrites());
            assets.push(item);
        }

        if policy.minify {
            stages.push(Stage::Minifying);
            tracing::debug!(app, variant = %variant, stage = %Stage::Minifying);
            for item in &mut assets {
                self.minify(item)?;
            }
        }

        for (relative, file) in files.from_sets(&[SourceSet::Extra]) {
            let content = tokio::fs::read(&file.path)
                .await
                .map_err(|e| BuildError::io_at(&file.path, e))?;
            assets.push(AssetItem::new(relative, content));
        }

        stages.push(Stage::Fingerprinting);
        tracing::debug!(app, variant = %variant, stage = %Stage::Fingerprinting, assets = assets.len());
        let result = fingerprint(&index.html, assets)?;

        let mut files = Vec::with_capacity(result.assets.len() + 1);
        files.push(OutputFile::bytes(INDEX_PAGE, result.index_html));
        files.extend(
            result
                .assets
                .into_iter()
                .map(|item| OutputFile::bytes(item.path, item.content)),
        );

        Ok(Assembled {
            files,
            manifest: result.manifest,
            stages,
        })
    }

    /// Markup and vector templates of the application and of `shared/`
    async fn compile_templates(&self, app: &str, files: &resolver::FileSet) -> BuildResult<String> {
        let spec = self.layout.app(app)?;
        let mut templates = Vec::new();
        for (relative, file) in files.from_sets(&[SourceSet::App, SourceSet::Shared]) {
            if !AssetKind::from_path(relative).is_template() {
                continue;
            }
            let content = tokio::fs::read(&file.path)
                .await
                .map_err(|e| BuildError::io_at(&file.path, e))?;
            templates.push(AssetItem::new(relative, content));
        }
        tracing::debug!(app, templates = templates.len(), "compiling templates");
        self.collaborators.templates.compile(&spec.namespace, &templates)
    }

    fn minify(&self, item: &mut AssetItem) -> BuildResult<()> {
        let not_text = || BuildError::Minify {
            path: item.path.clone(),
            message: "bundle is not valid UTF-8".to_string(),
        };
        let minified = match item.kind {
            AssetKind::Script => {
                let text = item.text().ok_or_else(not_text)?;
                self.collaborators.scripts.minify(&item.path, text)?
            }
            AssetKind::Style => {
                let text = item.text().ok_or_else(not_text)?;
                self.collaborators.styles.minify(&item.path, text)?
            }
            _ => return Ok(()),
        };
        item.set_text(minified);
        Ok(())
    }
}

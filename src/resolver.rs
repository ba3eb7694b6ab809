//! Path resolver
//!
//! Turns the project layout into input glob sets for one application and
//! expands them into a [`FileSet`] keyed by output-relative path.

use std::collections::BTreeMap;
use std::path::PathBuf;

use ignore::overrides::OverrideBuilder;
use ignore::WalkBuilder;

use crate::config::ProjectLayout;
use crate::domain::to_asset_path;
use crate::error::{BuildError, BuildResult};

/// Which convention folder a file came from. Declaration order is the
/// precedence order: later wins when two sets yield the same relative path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SourceSet {
    Vendor,
    Extra,
    Assets,
    Shared,
    App,
}

/// One glob set: patterns relative to `base`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputGlobs {
    pub set: SourceSet,
    pub base: PathBuf,
    pub patterns: Vec<String>,
}

/// Everything a pipeline may read for one application
#[derive(Debug, Clone)]
pub struct ResolvedInputs {
    pub app: String,
    /// `src/<app>.html`
    pub index_page: PathBuf,
    pub globs: Vec<InputGlobs>,
}

impl ResolvedInputs {
    /// Name of the index page relative to the source root, for messages
    pub fn index_name(&self) -> String {
        self.index_page
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("{}.html", self.app))
    }
}

/// Compute the input globs of `app`. Fails if the application is not declared.
pub fn resolve_inputs(layout: &ProjectLayout, app: &str) -> BuildResult<ResolvedInputs> {
    let spec = layout.app(app)?;
    let src = layout.src();
    let folder = |set: SourceSet, name: &str| InputGlobs {
        set,
        base: src.to_path_buf(),
        patterns: vec![format!("/{name}/**")],
    };

    let mut globs = vec![
        folder(SourceSet::App, &spec.name),
        folder(SourceSet::Shared, layout.shared()),
        folder(SourceSet::Vendor, layout.vendor()),
        folder(SourceSet::Assets, layout.assets()),
    ];
    globs.extend(layout.extra_assets().iter().map(|extra| InputGlobs {
        set: SourceSet::Extra,
        base: extra.base.clone(),
        patterns: extra.patterns.clone(),
    }));

    Ok(ResolvedInputs {
        app: spec.name.clone(),
        index_page: src.join(format!("{}.html", spec.name)),
        globs,
    })
}

/// A resolved source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub set: SourceSet,
}

/// Source files keyed by their `/`-separated path relative to the set base
#[derive(Debug, Clone, Default)]
pub struct FileSet {
    files: BTreeMap<String, SourceFile>,
}

impl FileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a file, keeping the more specific source on conflicts
    pub fn insert(&mut self, relative: String, file: SourceFile) {
        match self.files.get(&relative) {
            Some(existing) if existing.set > file.set => {}
            _ => {
                self.files.insert(relative, file);
            }
        }
    }

    pub fn get(&self, relative: &str) -> Option<&SourceFile> {
        self.files.get(relative)
    }

    pub fn contains(&self, relative: &str) -> bool {
        self.files.contains_key(relative)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Files in relative-path order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SourceFile)> {
        self.files.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Files coming from one of `sets`
    pub fn from_sets<'a>(
        &'a self,
        sets: &'a [SourceSet],
    ) -> impl Iterator<Item = (&'a str, &'a SourceFile)> + 'a {
        self.iter().filter(move |(_, f)| sets.contains(&f.set))
    }
}

/// Expand the glob sets of `inputs`, restricted to `sets`.
///
/// The tree walk runs on the blocking pool.
pub async fn collect(inputs: &ResolvedInputs, sets: &[SourceSet]) -> BuildResult<FileSet> {
    let globs: Vec<InputGlobs> = inputs
        .globs
        .iter()
        .filter(|g| sets.contains(&g.set))
        .cloned()
        .collect();

    tokio::task::spawn_blocking(move || {
        let mut files = FileSet::new();
        for glob in &globs {
            for (relative, path) in walk_globs(glob)? {
                files.insert(
                    relative,
                    SourceFile {
                        path,
                        set: glob.set,
                    },
                );
            }
        }
        Ok(files)
    })
    .await
    .map_err(|e| BuildError::Io(std::io::Error::other(e.to_string())))?
}

/// Walk `glob.base` and return files matching any pattern
pub fn walk_globs(glob: &InputGlobs) -> BuildResult<Vec<(String, PathBuf)>> {
    if !glob.base.is_dir() {
        return Ok(Vec::new());
    }

    let mut builder = OverrideBuilder::new(&glob.base);
    for pattern in &glob.patterns {
        builder.add(pattern).map_err(|e| BuildError::InvalidConfig {
            file: glob.base.clone(),
            message: format!("invalid glob '{}': {}", pattern, e),
        })?;
    }
    let matcher = builder.build().map_err(|e| BuildError::InvalidConfig {
        file: glob.base.clone(),
        message: e.to_string(),
    })?;

    let walker = WalkBuilder::new(&glob.base)
        .standard_filters(false)
        .follow_links(true)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    let mut found = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| BuildError::Walk {
            path: glob.base.clone(),
            message: e.to_string(),
        })?;
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let path = entry.path();
        if !matcher.matched(path, false).is_whitelist() {
            continue;
        }
        if let Ok(relative) = path.strip_prefix(&glob.base) {
            found.push((to_asset_path(relative), path.to_path_buf()));
        }
    }
    Ok(found)
}

/// Read the index page of an application
pub async fn read_index_page(inputs: &ResolvedInputs) -> BuildResult<String> {
    match tokio::fs::read_to_string(&inputs.index_page).await {
        Ok(html) => Ok(html),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(BuildError::MissingIndexPage {
            path: inputs.index_page.clone(),
        }),
        Err(e) => Err(BuildError::io_at(&inputs.index_page, e)),
    }
}

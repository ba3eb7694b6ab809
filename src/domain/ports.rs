//! Ports for the external collaborators a pipeline drives
//!
//! Implementations:
//! - `infrastructure::templates::TemplateCacheCompiler`
//! - `infrastructure::minify::{JsMinifier, CssMinifier}`

use crate::error::BuildResult;

use super::asset::AssetItem;
use super::namespace::Namespace;

/// Turns markup templates and inline vector assets into one loadable script.
///
/// Same input set must give byte-identical output.
pub trait TemplateCompiler: Send + Sync {
    fn compile(&self, namespace: &Namespace, templates: &[AssetItem]) -> BuildResult<String>;
}

/// Compresses a script bundle. `path` is only used in error messages.
pub trait ScriptMinifier: Send + Sync {
    fn minify(&self, path: &str, source: &str) -> BuildResult<String>;
}

/// Compresses a style bundle without changing its meaning.
pub trait StyleMinifier: Send + Sync {
    fn minify(&self, path: &str, source: &str) -> BuildResult<String>;
}

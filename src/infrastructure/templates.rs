//! AngularJS `$templateCache` template compiler
//!
//! Every template becomes a self-registering module block:
//!
//! ```js
//! (function(module) {
//! try {
//!   module = angular.module('a');
//! } catch (e) {
//!   module = angular.module('a', []);
//! }
//! module.run(['$templateCache', function($templateCache) {
//!   $templateCache.put('shared/panel.html',
//!     '<div>panel</div>');
//! }]);
//! })();
//! ```

use crate::domain::{AssetItem, Namespace, TemplateCompiler};
use crate::error::{BuildError, BuildResult};

#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateCacheCompiler;

impl TemplateCacheCompiler {
    pub fn new() -> Self {
        Self
    }
}

impl TemplateCompiler for TemplateCacheCompiler {
    fn compile(&self, namespace: &Namespace, templates: &[AssetItem]) -> BuildResult<String> {
        let mut sorted: Vec<&AssetItem> = templates.iter().collect();
        sorted.sort_by(|a, b| a.path.cmp(&b.path));

        let mut out = String::new();
        for template in sorted {
            if !template.kind.is_template() {
                return Err(BuildError::Template {
                    path: template.path.clone(),
                    message: "not a markup or vector asset".to_string(),
                });
            }
            let text = template.text().ok_or_else(|| BuildError::Template {
                path: template.path.clone(),
                message: "template is not valid UTF-8".to_string(),
            })?;
            out.push_str(&register_block(namespace, &template.path, text));
        }
        Ok(out)
    }
}

fn register_block(namespace: &Namespace, path: &str, content: &str) -> String {
    let body = escape_js(content).split('\n').collect::<Vec<_>>().join("\\n' +\n    '");
    format!(
        "(function(module) {{\n\
         try {{\n  module = angular.module('{ns}');\n\
         }} catch (e) {{\n  module = angular.module('{ns}', []);\n\
         }}\n\
         module.run(['$templateCache', function($templateCache) {{\n\
         \x20 $templateCache.put('{path}',\n\
         \x20   '{body}');\n\
         }}]);\n\
         }})();\n",
        ns = namespace,
        path = escape_js(path),
        body = body,
    )
}

/// Escape text for a single-quoted script string. Newlines are kept so the
/// caller can split on them.
fn escape_js(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\r' => out.push_str("\\r"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            other => out.push(other),
        }
    }
    out
}

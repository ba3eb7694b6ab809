//! Infrastructure Layer
//!
//! Default implementations of the collaborator ports in `domain::ports`.
//!
//! ## Structure
//!
//! - `templates` - AngularJS `$templateCache` template compiler
//! - `minify` - script and style minifiers

pub mod minify;
pub mod templates;

pub use minify::{CssMinifier, JsMinifier};
pub use templates::TemplateCacheCompiler;

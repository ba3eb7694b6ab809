//! Asset stream items - virtual files flowing through a pipeline

use std::path::Path;

/// Kind tag of an asset, derived from its extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Script,
    Style,
    MarkupTemplate,
    VectorAsset,
    Other,
}

impl AssetKind {
    pub fn from_path(path: &str) -> Self {
        let ext = Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("js") => AssetKind::Script,
            Some("css") => AssetKind::Style,
            Some("html") | Some("htm") => AssetKind::MarkupTemplate,
            Some("svg") => AssetKind::VectorAsset,
            _ => AssetKind::Other,
        }
    }

    /// Compiled into the template artifact
    pub fn is_template(self) -> bool {
        matches!(self, AssetKind::MarkupTemplate | AssetKind::VectorAsset)
    }

    /// Text assets whose references are patched after fingerprinting
    pub fn is_rewritable(self) -> bool {
        matches!(
            self,
            AssetKind::Script | AssetKind::Style | AssetKind::MarkupTemplate
        )
    }
}

/// A virtual file: relative path (always `/`-separated), payload and kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetItem {
    pub path: String,
    pub content: Vec<u8>,
    pub kind: AssetKind,
}

impl AssetItem {
    pub fn new(path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        let path = path.into();
        let kind = AssetKind::from_path(&path);
        Self {
            path,
            content: content.into(),
            kind,
        }
    }

    /// Content as UTF-8, if it is valid text
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.content).ok()
    }

    /// Replace the content with new text
    pub fn set_text(&mut self, text: String) {
        self.content = text.into_bytes();
    }
}

/// Convert a platform path into the `/`-separated form used by assets.
pub fn to_asset_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            std::path::Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

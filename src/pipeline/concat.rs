//! Asset concatenation
//!
//! Reads the build blocks of a resolved index page:
//!
//! ```html
//! <!-- build:js app.js -->
//! <script src="vendor/angular/angular.js"></script>
//! <script src="alpha/app.js"></script>
//! <!-- endbuild -->
//! ```
//!
//! Each block becomes one bundle made of the referenced files in declared
//! order, and the block is replaced in the page by a single tag loading it.

use std::collections::HashSet;

use crate::config::RewriteRule;
use crate::domain::{AssetItem, AssetKind};
use crate::error::{BuildError, BuildResult};
use crate::resolver::FileSet;

const COMMENT_OPEN: &str = "<!--";
const COMMENT_CLOSE: &str = "-->";
const BUILD_PREFIX: &str = "build:";
const END_BUILD: &str = "endbuild";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BundleKind {
    Script,
    Style,
}

impl BundleKind {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "js" => Some(BundleKind::Script),
            "css" => Some(BundleKind::Style),
            _ => None,
        }
    }

    fn tag(self, name: &str) -> String {
        match self {
            BundleKind::Script => format!("<script src=\"{name}\"></script>"),
            BundleKind::Style => format!("<link rel=\"stylesheet\" href=\"{name}\">"),
        }
    }
}

/// One build block: output name plus sources in declared order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleDecl {
    pub kind: BundleKind,
    pub name: String,
    pub sources: Vec<String>,
}

/// An index page with its build blocks replaced by bundle tags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexPage {
    pub html: String,
    pub bundles: Vec<BundleDecl>,
}

impl IndexPage {
    pub fn bundle(&self, name: &str) -> Option<&BundleDecl> {
        self.bundles.iter().find(|b| b.name == name)
    }
}

/// Extract build blocks from `html`. `page` names the page in errors.
pub fn parse_build_blocks(page: &str, html: &str) -> BuildResult<IndexPage> {
    let malformed = |message: String| BuildError::InvalidIndexPage {
        page: page.to_string(),
        message,
    };

    let mut out = String::with_capacity(html.len());
    let mut bundles: Vec<BundleDecl> = Vec::new();
    let mut names = HashSet::new();
    let mut rest = html;

    while let Some((start, end, comment)) = next_comment(rest) {
        if comment == END_BUILD {
            return Err(malformed("'endbuild' without a matching build block".to_string()));
        }
        let Some(directive) = comment.strip_prefix(BUILD_PREFIX) else {
            out.push_str(&rest[..end]);
            rest = &rest[end..];
            continue;
        };

        let mut parts = directive.split_whitespace();
        let kind_raw = parts.next().unwrap_or_default();
        let kind = BundleKind::parse(kind_raw)
            .ok_or_else(|| malformed(format!("unknown build block type '{kind_raw}'")))?;
        let name = parts
            .next()
            .map(normalize_reference)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| malformed(format!("build:{kind_raw} block without an output name")))?;
        if !names.insert(name.clone()) {
            return Err(malformed(format!("bundle '{name}' declared twice")));
        }

        let body_and_rest = &rest[end..];
        let (body, after) = block_body(body_and_rest)
            .ok_or_else(|| malformed(format!("build block '{name}' is never closed")))?;
        if comments(body).any(|inner| inner.starts_with(BUILD_PREFIX)) {
            return Err(malformed(format!("build block nested inside '{name}'")));
        }

        let sources = match kind {
            BundleKind::Script => attribute_values(body, "script", "src"),
            BundleKind::Style => attribute_values(body, "link", "href"),
        }
        .into_iter()
        .map(|s| normalize_reference(&s))
        .collect();

        out.push_str(&rest[..start]);
        out.push_str(&kind.tag(&name));
        bundles.push(BundleDecl {
            kind,
            name,
            sources,
        });
        rest = after;
    }
    out.push_str(rest);

    Ok(IndexPage { html: out, bundles })
}

/// Find the next HTML comment: (start, end, trimmed inner text)
fn next_comment(text: &str) -> Option<(usize, usize, &str)> {
    let start = text.find(COMMENT_OPEN)?;
    let inner_start = start + COMMENT_OPEN.len();
    let inner_len = text[inner_start..].find(COMMENT_CLOSE)?;
    let end = inner_start + inner_len + COMMENT_CLOSE.len();
    Some((start, end, text[inner_start..inner_start + inner_len].trim()))
}

fn comments(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = text;
    std::iter::from_fn(move || {
        let (_, end, inner) = next_comment(rest)?;
        rest = &rest[end..];
        Some(inner)
    })
}

/// Split at the closing `endbuild` comment: (body, text after the comment)
fn block_body(text: &str) -> Option<(&str, &str)> {
    let mut offset = 0;
    while let Some((start, end, comment)) = next_comment(&text[offset..]) {
        if comment == END_BUILD {
            return Some((&text[..offset + start], &text[offset + end..]));
        }
        offset += end;
    }
    None
}

/// Values of `attr` on every `<tag ...>` in declaration order
fn attribute_values(body: &str, tag: &str, attr: &str) -> Vec<String> {
    let open = format!("<{tag}");
    let mut values = Vec::new();
    let mut rest = body;
    while let Some(start) = rest.find(&open) {
        let tag_text = &rest[start..];
        let tag_end = tag_text.find('>').unwrap_or(tag_text.len());
        if let Some(value) = find_attribute(&tag_text[..tag_end], attr) {
            values.push(value.to_string());
        }
        rest = &tag_text[tag_end..];
    }
    values
}

fn find_attribute<'a>(tag: &'a str, attr: &str) -> Option<&'a str> {
    let needle = format!("{attr}=");
    let mut search = tag;
    loop {
        let idx = search.find(&needle)?;
        let preceded_by_space = search[..idx]
            .chars()
            .next_back()
            .is_some_and(char::is_whitespace);
        let value = &search[idx + needle.len()..];
        if preceded_by_space {
            return match value.chars().next() {
                Some(q @ ('"' | '\'')) => value[1..].find(q).map(|end| &value[1..1 + end]),
                _ => value.split(|c: char| c.is_whitespace() || c == '>').next(),
            };
        }
        search = value;
    }
}

/// `./alpha/app.js` and `/alpha/app.js` both name `alpha/app.js`
fn normalize_reference(raw: &str) -> String {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix("./").unwrap_or(trimmed);
    trimmed.trim_start_matches('/').to_string()
}

/// Concatenate the sources of one bundle in declared order.
pub async fn concatenate(page: &str, bundle: &BundleDecl, files: &FileSet) -> BuildResult<AssetItem> {
    let mut parts: Vec<Vec<u8>> = Vec::with_capacity(bundle.sources.len());
    for source in &bundle.sources {
        let file = files.get(source).ok_or_else(|| BuildError::MissingReference {
            path: source.clone(),
            page: page.to_string(),
        })?;
        let content = tokio::fs::read(&file.path)
            .await
            .map_err(|e| BuildError::io_at(&file.path, e))?;
        parts.push(content);
    }
    Ok(AssetItem::new(bundle.name.clone(), parts.join(&b'\n')))
}

/// Append compiled templates to the main script bundle.
pub fn append_templates(main: &mut AssetItem, templates: &str) {
    if templates.is_empty() {
        return;
    }
    if !main.content.is_empty() && !main.content.ends_with(b"\n") {
        main.content.push(b'\n');
    }
    main.content.extend_from_slice(templates.as_bytes());
}

/// Apply path rewrite rules to script and style bundles.
pub fn apply_rewrites(item: &mut AssetItem, rules: &[RewriteRule]) {
    if rules.is_empty() || !matches!(item.kind, AssetKind::Script | AssetKind::Style) {
        return;
    }
    let Some(text) = item.text() else {
        return;
    };
    let mut rewritten = text.to_string();
    for rule in rules {
        rewritten = rewritten.replace(&rule.from, &rule.to);
    }
    item.set_text(rewritten);
}

//! Fingerprint manifest - original asset path to fingerprinted path
//!
//! Built while fingerprinting one build and consumed immediately by the
//! reference rewriter. Never persisted.

use std::collections::BTreeMap;

use super::hash::ContentHash;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FingerprintManifest {
    entries: BTreeMap<String, String>,
}

impl FingerprintManifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, original: impl Into<String>, fingerprinted: impl Into<String>) {
        self.entries.insert(original.into(), fingerprinted.into());
    }

    pub fn get(&self, original: &str) -> Option<&str> {
        self.entries.get(original).map(String::as_str)
    }

    pub fn contains(&self, original: &str) -> bool {
        self.entries.contains_key(original)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Original names, longest first, so that a name is always tried
    /// before any shorter name it contains.
    pub fn originals_longest_first(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        names
    }
}

/// Embed a content hash in a relative path: `fonts/x.woff` → `fonts/x-<hash>.woff`.
pub fn fingerprinted_name(path: &str, hash: &ContentHash) -> String {
    let (dir, file) = match path.rfind('/') {
        Some(idx) => (&path[..=idx], &path[idx + 1..]),
        None => ("", path),
    };
    match file.rfind('.') {
        Some(dot) if dot > 0 => format!(
            "{dir}{}-{}{}",
            &file[..dot],
            hash.short(),
            &file[dot..]
        ),
        _ => format!("{dir}{file}-{}", hash.short()),
    }
}

//! Fingerprinting and reference rewriting
//!
//! Every asset except the index page is renamed to `stem-<hash>.ext`, where
//! the hash covers the asset's final bytes. An asset that refers to other
//! assets is hashed only after those references are patched, so a change in
//! a font also changes the name of the stylesheet using it. Assets that
//! refer to each other in a cycle, or to themselves, are hashed before
//! their last patch.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::{fingerprinted_name, AssetItem, ContentHash, FingerprintManifest};
use crate::error::{BuildError, BuildResult};

/// Output name that is never fingerprinted
pub const INDEX_PAGE: &str = "index.html";

#[derive(Debug, Clone)]
pub struct Fingerprinted {
    pub index_html: String,
    /// Assets under their fingerprinted paths, sorted by path
    pub assets: Vec<AssetItem>,
    pub manifest: FingerprintManifest,
}

/// Fingerprint `assets` and patch every reference to them.
pub fn fingerprint(index_html: &str, assets: Vec<AssetItem>) -> BuildResult<Fingerprinted> {
    let mut remaining: BTreeMap<String, AssetItem> = BTreeMap::new();
    for item in assets {
        match remaining.get(&item.path) {
            Some(existing) if existing.content != item.content => {
                let hash = ContentHash::from_bytes(&item.content);
                return Err(BuildError::FingerprintCollision {
                    name: fingerprinted_name(&item.path, &hash),
                    first: existing.path.clone(),
                    second: item.path,
                });
            }
            Some(_) => {}
            None => {
                remaining.insert(item.path.clone(), item);
            }
        }
    }
    let names: Vec<String> = remaining.keys().cloned().collect();
    // Self-references can only be patched after hashing.
    let mut repatch: BTreeSet<String> = BTreeSet::new();
    let mut deps: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for item in remaining.values() {
        let mut refs = rewritable_text(item)
            .map(|text| find_references(text, &names))
            .unwrap_or_default();
        if refs.remove(&item.path) {
            repatch.insert(item.path.clone());
        }
        deps.insert(item.path.clone(), refs);
    }

    let mut manifest = FingerprintManifest::new();
    let mut owners: BTreeMap<String, (String, ContentHash)> = BTreeMap::new();
    let mut done: Vec<AssetItem> = Vec::with_capacity(remaining.len());

    while !remaining.is_empty() {
        let ready: Vec<String> = remaining
            .keys()
            .filter(|path| {
                deps.get(*path)
                    .is_none_or(|d| d.iter().all(|dep| manifest.contains(dep)))
            })
            .cloned()
            .collect();

        let batch = if ready.is_empty() {
            // Cycle: hash the first blocked asset with what is known so far.
            let first = remaining.keys().next().cloned().into_iter().collect::<Vec<_>>();
            repatch.extend(first.iter().cloned());
            first
        } else {
            ready
        };

        for path in batch {
            let Some(mut item) = remaining.remove(&path) else {
                continue;
            };
            patch(&mut item, &manifest);
            let hash = ContentHash::from_bytes(&item.content);
            let renamed = fingerprinted_name(&item.path, &hash);

            if renamed == INDEX_PAGE {
                return Err(BuildError::FingerprintCollision {
                    name: renamed,
                    first: INDEX_PAGE.to_string(),
                    second: item.path,
                });
            }
            if let Some((owner, owner_hash)) = owners.get(&renamed) {
                if *owner_hash != hash {
                    return Err(BuildError::FingerprintCollision {
                        name: renamed,
                        first: owner.clone(),
                        second: item.path,
                    });
                }
            } else {
                owners.insert(renamed.clone(), (item.path.clone(), hash));
            }

            manifest.insert(item.path.clone(), renamed);
            done.push(item);
        }
    }

    for item in done.iter_mut().filter(|item| repatch.contains(&item.path)) {
        patch(item, &manifest);
    }

    let mut assets: BTreeMap<String, AssetItem> = BTreeMap::new();
    for mut item in done {
        if let Some(renamed) = manifest.get(&item.path) {
            item.path = renamed.to_string();
        }
        assets.entry(item.path.clone()).or_insert(item);
    }

    Ok(Fingerprinted {
        index_html: rewrite_references(index_html, &manifest),
        assets: assets.into_values().collect(),
        manifest,
    })
}

fn rewritable_text(item: &AssetItem) -> Option<&str> {
    if item.kind.is_rewritable() {
        item.text()
    } else {
        None
    }
}

fn patch(item: &mut AssetItem, manifest: &FingerprintManifest) {
    if let Some(text) = rewritable_text(item) {
        let patched = rewrite_references(text, manifest);
        if patched != text {
            item.set_text(patched);
        }
    }
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | '/')
}

/// A reference may start after a delimiter, optionally behind `./` or `/`.
fn starts_at_boundary(text: &str, start: usize) -> bool {
    let before = &text[..start];
    let before = before
        .strip_suffix("./")
        .or_else(|| before.strip_suffix('/'))
        .unwrap_or(before);
    before.chars().next_back().is_none_or(|c| !is_name_char(c))
}

fn ends_at_boundary(text: &str, end: usize) -> bool {
    text[end..].chars().next().is_none_or(|c| !is_name_char(c))
}

/// Walk `text` and call `on_match` for every whole-name occurrence of one
/// of `names` (tried longest first). Returns text with matches replaced by
/// whatever `on_match` yields.
fn scan<'n>(
    text: &str,
    names: &[&'n str],
    mut on_match: impl FnMut(&'n str) -> Option<String>,
) -> String {
    let mut out = String::with_capacity(text.len());
    let mut iter = text.char_indices();
    while let Some((i, c)) = iter.next() {
        let matched = if starts_at_boundary(text, i) {
            names.iter().copied().find(|name| {
                !name.is_empty()
                    && text[i..].starts_with(name)
                    && ends_at_boundary(text, i + name.len())
            })
        } else {
            None
        };
        match matched {
            Some(name) => {
                match on_match(name) {
                    Some(replacement) => out.push_str(&replacement),
                    None => out.push_str(name),
                }
                let skip = text[i..i + name.len()].chars().count() - 1;
                for _ in 0..skip {
                    iter.next();
                }
            }
            None => out.push(c),
        }
    }
    out
}

fn longest_first(names: &[String]) -> Vec<&str> {
    let mut sorted: Vec<&str> = names.iter().map(String::as_str).collect();
    sorted.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    sorted
}

/// Asset names referenced by `text`
pub fn find_references(text: &str, names: &[String]) -> BTreeSet<String> {
    let ordered = longest_first(names);
    let mut found = BTreeSet::new();
    scan(text, &ordered, |name| {
        found.insert(name.to_string());
        None
    });
    found
}

/// Replace every whole-name reference to a manifest entry
pub fn rewrite_references(text: &str, manifest: &FingerprintManifest) -> String {
    if manifest.is_empty() {
        return text.to_string();
    }
    let ordered = manifest.originals_longest_first();
    scan(text, &ordered, |name| manifest.get(name).map(str::to_string))
}

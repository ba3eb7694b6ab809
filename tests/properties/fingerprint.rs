//! Property tests for fingerprinting and reference rewriting.

use std::collections::BTreeMap;

use proptest::prelude::*;

use assetry::domain::{AssetItem, FingerprintManifest};
use assetry::pipeline::fingerprint::{find_references, fingerprint, rewrite_references};

fn asset_name() -> impl Strategy<Value = String> {
    ("[a-z]{1,6}", prop_oneof![Just("js"), Just("css")]).prop_map(|(stem, ext)| format!("{stem}.{ext}"))
}

/// Assets whose bodies mention random subsets of each other
fn asset_graph() -> impl Strategy<Value = Vec<(String, String)>> {
    proptest::collection::btree_set(asset_name(), 1..6).prop_flat_map(|names| {
        let names: Vec<String> = names.into_iter().collect();
        let count = names.len();
        proptest::collection::vec(
            (
                proptest::collection::vec(0..count, 0..4),
                "[a-z ;]{0,12}",
            ),
            count,
        )
        .prop_map(move |bodies| {
            names
                .iter()
                .zip(bodies)
                .map(|(name, (refs, filler))| {
                    let mentions: Vec<String> =
                        refs.iter().map(|i| format!("load('{}');", names[*i])).collect();
                    (name.clone(), format!("{filler}\n{}", mentions.join("\n")))
                })
                .collect()
        })
    })
}

fn index_for(graph: &[(String, String)]) -> String {
    graph
        .iter()
        .map(|(name, _)| format!("<script src=\"{name}\"></script>"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn items(graph: &[(String, String)]) -> Vec<AssetItem> {
    graph
        .iter()
        .map(|(name, body)| AssetItem::new(name.clone(), body.clone()))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 96,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: identical input always yields identical names and bytes.
    #[test]
    fn property_fingerprint_is_deterministic(graph in asset_graph()) {
        let index = index_for(&graph);
        let first = fingerprint(&index, items(&graph)).unwrap();
        let second = fingerprint(&index, items(&graph)).unwrap();

        prop_assert_eq!(&first.manifest, &second.manifest);
        prop_assert_eq!(&first.index_html, &second.index_html);
        let bytes = |r: &assetry::pipeline::fingerprint::Fingerprinted| -> BTreeMap<String, Vec<u8>> {
            r.assets.iter().map(|a| (a.path.clone(), a.content.clone())).collect()
        };
        prop_assert_eq!(bytes(&first), bytes(&second));
    }

    /// PROPERTY: no original name survives in the index page or any asset.
    #[test]
    fn property_no_dangling_references(graph in asset_graph()) {
        let originals: Vec<String> = graph.iter().map(|(n, _)| n.clone()).collect();
        let result = fingerprint(&index_for(&graph), items(&graph)).unwrap();

        prop_assert!(find_references(&result.index_html, &originals).is_empty());
        for asset in &result.assets {
            let text = asset.text().unwrap();
            prop_assert!(
                find_references(text, &originals).is_empty(),
                "{} still names an original: {}", asset.path, text
            );
        }
        prop_assert_eq!(result.manifest.len(), originals.len());
    }

    /// PROPERTY: every manifest entry is `stem-<10 hex>.ext` of its original.
    #[test]
    fn property_names_embed_short_hash(graph in asset_graph()) {
        let result = fingerprint("", items(&graph)).unwrap();
        for (original, renamed) in result.manifest.iter() {
            let (stem, ext) = original.rsplit_once('.').unwrap();
            let hash = renamed
                .strip_prefix(&format!("{stem}-"))
                .and_then(|r| r.strip_suffix(&format!(".{ext}")))
                .unwrap();
            prop_assert_eq!(hash.len(), 10);
            prop_assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
        }
    }

    /// PROPERTY: rewriting never panics on arbitrary text.
    #[test]
    fn property_rewrite_never_panics(text in "(?s).{0,256}") {
        let mut manifest = FingerprintManifest::new();
        manifest.insert("app.js", "app-0123456789.js");
        manifest.insert("é.css", "é-0123456789.css");
        let _ = rewrite_references(&text, &manifest);
    }

    /// PROPERTY: text without any asset name is left untouched.
    #[test]
    fn property_rewrite_is_identity_without_names(text in "[A-Z0-9 <>=\"'();\n]{0,128}") {
        let mut manifest = FingerprintManifest::new();
        manifest.insert("app.js", "app-0123456789.js");
        prop_assert_eq!(rewrite_references(&text, &manifest), text);
    }
}

//! Property tests for environment block selection.

use proptest::prelude::*;

use assetry::domain::TARGET_TAGS;
use assetry::selector::select;

fn tag_set() -> impl Strategy<Value = Vec<&'static str>> {
    proptest::sample::subsequence(TARGET_TAGS.to_vec(), 1..=TARGET_TAGS.len())
}

fn page(blocks: &[Vec<&str>]) -> String {
    let mut html = String::from("<html>\n");
    for (i, tags) in blocks.iter().enumerate() {
        html.push_str(&format!("<p>text{i}</p>\n"));
        html.push_str(&format!(
            "<!--(if target {})>\n<script src=\"body{i}.js\"></script>\n<!(endif)-->\n",
            tags.join(" || ")
        ));
    }
    html.push_str("</html>\n");
    html
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: a block survives exactly when it names the target.
    #[test]
    fn property_blocks_kept_iff_tagged(
        blocks in proptest::collection::vec(tag_set(), 0..6),
        target in proptest::sample::select(TARGET_TAGS.to_vec()),
    ) {
        let html = select("alpha.html", &page(&blocks), target).unwrap();

        for (i, tags) in blocks.iter().enumerate() {
            let text = format!("<p>text{i}</p>");
            let body = format!("body{i}.js");
            prop_assert!(html.contains(&text));
            prop_assert_eq!(html.contains(&body), tags.contains(&target));
        }
        prop_assert!(!html.contains("(if target"));
        prop_assert!(!html.contains("(endif)"));
    }

    /// PROPERTY: pages without blocks pass through unchanged.
    #[test]
    fn property_plain_pages_unchanged(
        body in "[a-zA-Z0-9 <>/=\"\n]{0,200}",
        target in proptest::sample::select(TARGET_TAGS.to_vec()),
    ) {
        prop_assert_eq!(select("beta.html", &body, target).unwrap(), body);
    }

    /// PROPERTY: selection never panics on arbitrary input.
    #[test]
    fn property_select_never_panics(html in "(?s).{0,256}") {
        for target in TARGET_TAGS {
            let _ = select("page.html", &html, target);
        }
    }

    /// PROPERTY: selecting twice is the same as selecting once.
    #[test]
    fn property_select_is_idempotent(
        blocks in proptest::collection::vec(tag_set(), 0..6),
        target in proptest::sample::select(TARGET_TAGS.to_vec()),
    ) {
        let once = select("alpha.html", &page(&blocks), target).unwrap();
        let twice = select("alpha.html", &once, target).unwrap();
        prop_assert_eq!(once, twice);
    }
}

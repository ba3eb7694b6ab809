//! Scenario: `url(../fonts/x.woff)` in a stylesheet ends up pointing at the
//! fingerprinted font next to the fingerprinted stylesheet.

use crate::common::TestEnv;

#[test]
fn font_paths_are_rewritten_and_fingerprinted() {
    let env = TestEnv::two_apps();

    let result = env.run(&["build", "concat", "alpha"]);
    assert!(result.is_success(), "{}", result.stderr);

    let font = env.fingerprinted("build/alpha", "fonts/x.woff");
    let css_name = env.fingerprinted("build/alpha", "main.css");
    let css = env.read(&format!("build/alpha/{css_name}"));

    assert_eq!(css.matches(&format!("url(./{font})")).count(), 2, "{css}");
    assert!(!css.contains("../fonts/"));
    assert!(!css.contains("fonts/x.woff"));

    let index = env.read("build/alpha/index.html");
    assert!(index.contains(&format!("href=\"{css_name}\"")), "{index}");
    assert!(!index.contains("bootstrap.css"));

    assert_eq!(
        std::fs::read(env.path(&format!("build/alpha/{font}"))).unwrap(),
        std::fs::read(env.path("src/vendor/bootstrap/dist/fonts/x.woff")).unwrap()
    );
}

//! Scenario: distribution builds are minified, fingerprinted, dangling-free
//! and reproducible.

use crate::common::TestEnv;

const ORIGINALS: [&str; 3] = ["app.js", "main.css", "fonts/x.woff"];

#[test]
fn dist_output_has_no_dangling_original_names() {
    let env = TestEnv::two_apps();

    let result = env.run(&["dist"]);
    assert!(result.is_success(), "{}", result.stderr);

    for app in ["alpha", "beta"] {
        let dir = format!("dist/{app}");
        let files = env.list(&dir);
        assert_eq!(files.len(), 4, "{files:?}");
        assert!(files.contains(&"index.html".to_string()));

        for file in files.iter().filter(|f| !f.ends_with(".woff")) {
            let text = env.read(&format!("{dir}/{file}"));
            for original in ORIGINALS {
                assert!(!text.contains(original), "{original} left in {dir}/{file}");
            }
        }
    }
}

#[test]
fn dist_bundles_are_minified() {
    let env = TestEnv::two_apps();

    let result = env.run(&["dist", "alpha"]);
    assert!(result.is_success(), "{}", result.stderr);

    let script = env.fingerprinted("dist/alpha", "app.js");
    let script = env.read(&format!("dist/alpha/{script}"));
    assert!(!script.contains("// alpha entry"));
    assert!(script.contains("$templateCache"));

    let style = env.fingerprinted("dist/alpha", "main.css");
    let style = env.read(&format!("dist/alpha/{style}"));
    assert!(!style.contains("/* app */"));
}

#[test]
fn repeated_dist_runs_yield_identical_names() {
    let env = TestEnv::two_apps();

    assert!(env.run(&["dist"]).is_success());
    let first = (env.list("dist/alpha"), env.list("dist/beta"));
    assert!(env.run(&["dist"]).is_success());
    let second = (env.list("dist/alpha"), env.list("dist/beta"));

    assert_eq!(first, second);
}

#[test]
fn changed_source_changes_only_dependent_names() {
    let env = TestEnv::two_apps();

    assert!(env.run(&["dist", "alpha"]).is_success());
    let css_before = env.fingerprinted("dist/alpha", "main.css");
    let js_before = env.fingerprinted("dist/alpha", "app.js");

    env.write("src/alpha/home.js", "angular.module('a').controller('Home', function () { return 1; });\n");
    assert!(env.run(&["dist", "alpha"]).is_success());

    assert_eq!(env.fingerprinted("dist/alpha", "main.css"), css_before);
    assert_ne!(env.fingerprinted("dist/alpha", "app.js"), js_before);
}

#[test]
fn dest_redirects_dist_output() {
    let env = TestEnv::two_apps();

    let result = env.run(&["dist", "beta", "--dest", "public"]);
    assert!(result.is_success(), "{}", result.stderr);

    assert!(env.path("public/beta/index.html").exists());
    assert!(!env.path("dist").exists());
}

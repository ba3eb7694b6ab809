//! Scenario: the dev, debug and e2e variants copy the source tree verbatim.

use crate::common::TestEnv;

#[test]
fn dev_copies_index_and_every_set_of_one_app() {
    let env = TestEnv::two_apps();

    let result = env.run(&["build", "dev"]);
    assert!(result.is_success(), "{}", result.stderr);

    assert_eq!(
        env.list("build-dev/alpha"),
        vec![
            "alpha/app.js",
            "alpha/home.js",
            "alpha/main.css",
            "alpha/views/home.html",
            "assets/logo.png",
            "index.html",
            "shared/fixtures.js",
            "shared/panel.html",
            "vendor/angular-mocks/angular-mocks.js",
            "vendor/angular/angular.js",
            "vendor/bootstrap/dist/css/bootstrap.css",
            "vendor/bootstrap/dist/fonts/x.woff",
        ]
    );
    assert_eq!(
        env.read("build-dev/alpha/alpha/main.css"),
        env.read("src/alpha/main.css")
    );
    assert!(!env.path("build-dev/alpha/beta").exists());
    assert!(!env.path("build").exists());
}

#[test]
fn index_keeps_only_the_blocks_of_the_variant() {
    let env = TestEnv::two_apps();

    let result = env.run(&["build"]);
    assert!(result.is_success(), "{}", result.stderr);

    let dev = env.read("build-dev/beta/index.html");
    assert!(dev.contains("shared/fixtures.js"));
    assert!(dev.contains("angular-mocks.js"));

    let e2e = env.read("build-e2e/beta/index.html");
    assert!(!e2e.contains("shared/fixtures.js"));
    assert!(e2e.contains("angular-mocks.js"));

    let debug = env.read("build-debug/beta/index.html");
    assert!(!debug.contains("shared/fixtures.js"));
    assert!(!debug.contains("angular-mocks.js"));

    for page in [dev, e2e, debug] {
        assert!(!page.contains("(if target"));
        assert!(!page.contains("(endif)"));
        // Build blocks are only resolved by the bundled variants.
        assert!(page.contains("<!-- build:js app.js -->"));
    }
}

//! Scenario: two applications share `shared/panel.html`; each script
//! bundle registers it under its own namespace only.

use crate::common::TestEnv;

fn bundle(env: &TestEnv, app: &str) -> String {
    let dir = format!("build/{app}");
    let name = env.fingerprinted(&dir, "app.js");
    env.read(&format!("{dir}/{name}"))
}

#[test]
fn each_bundle_registers_templates_in_its_own_namespace() {
    let env = TestEnv::two_apps();

    let result = env.run(&["build", "concat"]);
    assert!(result.is_success(), "{}", result.stderr);

    let alpha = bundle(&env, "alpha");
    assert!(alpha.contains("$templateCache.put('shared/panel.html'"));
    assert!(alpha.contains("$templateCache.put('alpha/views/home.html'"));
    assert!(alpha.contains("angular.module('a');"));
    assert!(!alpha.contains("angular.module('b'"));
    assert!(!alpha.contains("beta/views/home.html"));

    let beta = bundle(&env, "beta");
    assert!(beta.contains("$templateCache.put('shared/panel.html'"));
    assert!(beta.contains("angular.module('b');"));
    assert!(!beta.contains("angular.module('a'"));
}

#[test]
fn bundle_follows_declared_order_with_templates_last() {
    let env = TestEnv::two_apps();

    let result = env.run(&["build", "concat", "alpha"]);
    assert!(result.is_success(), "{}", result.stderr);

    let text = bundle(&env, "alpha");
    let position = |needle: &str| {
        text.find(needle)
            .unwrap_or_else(|| panic!("{needle:?} missing from bundle"))
    };
    let vendor = position("var angular");
    let entry = position("// alpha entry");
    let controller = position("controller('Home'");
    let templates = position("$templateCache");
    assert!(vendor < entry && entry < controller && controller < templates);
    assert!(text.rfind("// alpha entry").unwrap() < text.find("(function(module)").unwrap());

    // Mock scripts are stripped from bundled variants.
    assert!(!text.contains("var mocks"));
    assert!(!env.path("build/beta").exists());
}

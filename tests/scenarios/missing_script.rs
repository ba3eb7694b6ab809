//! Scenario: an index page declares a script that does not exist.

use crate::common::TestEnv;

#[test]
fn missing_declared_script_fails_only_that_app() {
    let env = TestEnv::two_apps();
    let page = env
        .read("src/alpha.html")
        .replace("alpha/home.js", "alpha/gone.js");
    env.write("src/alpha.html", page);

    let result = env.run(&["dist"]);

    assert!(!result.is_success());
    assert_eq!(result.exit_code, 1);
    assert!(result.stdout.contains("alpha [dist]"), "{}", result.stdout);
    assert!(result.stdout.contains("alpha/gone.js"), "{}", result.stdout);
    assert!(result.stderr.contains("1 of 2 tasks failed"), "{}", result.stderr);

    assert!(!env.path("dist/alpha").exists());
    assert!(env.path("dist/beta/index.html").exists());
}

#[test]
fn missing_script_is_reported_in_json() {
    let env = TestEnv::two_apps();
    let page = env
        .read("src/beta.html")
        .replace("beta/app.js", "beta/gone.js");
    env.write("src/beta.html", page);

    let result = env.run(&["build", "concat", "--json"]);
    assert!(!result.is_success());

    let events = result.events();
    let failed: Vec<_> = events
        .iter()
        .filter(|e| e["event"] == "task_complete" && e["stage"] == "failed")
        .collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0]["app"], "beta");
    assert_eq!(failed[0]["variant"], "concat");
    assert!(failed[0]["error"]
        .as_str()
        .unwrap()
        .contains("missing file 'beta/gone.js'"));

    let last = events.last().unwrap();
    assert_eq!(last["event"], "run_complete");
    assert_eq!(last["failed"], 1);
}

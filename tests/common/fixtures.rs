//! Reusable project content

/// Two applications, bootstrap fonts as an extra asset set
pub const CONFIG: &str = r#"[project]
src = "src"

[[apps]]
name = "alpha"
namespace = "a"

[[apps]]
name = "beta"
namespace = "b"

[[extra_assets]]
base = "vendor/bootstrap/dist"
patterns = ["fonts/*"]

[[rewrites]]
from = "../fonts/"
to = "./fonts/"
"#;

/// Index page of `app`: one style bundle, mock blocks, one script bundle
pub fn index_page(app: &str) -> String {
    format!(
        r#"<!doctype html>
<html>
<head>
<!-- build:css main.css -->
<link rel="stylesheet" href="vendor/bootstrap/dist/css/bootstrap.css">
<link rel="stylesheet" href="{app}/main.css">
<!-- endbuild -->
</head>
<body ng-app="{app}">
<!--(if target dev)>
<script src="shared/fixtures.js"></script>
<!(endif)-->
<!--(if target dev || e2e)>
<script src="vendor/angular-mocks/angular-mocks.js"></script>
<!(endif)-->
<!-- build:js app.js -->
<script src="vendor/angular/angular.js"></script>
<script src="{app}/app.js"></script>
<script src="{app}/home.js"></script>
<!-- endbuild -->
</body>
</html>
"#
    )
}

/// Relative path and content of every source file
pub fn source_files() -> Vec<(String, Vec<u8>)> {
    let mut files: Vec<(String, Vec<u8>)> = Vec::new();
    for (app, ns) in [("alpha", "a"), ("beta", "b")] {
        files.push((format!("{app}.html"), index_page(app).into_bytes()));
        files.push((
            format!("{app}/app.js"),
            format!("// {app} entry\nangular.module('{ns}', []);\n").into_bytes(),
        ));
        files.push((
            format!("{app}/home.js"),
            format!("angular.module('{ns}').controller('Home', function () {{}});\n").into_bytes(),
        ));
        files.push((
            format!("{app}/main.css"),
            b"/* app */\n.logo { background: url(../fonts/x.woff); }\n".to_vec(),
        ));
        files.push((
            format!("{app}/views/home.html"),
            format!("<h1>{app} home</h1>").into_bytes(),
        ));
    }
    files.push((
        "shared/panel.html".to_string(),
        b"<div class=\"panel\"></div>".to_vec(),
    ));
    files.push(("shared/fixtures.js".to_string(), b"var fixtures = [];\n".to_vec()));
    files.push((
        "vendor/angular/angular.js".to_string(),
        b"var angular = window.angular || {};\n".to_vec(),
    ));
    files.push((
        "vendor/angular-mocks/angular-mocks.js".to_string(),
        b"var mocks = {};\n".to_vec(),
    ));
    files.push((
        "vendor/bootstrap/dist/css/bootstrap.css".to_string(),
        b"@font-face { font-family: x; src: url(../fonts/x.woff); }\n".to_vec(),
    ));
    files.push((
        "vendor/bootstrap/dist/fonts/x.woff".to_string(),
        vec![0x77, 0x4f, 0x46, 0x46, 0, 1, 0, 0],
    ));
    files.push(("assets/logo.png".to_string(), vec![0x89, b'P', b'N', b'G']));
    files
}

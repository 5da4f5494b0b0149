use std::collections::BTreeMap;

/// Project name used for fresh sessions.
pub const DEFAULT_PROJECT_NAME: &str = "my-project";

pub use minide_preview::{
    MARKUP_PATH as INDEX_HTML_PATH, SCRIPT_PATH as SCRIPT_JS_PATH, STYLE_PATH as STYLES_CSS_PATH,
};

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>My Project</title>
    <link rel="stylesheet" href="styles.css">
</head>
<body>
    <h1>Hello World!</h1>
    <script src="script.js"></script>
</body>
</html>"#;

const STYLES_CSS: &str = r#"* {
    margin: 0;
    padding: 0;
    box-sizing: border-box;
}

body {
    font-family: Arial, sans-serif;
    padding: 20px;
}

h1 {
    color: #333;
}"#;

const SCRIPT_JS: &str = r#"console.log('Hello World!');
document.addEventListener('DOMContentLoaded', function() {
    console.log('Page loaded');
});"#;

/// Returns the three-file starter project.
/// 回傳預設的三檔案起始專案。
pub fn seed_files() -> BTreeMap<String, String> {
    BTreeMap::from([
        (INDEX_HTML_PATH.to_string(), INDEX_HTML.to_string()),
        (STYLES_CSS_PATH.to_string(), STYLES_CSS.to_string()),
        (SCRIPT_JS_PATH.to_string(), SCRIPT_JS.to_string()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_contains_canonical_roles() {
        let seed = seed_files();
        assert_eq!(seed.len(), 3);
        assert!(seed[INDEX_HTML_PATH].contains("<h1>Hello World!</h1>"));
        assert!(seed[STYLES_CSS_PATH].contains("box-sizing"));
        assert!(seed[SCRIPT_JS_PATH].starts_with("console.log"));
    }
}

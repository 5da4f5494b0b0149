//! Preview composition for MinIDE projects.
//! 將 HTML/CSS/JS 組合成單一預覽文件。
//!
//! The composer is pure: it never runs the script. Isolation of the composed
//! document is the job of whatever surface renders it.

use std::borrow::Cow;

use regex::Regex;
use thiserror::Error;

/// File that supplies the markup role.
pub const MARKUP_PATH: &str = "index.html";
/// File that supplies the stylesheet role.
pub const STYLE_PATH: &str = "styles.css";
/// File that supplies the script role.
pub const SCRIPT_PATH: &str = "script.js";

const HEAD_SECTION_PATTERN: &str = r"(?s)<head>.*?</head>";
const STYLE_CLOSE_PATTERN: &str = r"(?i)</(style)";
const SCRIPT_CLOSE_PATTERN: &str = r"(?i)</(script)";

#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("invalid preview pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// 預覽所需的三種來源。 / The three canonical inputs of a preview.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreviewSources<'a> {
    pub markup: &'a str,
    pub style: &'a str,
    pub script: &'a str,
}

impl<'a> PreviewSources<'a> {
    /// 依標準檔名查詢來源，缺少者視為空字串。 /
    /// Resolves each role by its canonical file name; missing files become empty.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        Self {
            markup: lookup(MARKUP_PATH).unwrap_or_default(),
            style: lookup(STYLE_PATH).unwrap_or_default(),
            script: lookup(SCRIPT_PATH).unwrap_or_default(),
        }
    }
}

/// 預覽文件組合器。 / Builds the standalone preview document.
#[derive(Debug, Clone)]
pub struct PreviewComposer {
    head_section: Regex,
    style_close: Regex,
    script_close: Regex,
}

impl PreviewComposer {
    pub fn new() -> Result<Self, PreviewError> {
        Ok(Self {
            head_section: Regex::new(HEAD_SECTION_PATTERN)?,
            style_close: Regex::new(STYLE_CLOSE_PATTERN)?,
            script_close: Regex::new(SCRIPT_CLOSE_PATTERN)?,
        })
    }

    /// 移除第一個 `<head>` 區段。 / Removes the first `<head>…</head>` section.
    pub fn strip_head<'t>(&self, markup: &'t str) -> Cow<'t, str> {
        self.head_section.replace(markup, "")
    }

    /// 組合預覽文件。 / Wraps the markup body with a fresh head, style and script blocks.
    pub fn compose(&self, markup: &str, style: &str, script: &str) -> String {
        let body = self.strip_head(markup);
        // A literal closing tag inside a payload would end its block early.
        let style = self.style_close.replace_all(style, r"<\/$1");
        let script = self.script_close.replace_all(script, r"<\/$1");

        let mut document = String::with_capacity(markup.len() + style.len() + script.len() + 256);
        document.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        document.push_str("    <meta charset=\"UTF-8\">\n");
        document.push_str(
            "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
        );
        document.push_str("    <style>");
        document.push_str(&style);
        document.push_str("</style>\n</head>\n<body>\n");
        document.push_str(&body);
        document.push_str("\n    <script>");
        document.push_str(&script);
        document.push_str("</script>\n</body>\n</html>\n");
        document
    }

    pub fn compose_sources(&self, sources: &PreviewSources<'_>) -> String {
        self.compose(sources.markup, sources.style, sources.script)
    }
}

/// Convenience wrapper that builds a one-off [`PreviewComposer`].
pub fn compose(markup: &str, style: &str, script: &str) -> Result<String, PreviewError> {
    Ok(PreviewComposer::new()?.compose(markup, style, script))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn composer() -> PreviewComposer {
        PreviewComposer::new().unwrap()
    }

    #[test]
    fn strips_head_and_injects_blocks() {
        let markup = "<html>\n<head>\n  <title>Old</title>\n  <meta name=\"x\">\n</head>\n<body><p>hi</p></body>\n</html>";
        let document = composer().compose(markup, "p { color: red; }", "console.log(1);");

        assert!(!document.contains("<title>Old</title>"));
        assert!(!document.contains("<meta name=\"x\">"));
        assert!(document.contains("<body><p>hi</p></body>"));
        assert!(document.contains("<style>p { color: red; }</style>"));
        assert!(document.contains("<script>console.log(1);</script>"));
        assert!(document.starts_with("<!DOCTYPE html>"));
        assert_eq!(document.matches("<meta charset=\"UTF-8\">").count(), 1);
    }

    #[test]
    fn only_first_head_section_is_removed() {
        let stripped = composer().strip_head("<head>a</head><p>x</p><head>b</head>");
        assert_eq!(stripped, "<p>x</p><head>b</head>");
    }

    #[test]
    fn markup_without_head_is_kept_verbatim() {
        let stripped = composer().strip_head("<p>no head</p>");
        assert!(matches!(stripped, Cow::Borrowed("<p>no head</p>")));
    }

    #[test]
    fn head_match_is_case_sensitive() {
        let stripped = composer().strip_head("<HEAD><title>t</title></HEAD>");
        assert_eq!(stripped, "<HEAD><title>t</title></HEAD>");
    }

    #[test]
    fn closing_tags_in_payload_are_escaped() {
        let document = composer().compose("", "", "const s = '</script><b>';");
        assert!(document.contains("<script>const s = '<\\/script><b>';</script>"));
    }

    #[test]
    fn sources_default_to_empty_strings() {
        let files = HashMap::from([(MARKUP_PATH, "<p>only markup</p>")]);
        let sources = PreviewSources::from_lookup(|path| files.get(path).copied());
        assert_eq!(sources.markup, "<p>only markup</p>");
        assert_eq!(sources.style, "");
        assert_eq!(sources.script, "");
    }

    #[test]
    fn convenience_compose_matches_composer() {
        let document = compose("<p>x</p>", "a{}", "b()").unwrap();
        assert_eq!(document, composer().compose("<p>x</p>", "a{}", "b()"));
    }
}

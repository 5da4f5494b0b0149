use crate::seed::{INDEX_HTML_PATH, SCRIPT_JS_PATH, STYLES_CSS_PATH};
use crate::store::basename;

/// 檔案類型分類。 / Classification of a project file derived from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    Html,
    Stylesheet,
    Script,
    Image,
    Archive,
    Other,
}

impl FileKind {
    /// 依副檔名判斷類型（區分大小寫）。 / Classifies a path by its case-sensitive suffix.
    pub fn classify(path: &str) -> Self {
        let Some((_, extension)) = basename(path).rsplit_once('.') else {
            return FileKind::Other;
        };
        match extension {
            "html" => FileKind::Html,
            "css" => FileKind::Stylesheet,
            "js" => FileKind::Script,
            "png" | "jpg" | "gif" => FileKind::Image,
            "zip" => FileKind::Archive,
            _ => FileKind::Other,
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            FileKind::Html => "🌐",
            FileKind::Stylesheet => "🎨",
            FileKind::Script => "⚡",
            FileKind::Image => "🖼️",
            FileKind::Archive => "📦",
            FileKind::Other => "📄",
        }
    }

    /// 對應的編輯器分頁。 / Editor tab that becomes active when a file of this kind is opened.
    pub fn editor_tab(self) -> EditorTab {
        match self {
            FileKind::Stylesheet => EditorTab::Css,
            FileKind::Script => EditorTab::JavaScript,
            _ => EditorTab::Html,
        }
    }
}

/// 編輯器分頁。 / The three editor tabs, one per canonical preview role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorTab {
    Html,
    Css,
    JavaScript,
}

impl EditorTab {
    /// File opened when the tab is switched to directly.
    pub fn canonical_path(self) -> &'static str {
        match self {
            EditorTab::Html => INDEX_HTML_PATH,
            EditorTab::Css => STYLES_CSS_PATH,
            EditorTab::JavaScript => SCRIPT_JS_PATH,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EditorTab::Html => "html",
            EditorTab::Css => "css",
            EditorTab::JavaScript => "javascript",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_by_suffix() {
        assert_eq!(FileKind::classify("index.html"), FileKind::Html);
        assert_eq!(FileKind::classify("site/css/main.css"), FileKind::Stylesheet);
        assert_eq!(FileKind::classify("app.js"), FileKind::Script);
        assert_eq!(FileKind::classify("img/logo.png"), FileKind::Image);
        assert_eq!(FileKind::classify("photo.jpg"), FileKind::Image);
        assert_eq!(FileKind::classify("bundle.zip"), FileKind::Archive);
        assert_eq!(FileKind::classify("README.md"), FileKind::Other);
        assert_eq!(FileKind::classify("Makefile"), FileKind::Other);
    }

    #[test]
    fn classification_is_case_sensitive_and_uses_basename() {
        assert_eq!(FileKind::classify("INDEX.HTML"), FileKind::Other);
        assert_eq!(FileKind::classify("v1.css/notes"), FileKind::Other);
    }

    #[test]
    fn editor_tab_falls_back_to_html() {
        assert_eq!(FileKind::Stylesheet.editor_tab(), EditorTab::Css);
        assert_eq!(FileKind::Script.editor_tab(), EditorTab::JavaScript);
        assert_eq!(FileKind::Other.editor_tab(), EditorTab::Html);
        assert_eq!(EditorTab::JavaScript.canonical_path(), "script.js");
    }
}

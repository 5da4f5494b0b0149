use std::collections::BTreeMap;

use tracing::debug;

use crate::error::ProjectError;
use crate::kind::FileKind;

/// File name of the marker written by [`ProjectStore::create_folder_placeholder`].
pub const FOLDER_PLACEHOLDER_NAME: &str = "README.md";

/// 單一專案檔案。 / A `(path, content)` pair as delivered by importers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectFile {
    pub path: String,
    pub content: String,
}

impl ProjectFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// 檔案清單中的一列。 / One row of the sorted file listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileListing {
    pub path: String,
    pub kind: FileKind,
    pub size_bytes: usize,
}

impl FileListing {
    pub fn display_size(&self) -> String {
        format_size(self.size_bytes)
    }
}

/// In-memory mapping from `/`-separated path to text content.
/// 以 `/` 分隔路徑對應文字內容的記憶體存放區。
///
/// Folders have no entries of their own: a folder is a prefix shared by the
/// paths of its files. Every key is non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectStore {
    files: BTreeMap<String, String>,
}

impl ProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from an existing mapping, dropping empty keys.
    pub fn from_files(files: BTreeMap<String, String>) -> Self {
        let mut store = Self::new();
        store.reset(files);
        store
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    pub fn files(&self) -> &BTreeMap<String, String> {
        &self.files
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.files
            .iter()
            .map(|(path, content)| (path.as_str(), content.as_str()))
    }

    /// 批次匯入，後者覆寫前者。 / Inserts a batch; later entries for the same path win.
    ///
    /// Entries with an empty path are skipped. Returns how many entries were applied.
    pub fn import_entries<I>(&mut self, entries: I) -> usize
    where
        I: IntoIterator<Item = ProjectFile>,
    {
        let mut applied = 0usize;
        for entry in entries {
            if entry.path.is_empty() {
                debug!("skipping import entry with an empty path");
                continue;
            }
            self.files.insert(entry.path, entry.content);
            applied += 1;
        }
        debug!(applied, total = self.files.len(), "imported entries");
        applied
    }

    pub fn read_file(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    /// 寫入或覆寫檔案。 / Inserts or overwrites a file; returns `true` when the path is new.
    pub fn write_file(
        &mut self,
        path: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<bool, ProjectError> {
        let path = path.into();
        if path.is_empty() {
            return Err(ProjectError::InvalidPath);
        }
        let created = self.files.insert(path, content.into()).is_none();
        Ok(created)
    }

    /// 刪除指定路徑，不存在者忽略。 / Removes the given paths; absent ones are ignored.
    pub fn delete_paths<I, S>(&mut self, paths: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut removed = 0usize;
        for path in paths {
            if self.files.remove(path.as_ref()).is_some() {
                removed += 1;
            }
        }
        debug!(removed, "deleted paths");
        removed
    }

    /// 複製檔案至目的資料夾。 / Copies each source to `destination/<basename>`.
    ///
    /// Sources are kept. When two sources share a basename the one iterated
    /// last wins; an existing file at the target path is overwritten. Absent
    /// sources are skipped. Returns the old → new path mapping.
    pub fn copy_paths<I, S>(&mut self, paths: I, destination: &str) -> BTreeMap<String, String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut copied = BTreeMap::new();
        for source in paths {
            let source = source.as_ref();
            let Some(content) = self.files.get(source).cloned() else {
                continue;
            };
            let target = format!("{destination}/{}", basename(source));
            self.files.insert(target.clone(), content);
            copied.insert(source.to_string(), target);
        }
        debug!(copied = copied.len(), destination, "copied paths");
        copied
    }

    /// 以新前綴重建整個存放區。 / Nests every file under `prefix/`.
    ///
    /// This is destructive: the unprefixed keys no longer exist afterwards.
    /// Callers that need the old tree must copy it out first.
    pub fn move_prefix_all(&mut self, prefix: &str) {
        let files = std::mem::take(&mut self.files);
        self.files = files
            .into_iter()
            .map(|(path, content)| (format!("{prefix}/{path}"), content))
            .collect();
        debug!(prefix, total = self.files.len(), "moved project under prefix");
    }

    /// 建立資料夾佔位檔。 / Writes `folder/README.md` so the folder shows up in listings.
    pub fn create_folder_placeholder(&mut self, folder: &str) -> String {
        let path = format!("{folder}/{FOLDER_PLACEHOLDER_NAME}");
        let content = format!("# {folder}\n\nThis folder was created in the file manager.");
        self.files.insert(path.clone(), content);
        path
    }

    pub fn reset(&mut self, seed: BTreeMap<String, String>) {
        self.files = seed
            .into_iter()
            .filter(|(path, _)| !path.is_empty())
            .collect();
    }

    /// 依路徑字典序排序的檔案清單。 / Listing sorted lexicographically by path.
    pub fn list(&self) -> Vec<FileListing> {
        self.files
            .iter()
            .map(|(path, content)| FileListing {
                path: path.clone(),
                kind: FileKind::classify(path),
                size_bytes: content.len(),
            })
            .collect()
    }
}

/// Final `/`-delimited segment of a path.
pub fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// 將位元組數格式化。 / Formats a byte count as `B`, `KB` or `MB` with one decimal.
pub fn format_size(bytes: usize) -> String {
    const KIB: usize = 1024;
    const MIB: usize = 1024 * 1024;
    if bytes < KIB {
        format!("{bytes} B")
    } else if bytes < MIB {
        format!("{:.1} KB", bytes as f64 / KIB as f64)
    } else {
        format!("{:.1} MB", bytes as f64 / MIB as f64)
    }
}

use crate::store::ProjectStore;

/// 目前選取的檔案路徑。 / Paths currently selected in the file list, in selection order.
///
/// Selection is additive: selecting an already selected path is a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    paths: Vec<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a path; returns `false` when it was already selected.
    pub fn add(&mut self, path: impl Into<String>) -> bool {
        let path = path.into();
        if self.contains(&path) {
            return false;
        }
        self.paths.push(path);
        true
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths.iter().any(|existing| existing == path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.paths.clone()
    }

    pub fn clear(&mut self) {
        self.paths.clear();
    }

    /// 移除已不存在於存放區的路徑。 / Drops paths that are no longer keys of `store`.
    pub fn retain_existing(&mut self, store: &ProjectStore) {
        self.paths.retain(|path| store.contains(path));
    }

    /// Rewrites every selected path with `map`.
    pub fn remap<F>(&mut self, mut map: F)
    where
        F: FnMut(&str) -> String,
    {
        for path in &mut self.paths {
            *path = map(path);
        }
    }
}

impl FromIterator<String> for Selection {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        let mut selection = Selection::new();
        for path in iter {
            selection.add(path);
        }
        selection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ProjectFile;

    #[test]
    fn add_is_idempotent() {
        let mut selection = Selection::new();
        assert!(selection.add("a.txt"));
        assert!(selection.add("b.txt"));
        assert!(!selection.add("a.txt"));
        assert_eq!(selection.iter().collect::<Vec<_>>(), vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn retain_existing_prunes_removed_paths() {
        let mut store = ProjectStore::new();
        store.import_entries(vec![ProjectFile::new("keep.txt", "")]);
        let mut selection: Selection = ["keep.txt".to_string(), "gone.txt".to_string()]
            .into_iter()
            .collect();
        selection.retain_existing(&store);
        assert_eq!(selection.to_vec(), vec!["keep.txt".to_string()]);
    }
}

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use minide_preview::{PreviewComposer, PreviewSources};
use tracing::info;

use crate::bundle::ProjectBundle;
use crate::editor::EditorBinding;
use crate::error::ProjectError;
use crate::kind::{EditorTab, FileKind};
use crate::persist::{SessionSnapshot, SESSION_FORMAT_VERSION};
use crate::seed::seed_files;
use crate::selection::Selection;
use crate::share;
use crate::store::{ProjectFile, ProjectStore};

/// 匯入來源，決定狀態列訊息。 / Where an imported batch came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOrigin {
    Files,
    Folder,
    Archive,
}

impl ImportOrigin {
    fn status(self, applied: usize) -> String {
        match self {
            ImportOrigin::Files => format!("Imported {applied} files"),
            ImportOrigin::Folder => format!("Opened folder with {applied} files"),
            ImportOrigin::Archive => format!("Successfully extracted {applied} files"),
        }
    }
}

/// 一個編輯工作階段：存放區、選取、編輯器與專案名稱。 /
/// A working session: the store plus selection, editor binding and project name.
///
/// Command handlers validate their preconditions (non-empty selection,
/// non-empty names, an open editor) and return a [`ProjectError`] instead of
/// silently doing nothing. Each handler records a status line.
#[derive(Debug, Clone)]
pub struct ProjectSession {
    store: ProjectStore,
    project_name: String,
    default_name: String,
    selection: Selection,
    editor: EditorBinding,
    status: String,
}

impl ProjectSession {
    /// 以預設三檔案建立新工作階段。 / Creates a seeded session named `default_name`.
    pub fn new(default_name: impl Into<String>) -> Self {
        let default_name = default_name.into();
        Self {
            store: ProjectStore::from_files(seed_files()),
            project_name: default_name.clone(),
            default_name,
            selection: Selection::new(),
            editor: EditorBinding::new(),
            status: "Ready".to_string(),
        }
    }

    /// 從快照還原。 / Restores a session; stale selection entries are dropped.
    pub fn from_snapshot(snapshot: SessionSnapshot, default_name: impl Into<String>) -> Self {
        let store = ProjectStore::from_files(snapshot.files);
        let mut selection: Selection = snapshot.selection.into_iter().collect();
        selection.retain_existing(&store);
        Self {
            store,
            project_name: snapshot.project_name,
            default_name: default_name.into(),
            selection,
            editor: EditorBinding::restore(snapshot.open_file, snapshot.editor_buffer),
            status: snapshot.status,
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            format_version: SESSION_FORMAT_VERSION,
            project_name: self.project_name.clone(),
            files: self.store.files().clone(),
            selection: self.selection.to_vec(),
            open_file: self.editor.path().map(str::to_string),
            editor_buffer: self.editor.buffer().to_string(),
            status: self.status.clone(),
        }
    }

    pub fn store(&self) -> &ProjectStore {
        &self.store
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn editor(&self) -> &EditorBinding {
        &self.editor
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    fn set_status(&mut self, message: impl Into<String>) {
        let message = message.into();
        info!(project = %self.project_name, "{message}");
        self.status = message;
    }

    fn reset_to_seed(&mut self) {
        self.store.reset(seed_files());
        self.project_name = self.default_name.clone();
        self.selection.clear();
        self.editor.close();
    }

    /// 建立新專案。 / Resets to the seed project and forgets selection and editor state.
    pub fn new_project(&mut self) {
        self.reset_to_seed();
        self.set_status("New project created");
    }

    pub fn clear_all(&mut self) {
        self.reset_to_seed();
        self.set_status("Application cleared");
    }

    /// 開啟單一檔案：寫入存放區並綁定編輯器。 / Stores a picked file and opens it in the editor.
    pub fn open_file(&mut self, file: ProjectFile) -> Result<EditorTab, ProjectError> {
        let ProjectFile { path, content } = file;
        self.store.write_file(path.clone(), content)?;
        let tab = self.open_in_editor(&path);
        self.set_status(format!("Opened: {path}"));
        Ok(tab)
    }

    /// 批次匯入。 / Applies a batch of imported files; returns how many were stored.
    pub fn import_files<I>(&mut self, origin: ImportOrigin, files: I) -> usize
    where
        I: IntoIterator<Item = ProjectFile>,
    {
        let applied = self.store.import_entries(files);
        self.set_status(origin.status(applied));
        applied
    }

    pub fn read_file(&self, path: &str) -> Result<&str, ProjectError> {
        self.store
            .read_file(path)
            .ok_or_else(|| ProjectError::NotFound(path.to_string()))
    }

    /// 加入選取。 / Adds `path` to the selection; returns `false` when already selected.
    pub fn select(&mut self, path: &str) -> Result<bool, ProjectError> {
        if !self.store.contains(path) {
            return Err(ProjectError::NotFound(path.to_string()));
        }
        Ok(self.selection.add(path))
    }

    /// 在編輯器中開啟檔案。 / Binds the editor to `path`.
    ///
    /// A path missing from the store opens with an empty buffer; saving it
    /// later creates the file.
    pub fn open_in_editor(&mut self, path: &str) -> EditorTab {
        let content = self.store.read_file(path).unwrap_or_default().to_string();
        self.editor.open(path, content);
        self.set_status(format!("Editing: {path}"));
        FileKind::classify(path).editor_tab()
    }

    /// Switches tabs by opening the tab's canonical file.
    pub fn open_tab(&mut self, tab: EditorTab) {
        self.open_in_editor(tab.canonical_path());
    }

    pub fn set_buffer(&mut self, text: impl Into<String>) -> Result<(), ProjectError> {
        if !self.editor.is_open() {
            return Err(ProjectError::NoOpenFile);
        }
        self.editor.set_buffer(text);
        Ok(())
    }

    /// 將編輯器內容寫回。 / Writes the editor buffer back to the bound path.
    pub fn save(&mut self) -> Result<String, ProjectError> {
        let path = self
            .editor
            .path()
            .map(str::to_string)
            .ok_or(ProjectError::NoOpenFile)?;
        self.store
            .write_file(path.clone(), self.editor.buffer().to_string())?;
        self.set_status(format!("Saved: {path}"));
        Ok(path)
    }

    /// 另存為資料夾。 / Renames the project and nests every file under `folder/`.
    ///
    /// Destructive: the unprefixed paths are gone afterwards. Selection and
    /// the editor binding follow their files to the prefixed paths.
    pub fn save_as(&mut self, folder: &str) -> Result<(), ProjectError> {
        let folder = folder_name(folder);
        if folder.is_empty() {
            return Err(ProjectError::EmptyInput("folder name"));
        }
        self.store.move_prefix_all(folder);
        self.selection.remap(|path| format!("{folder}/{path}"));
        if let Some(path) = self.editor.path().map(|path| format!("{folder}/{path}")) {
            self.editor.rebind(path);
        }
        self.project_name = folder.to_string();
        self.set_status(format!("Project saved as: {folder}"));
        Ok(())
    }

    fn remove_selected(&mut self) -> Result<usize, ProjectError> {
        if self.selection.is_empty() {
            return Err(ProjectError::EmptySelection);
        }
        let selected = self.selection.to_vec();
        let removed = self.store.delete_paths(&selected);
        self.selection.clear();
        self.editor.close();
        Ok(removed)
    }

    /// 關閉選取的檔案。 / Closes (removes) the selected files from the project.
    pub fn close_selected(&mut self) -> Result<usize, ProjectError> {
        let removed = self.remove_selected()?;
        self.set_status("Selected files closed");
        Ok(removed)
    }

    pub fn delete_selected(&mut self) -> Result<usize, ProjectError> {
        let removed = self.remove_selected()?;
        self.set_status(format!("Deleted {removed} file(s)"));
        Ok(removed)
    }

    /// 複製選取檔案。 / Copies the selection into `destination/`, last basename wins.
    pub fn copy_selected(
        &mut self,
        destination: &str,
    ) -> Result<BTreeMap<String, String>, ProjectError> {
        if self.selection.is_empty() {
            return Err(ProjectError::EmptySelection);
        }
        let destination = folder_name(destination);
        if destination.is_empty() {
            return Err(ProjectError::InvalidDestination);
        }
        let selected = self.selection.to_vec();
        let copied = self.store.copy_paths(&selected, destination);
        self.set_status(format!("Copied {} files to {destination}", copied.len()));
        Ok(copied)
    }

    /// 新增資料夾。 / Creates a folder by writing its README placeholder.
    pub fn new_folder(&mut self, name: &str) -> Result<String, ProjectError> {
        let name = folder_name(name);
        if name.is_empty() {
            return Err(ProjectError::EmptyInput("folder name"));
        }
        let path = self.store.create_folder_placeholder(name);
        self.set_status(format!("Created folder: {name}"));
        Ok(path)
    }

    pub fn share_reference(&mut self, base_url: &str) -> Result<String, ProjectError> {
        let reference = share::share_reference(base_url, &self.project_name, &self.store)?;
        self.set_status("URL generated");
        Ok(reference)
    }

    /// 匯出封包。 / Produces the deploy bundle; an empty project cannot be exported.
    pub fn export_bundle(
        &mut self,
        exported_at: DateTime<Utc>,
    ) -> Result<ProjectBundle, ProjectError> {
        if self.store.is_empty() {
            return Err(ProjectError::EmptyProject);
        }
        let bundle = ProjectBundle::export(self.project_name.clone(), &self.store, exported_at);
        self.set_status("Project bundle downloaded");
        Ok(bundle)
    }

    /// 匯入封包並取代目前專案。 / Replaces the project with the bundle's files and name.
    pub fn import_bundle(&mut self, bundle: ProjectBundle) {
        let (name, store) = bundle.into_parts();
        self.store = store;
        self.project_name = name;
        self.selection.clear();
        self.editor.close();
        self.set_status(format!(
            "Imported bundle {} with {} files",
            self.project_name,
            self.store.len()
        ));
    }

    /// 組合預覽文件。 / Composes the preview from `index.html`, `styles.css` and `script.js`.
    pub fn preview(&self) -> Result<String, ProjectError> {
        let composer =
            PreviewComposer::new().map_err(|err| ProjectError::Preview(err.to_string()))?;
        let sources = PreviewSources::from_lookup(|path| self.store.read_file(path));
        Ok(composer.compose_sources(&sources))
    }
}

impl Default for ProjectSession {
    fn default() -> Self {
        Self::new(crate::seed::DEFAULT_PROJECT_NAME)
    }
}

/// Folder names never carry surrounding whitespace or trailing slashes.
fn folder_name(raw: &str) -> &str {
    raw.trim().trim_end_matches('/')
}

/// 編輯器與檔案的綁定。 / The single editor surface and the file it is bound to.
///
/// The buffer mirrors the store content at open time and is only written
/// back by an explicit save.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorBinding {
    path: Option<String>,
    buffer: String,
}

impl EditorBinding {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn restore(path: Option<String>, buffer: String) -> Self {
        Self { path, buffer }
    }

    pub fn open(&mut self, path: impl Into<String>, content: impl Into<String>) {
        self.path = Some(path.into());
        self.buffer = content.into();
    }

    pub fn close(&mut self) {
        self.path = None;
        self.buffer.clear();
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn is_open(&self) -> bool {
        self.path.is_some()
    }

    pub fn set_buffer(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
    }

    pub(crate) fn rebind(&mut self, path: String) {
        self.path = Some(path);
    }
}

//! Importers that turn archives, folders and single files into project entries.
//! 將壓縮檔、資料夾與單一檔案轉換為專案項目的匯入器。
//!
//! Importers never touch a [`minide_project::ProjectStore`] themselves: they
//! hand back a complete [`ImportBatch`] and the caller applies it in one step.

use std::io;
use std::path::PathBuf;

use minide_project::ProjectFile;
use thiserror::Error;

pub mod archive;
pub mod files;
pub mod text;

pub use archive::{decode_archive, read_archive};
pub use files::{read_folder, read_single_file};
pub use text::decode_text;

/// 匯入失敗的項目。 / One entry that could not be imported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportFailure {
    pub path: String,
    pub reason: String,
}

impl ImportFailure {
    pub fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// 一次匯入的結果。 / Outcome of one batch import: decoded entries plus per-entry failures.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportBatch {
    pub entries: Vec<ProjectFile>,
    pub failures: Vec<ImportFailure>,
}

impl ImportBatch {
    /// `true` when every entry decoded.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn sort(&mut self) {
        self.entries.sort_by(|a, b| a.path.cmp(&b.path));
        self.failures.sort_by(|a, b| a.path.cmp(&b.path));
    }
}

/// 匯入錯誤。 / Errors raised while reading import sources.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to read archive: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("{path} could not be read as text: {reason}")]
    Decode { path: String, reason: String },
    #[error("{} has no usable folder name", .0.display())]
    InvalidRoot(PathBuf),
    #[error("import task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

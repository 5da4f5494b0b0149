use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::bundle::ProjectBundle;
use crate::util::write_atomic;

/// Current session file format version.
pub const SESSION_FORMAT_VERSION: u32 = 1;

/// 工作階段快照：存放區、選取與編輯器狀態。 /
/// Snapshot of a working session: files, selection, editor binding and status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub format_version: u32,
    pub project_name: String,
    #[serde(default)]
    pub files: BTreeMap<String, String>,
    #[serde(default)]
    pub selection: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_file: Option<String>,
    #[serde(default)]
    pub editor_buffer: String,
    #[serde(default)]
    pub status: String,
}

/// Errors raised while reading or writing session and bundle files.
/// 讀寫工作階段或封包檔案時的錯誤。
#[derive(Debug, Error)]
pub enum SessionFileError {
    #[error("session file IO error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid session payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),
    #[error("session format version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },
}

/// 以 JSON 保存工作階段的存放器。 / Persists [`SessionSnapshot`]s as pretty JSON with atomic writes.
#[derive(Debug)]
pub struct SessionFileStore {
    path: PathBuf,
}

impl SessionFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 載入快照；檔案不存在時回傳 `Ok(None)`。 / Loads the snapshot, `Ok(None)` when the file is absent.
    pub fn load(&self) -> Result<Option<SessionSnapshot>, SessionFileError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let snapshot: SessionSnapshot = serde_json::from_str(&contents)?;
                if snapshot.format_version > SESSION_FORMAT_VERSION {
                    return Err(SessionFileError::UnsupportedVersion {
                        found: snapshot.format_version,
                        supported: SESSION_FORMAT_VERSION,
                    });
                }
                debug!(path = %self.path.display(), files = snapshot.files.len(), "loaded session");
                Ok(Some(snapshot))
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(SessionFileError::Io(err)),
        }
    }

    pub fn save(&self, snapshot: &SessionSnapshot) -> Result<(), SessionFileError> {
        let json = serde_json::to_vec_pretty(snapshot)?;
        write_atomic(&self.path, &json)?;
        debug!(path = %self.path.display(), "saved session");
        Ok(())
    }
}

/// 將封包寫入磁碟。 / Writes a bundle as indented JSON.
pub fn save_bundle(path: impl AsRef<Path>, bundle: &ProjectBundle) -> Result<(), SessionFileError> {
    let json = serde_json::to_vec_pretty(bundle)?;
    write_atomic(path.as_ref(), &json)?;
    Ok(())
}

/// 從磁碟讀取封包。 / Reads a bundle previously written by [`save_bundle`].
pub fn load_bundle(path: impl AsRef<Path>) -> Result<ProjectBundle, SessionFileError> {
    let contents = fs::read_to_string(path.as_ref())?;
    Ok(serde_json::from_str(&contents)?)
}

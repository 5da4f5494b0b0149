//! In-memory project model for MinIDE: file store, selection, editor binding and bundles.
//! MinIDE 的記憶體專案模型：檔案存放區、選取、編輯器綁定與匯出封包。

mod util;

pub mod bundle;
pub mod editor;
pub mod error;
pub mod kind;
pub mod persist;
pub mod seed;
pub mod selection;
pub mod session;
pub mod share;
pub mod store;

pub use bundle::ProjectBundle;
pub use editor::EditorBinding;
pub use error::ProjectError;
pub use kind::{EditorTab, FileKind};
pub use persist::{
    load_bundle, save_bundle, SessionFileError, SessionFileStore, SessionSnapshot,
    SESSION_FORMAT_VERSION,
};
pub use seed::{seed_files, DEFAULT_PROJECT_NAME};
pub use selection::Selection;
pub use session::{ImportOrigin, ProjectSession};
pub use share::share_reference;
pub use store::{basename, format_size, FileListing, ProjectFile, ProjectStore};

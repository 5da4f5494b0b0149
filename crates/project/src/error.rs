use thiserror::Error;

/// Errors surfaced by project commands.
/// 專案指令可能回報的錯誤。
///
/// Store-level operations are total; these errors come from the command
/// handlers on [`crate::ProjectSession`] when a precondition is not met.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProjectError {
    #[error("file '{0}' was not found in the project")]
    NotFound(String),
    #[error("no files are selected")]
    EmptySelection,
    #[error("a {0} is required")]
    EmptyInput(&'static str),
    #[error("destination folder name must not be empty")]
    InvalidDestination,
    #[error("file paths must not be empty")]
    InvalidPath,
    #[error("no file is currently being edited")]
    NoOpenFile,
    #[error("no files to export; add files to the project first")]
    EmptyProject,
    #[error("invalid project bundle: {0}")]
    InvalidBundle(String),
    #[error("failed to serialise project files: {0}")]
    Serialize(String),
    #[error("failed to compose preview: {0}")]
    Preview(String),
}

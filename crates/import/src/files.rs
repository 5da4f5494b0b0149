use std::path::{Component, Path, PathBuf};

use minide_project::ProjectFile;
use tokio::task::JoinSet;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::text::decode_text;
use crate::{ImportBatch, ImportError, ImportFailure};

/// 讀取單一檔案，以檔名作為路徑。 / Reads one picked file; its file name becomes the project path.
pub async fn read_single_file(path: impl AsRef<Path>) -> Result<ProjectFile, ImportError> {
    let path = path.as_ref();
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| ImportError::InvalidRoot(path.to_path_buf()))?
        .to_string();
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| ImportError::Io {
            path: path.display().to_string(),
            source,
        })?;
    let content = decode_text(&name, &bytes)?;
    Ok(ProjectFile::new(name, content))
}

/// 讀取整個資料夾。 / Reads every file below `root` concurrently.
///
/// Paths are keyed as `<root name>/<relative path>`, mirroring a browser
/// folder picker. All reads are joined before returning, so the batch is
/// either complete or lists every failed file; entries come back sorted by path.
pub async fn read_folder(root: impl AsRef<Path>) -> Result<ImportBatch, ImportError> {
    let requested = root.as_ref();
    // `..` and `.` have no file name until resolved.
    let root = tokio::fs::canonicalize(requested)
        .await
        .map_err(|source| ImportError::Io {
            path: requested.display().to_string(),
            source,
        })?;
    let root_name = root
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| ImportError::InvalidRoot(root.clone()))?
        .to_string();

    let walk_root = root.clone();
    let (targets, mut failures) =
        tokio::task::spawn_blocking(move || collect_targets(&walk_root, &root_name)).await?;

    let mut tasks = JoinSet::new();
    for (key, path) in targets {
        tasks.spawn(async move {
            let outcome = match tokio::fs::read(&path).await {
                Ok(bytes) => decode_text(&key, &bytes),
                Err(source) => Err(ImportError::Io {
                    path: key.clone(),
                    source,
                }),
            };
            (key, outcome)
        });
    }

    let mut batch = ImportBatch::default();
    while let Some(joined) = tasks.join_next().await {
        let (key, outcome) = joined?;
        match outcome {
            Ok(content) => batch.entries.push(ProjectFile::new(key, content)),
            Err(err) => {
                warn!(path = %key, "failed to import file: {err}");
                failures.push(ImportFailure::new(key, err.to_string()));
            }
        }
    }
    batch.failures = failures;
    batch.sort();

    debug!(
        root = %root.display(),
        entries = batch.entries.len(),
        failures = batch.failures.len(),
        "read folder"
    );
    Ok(batch)
}

fn collect_targets(root: &Path, root_name: &str) -> (Vec<(String, PathBuf)>, Vec<ImportFailure>) {
    let mut targets = Vec::new();
    let mut failures = Vec::new();
    for entry in WalkDir::new(root) {
        match entry {
            Ok(entry) if entry.file_type().is_file() => {
                let Ok(relative) = entry.path().strip_prefix(root) else {
                    continue;
                };
                let key = project_key(root_name, relative);
                targets.push((key, entry.into_path()));
            }
            Ok(_) => {}
            Err(err) => {
                let path = err
                    .path()
                    .map(|path| path.display().to_string())
                    .unwrap_or_else(|| root.display().to_string());
                failures.push(ImportFailure::new(path, err.to_string()));
            }
        }
    }
    (targets, failures)
}

fn project_key(root_name: &str, relative: &Path) -> String {
    let mut key = root_name.to_string();
    for component in relative.components() {
        if let Component::Normal(part) = component {
            key.push('/');
            key.push_str(&part.to_string_lossy());
        }
    }
    key
}

use std::io::{Cursor, Read};
use std::path::Path;

use minide_project::ProjectFile;
use tracing::{debug, warn};
use zip::ZipArchive;

use crate::text::decode_text;
use crate::{ImportBatch, ImportError, ImportFailure};

/// 解壓 zip 並解碼每個檔案。 / Extracts a zip archive into text entries.
///
/// Directory entries are skipped. An entry that cannot be read or decoded is
/// reported in [`ImportBatch::failures`] while the remaining entries are still
/// delivered. Only an unreadable archive fails the whole call.
pub fn decode_archive(bytes: &[u8]) -> Result<ImportBatch, ImportError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut batch = ImportBatch::default();

    for index in 0..archive.len() {
        let mut entry = match archive.by_index(index) {
            Ok(entry) => entry,
            Err(err) => {
                warn!(index, "skipping unreadable archive entry: {err}");
                batch
                    .failures
                    .push(ImportFailure::new(format!("#{index}"), err.to_string()));
                continue;
            }
        };
        if entry.is_dir() {
            continue;
        }

        let name = entry.name().to_string();
        let mut raw = Vec::new();
        if let Err(err) = entry.read_to_end(&mut raw) {
            warn!(path = %name, "failed to extract archive entry: {err}");
            batch.failures.push(ImportFailure::new(name, err.to_string()));
            continue;
        }

        match decode_text(&name, &raw) {
            Ok(content) => batch.entries.push(ProjectFile::new(name, content)),
            Err(err) => {
                warn!(path = %name, "archive entry is not text: {err}");
                batch.failures.push(ImportFailure::new(name, err.to_string()));
            }
        }
    }

    debug!(
        entries = batch.entries.len(),
        failures = batch.failures.len(),
        "decoded archive"
    );
    Ok(batch)
}

/// Reads a zip file from disk and decodes it with [`decode_archive`].
///
/// Decompression runs on the blocking pool.
pub async fn read_archive(path: impl AsRef<Path>) -> Result<ImportBatch, ImportError> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await.map_err(|source| ImportError::Io {
        path: path.display().to_string(),
        source,
    })?;
    tokio::task::spawn_blocking(move || decode_archive(&bytes)).await?
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::FileOptions;
    use zip::{CompressionMethod, ZipWriter};

    fn build_archive(entries: &[(&str, Option<&[u8]>)]) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut zip = ZipWriter::new(&mut cursor);
            let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
            for (name, payload) in entries {
                match payload {
                    Some(bytes) => {
                        zip.start_file(*name, options).unwrap();
                        zip.write_all(bytes).unwrap();
                    }
                    None => zip.add_directory(*name, options).unwrap(),
                }
            }
            zip.finish().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn extracts_text_entries_and_skips_directories() {
        let bytes = build_archive(&[
            ("site/", None),
            ("site/index.html", Some(b"<p>hi</p>")),
            ("site/css/main.css", Some(b"p {}")),
        ]);
        let batch = decode_archive(&bytes).unwrap();

        assert!(batch.is_complete());
        let paths: Vec<&str> = batch.entries.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["site/index.html", "site/css/main.css"]);
        assert_eq!(batch.entries[0].content, "<p>hi</p>");
    }

    #[test]
    fn binary_entries_fail_without_dropping_the_rest() {
        let bytes = build_archive(&[
            ("logo.png", Some(b"\x89PNG\x00\x00")),
            ("readme.txt", Some(b"hello")),
        ]);
        let batch = decode_archive(&bytes).unwrap();

        assert_eq!(batch.len(), 1);
        assert_eq!(batch.entries[0].path, "readme.txt");
        assert_eq!(batch.failures.len(), 1);
        assert_eq!(batch.failures[0].path, "logo.png");
    }

    #[test]
    fn garbage_is_an_archive_error() {
        let err = decode_archive(b"definitely not a zip").unwrap_err();
        assert!(matches!(err, ImportError::Archive(_)));
    }
}

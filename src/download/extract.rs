//! Zip archive extraction.

use crate::error::FetchError;
use log::debug;
use std::io;
use std::path::Path;
use zip::ZipArchive;

/// Unpack `archive` into `dest`.
///
/// Extraction is CPU-bound, so it runs under `spawn_blocking` rather than on
/// the async runtime threads.
pub async fn unpack_zip(archive: &Path, dest: &Path) -> Result<(), FetchError> {
    let archive = archive.to_path_buf();
    let dest = dest.to_path_buf();

    debug!("extracting {} into {}", archive.display(), dest.display());

    tokio::task::spawn_blocking(move || {
        let file = std::fs::File::open(&archive)?;
        let mut zip = ZipArchive::new(file).map_err(|e| FetchError::Archive {
            path: archive.clone(),
            source: e,
        })?;
        zip.extract(&dest).map_err(|e| FetchError::Archive {
            path: archive.clone(),
            source: e,
        })
    })
    .await
    .map_err(|e| FetchError::Io(io::Error::other(e)))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
        let file = std::fs::File::create(path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        for (name, contents) in entries {
            if name.ends_with('/') {
                writer.add_directory(*name, SimpleFileOptions::default()).unwrap();
            } else {
                writer.start_file(*name, SimpleFileOptions::default()).unwrap();
                writer.write_all(contents).unwrap();
            }
        }
        writer.finish().unwrap();
    }

    #[tokio::test]
    async fn unpacks_nested_entries() {
        let tmp = tempfile::tempdir().unwrap();
        let archive = tmp.path().join("payload.zip");
        write_zip(
            &archive,
            &[
                ("wrapper/", b""),
                ("wrapper/runtime.dll", b"binary"),
                ("wrapper/docs/readme.md", b"docs"),
            ],
        );

        unpack_zip(&archive, tmp.path()).await.unwrap();

        assert_eq!(
            std::fs::read(tmp.path().join("wrapper/runtime.dll")).unwrap(),
            b"binary"
        );
        assert_eq!(
            std::fs::read(tmp.path().join("wrapper/docs/readme.md")).unwrap(),
            b"docs"
        );
    }

    #[tokio::test]
    async fn corrupt_archive_is_an_archive_error() {
        let tmp = tempfile::tempdir().unwrap();
        let archive = tmp.path().join("broken.zip");
        std::fs::write(&archive, b"this is not a zip file").unwrap();

        let err = unpack_zip(&archive, tmp.path()).await.unwrap_err();
        assert!(matches!(err, FetchError::Archive { .. }));
    }
}

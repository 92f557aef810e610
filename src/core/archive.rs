// ─── Archive Extraction ───
// Full extraction of `.jar` / `.zip` containers, shared by the native and
// asset installers.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::core::error::{BootstrapError, BootstrapResult};

/// `true` for the container formats the installers know how to unpack.
pub fn is_archive(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("jar") || ext.eq_ignore_ascii_case("zip"))
        .unwrap_or(false)
}

/// Extract every entry of `archive` below `dest` on the blocking pool.
/// Returns the number of files written.
pub async fn extract_all(archive: &Path, dest: &Path) -> BootstrapResult<usize> {
    let archive = archive.to_path_buf();
    let dest = dest.to_path_buf();
    tokio::task::spawn_blocking(move || extract_all_blocking(&archive, &dest)).await?
}

pub fn extract_all_blocking(archive: &Path, dest: &Path) -> BootstrapResult<usize> {
    let file = std::fs::File::open(archive).map_err(|e| BootstrapError::io(archive, e))?;
    let mut zip = zip::ZipArchive::new(file)?;

    std::fs::create_dir_all(dest).map_err(|e| BootstrapError::io(dest, e))?;

    let mut written = 0usize;
    for index in 0..zip.len() {
        let mut entry = zip.by_index(index)?;

        let Some(relative) = entry.enclosed_name().map(PathBuf::from) else {
            warn!("Skipping unsafe entry {:?} in {:?}", entry.name(), archive);
            continue;
        };
        let out_path = dest.join(relative);

        if entry.is_dir() {
            std::fs::create_dir_all(&out_path).map_err(|e| BootstrapError::io(&out_path, e))?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| BootstrapError::io(parent, e))?;
        }

        let mut out =
            std::fs::File::create(&out_path).map_err(|e| BootstrapError::io(&out_path, e))?;
        std::io::copy(&mut entry, &mut out).map_err(|e| BootstrapError::io(&out_path, e))?;
        written += 1;
    }

    debug!("Extracted {} files from {:?} into {:?}", written, archive, dest);
    Ok(written)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    /// Build a zip at `path` holding `(name, contents)` pairs.
    pub(crate) fn write_zip(path: &Path, entries: &[(&str, &str)]) {
        let file = std::fs::File::create(path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        for (name, contents) in entries {
            if name.ends_with('/') {
                zip.add_directory(*name, SimpleFileOptions::default()).unwrap();
            } else {
                zip.start_file(*name, SimpleFileOptions::default()).unwrap();
                zip.write_all(contents.as_bytes()).unwrap();
            }
        }
        zip.finish().unwrap();
    }

    #[test]
    fn archive_extension_detection() {
        assert!(is_archive(Path::new("natives/temp/lwjgl-natives.jar")));
        assert!(is_archive(Path::new("resources.ZIP")));
        assert!(!is_archive(Path::new("OpenAL32.dll")));
        assert!(!is_archive(Path::new("noext")));
    }

    #[tokio::test]
    async fn extracts_nested_entries_and_directories() {
        let temp = tempfile::tempdir().unwrap();
        let archive = temp.path().join("resources.zip");
        write_zip(
            &archive,
            &[
                ("sound/", ""),
                ("sound/step/grass1.ogg", "ogg"),
                ("music/calm1.ogg", "music"),
                ("README.txt", "readme"),
            ],
        );

        let dest = temp.path().join("out");
        let count = extract_all(&archive, &dest).await.unwrap();

        assert_eq!(count, 3);
        assert!(dest.join("sound/step/grass1.ogg").is_file());
        assert_eq!(std::fs::read(dest.join("music/calm1.ogg")).unwrap(), b"music");
        assert!(dest.join("README.txt").is_file());
    }

    #[tokio::test]
    async fn rejects_non_zip_payload() {
        let temp = tempfile::tempdir().unwrap();
        let archive = temp.path().join("fake.jar");
        std::fs::write(&archive, b"definitely not a zip").unwrap();

        let err = extract_all(&archive, &temp.path().join("out")).await.unwrap_err();
        assert!(matches!(err, BootstrapError::Zip(_)));
    }
}

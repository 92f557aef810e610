// ─── Native Library Installer ───
// Downloads per-platform native containers into a staging directory,
// unpacks them flat into `natives/` and throws the containers away.

use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::core::archive;
use crate::core::downloader::Downloader;
use crate::core::report::{UnitKind, UnitOutcome, UnitReport};
use crate::core::version::{LibraryDescriptor, Manifest};

/// Archive metadata that has no use at runtime.
const METADATA_DIR: &str = "META-INF";

/// Install natives for every descriptor that declares `platform`, then
/// remove the staging directory and extracted metadata.
pub async fn install_natives(
    manifest: &Manifest,
    natives_dir: &Path,
    staging_dir: &Path,
    platform: &str,
    downloader: &Downloader,
) -> Vec<UnitReport> {
    info!("Downloading native libraries...");
    let staging = StagingDir::new(staging_dir);
    let mut reports = Vec::new();

    for lib in manifest
        .libraries
        .iter()
        .filter(|lib| lib.declares_natives_for(platform))
    {
        reports.push(install_one(lib, natives_dir, staging.path(), platform, downloader).await);
    }

    reports.push(cleanup(staging, natives_dir).await);
    reports
}

async fn install_one(
    lib: &LibraryDescriptor,
    natives_dir: &Path,
    staging_dir: &Path,
    platform: &str,
    downloader: &Downloader,
) -> UnitReport {
    let Some(artifact) = lib.native_artifact(platform) else {
        warn!("No native library for {} in {}", platform, lib.label());
        return UnitReport::new(
            UnitKind::Native,
            lib.label(),
            UnitOutcome::Skipped(format!("no {} native download", platform)),
        );
    };

    let label = artifact.relative_path().to_string();
    let staged = staging_dir.join(artifact.file_name());
    let fetched = downloader
        .ensure(&artifact.url, &staged, artifact.expected_sha1())
        .await;
    if !fetched.is_usable() {
        return UnitReport::new(UnitKind::Native, label, UnitOutcome::from(&fetched));
    }

    if !archive::is_archive(&staged) {
        warn!("Native download {:?} is not an archive, ignoring it", staged);
        return UnitReport::new(
            UnitKind::Native,
            label,
            UnitOutcome::Skipped("not an archive".into()),
        );
    }

    info!("Extracting {} to {:?}", label, natives_dir);
    match archive::extract_all(&staged, natives_dir).await {
        Ok(count) => {
            info!("Extracted {} files from {}", count, label);
            if let Err(e) = tokio::fs::remove_file(&staged).await {
                warn!("Could not delete staged {:?}: {}", staged, e);
            }
            UnitReport::new(UnitKind::Native, label, UnitOutcome::from(&fetched))
        }
        Err(e) => {
            error!("Error extracting {}: {}", label, e);
            UnitReport::new(
                UnitKind::Native,
                label,
                UnitOutcome::Failed(format!("extraction failed: {}", e)),
            )
        }
    }
}

async fn cleanup(mut staging: StagingDir, natives_dir: &Path) -> UnitReport {
    let mut removed = Vec::new();
    let mut failures = Vec::new();

    match staging.remove().await {
        Ok(true) => removed.push(staging.path().to_path_buf()),
        Ok(false) => {}
        Err(e) => failures.push(e),
    }

    let metadata = natives_dir.join(METADATA_DIR);
    if metadata.is_dir() {
        match tokio::fs::remove_dir_all(&metadata).await {
            Ok(()) => removed.push(metadata),
            Err(e) => failures.push(format!("{:?}: {}", metadata, e)),
        }
    }

    for path in &removed {
        info!("Deleted folder: {:?}", path);
    }

    let outcome = if !failures.is_empty() {
        for failure in &failures {
            warn!("Cleanup failed for {}", failure);
        }
        UnitOutcome::Failed(failures.join("; "))
    } else if removed.is_empty() {
        UnitOutcome::AlreadyPresent
    } else {
        UnitOutcome::Installed
    };

    UnitReport::new(UnitKind::NativesCleanup, "natives", outcome)
}

/// Staging directory that is removed on drop if it was not removed
/// explicitly, so an unwinding run does not leave containers behind.
struct StagingDir {
    path: PathBuf,
    removed: bool,
}

impl StagingDir {
    fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            removed: false,
        }
    }

    fn path(&self) -> &Path {
        &self.path
    }

    /// `Ok(true)` if the directory existed and is now gone.
    async fn remove(&mut self) -> Result<bool, String> {
        self.removed = true;
        if !self.path.exists() {
            return Ok(false);
        }
        tokio::fs::remove_dir_all(&self.path)
            .await
            .map(|()| true)
            .map_err(|e| format!("{:?}: {}", self.path, e))
    }
}

impl Drop for StagingDir {
    fn drop(&mut self) {
        if self.removed || !self.path.exists() {
            return;
        }
        if let Err(source) = std::fs::remove_dir_all(&self.path) {
            warn!("Failed to remove staging dir {:?}: {}", self.path, source);
        }
    }
}

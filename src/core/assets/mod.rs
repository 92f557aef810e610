// ─── Asset Installer ───
// One bulk archive of legacy resources (sounds, music, textures),
// unpacked into the virtual/legacy tree the old client reads from.

use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::core::archive;
use crate::core::config::AssetSettings;
use crate::core::downloader::Downloader;
use crate::core::error::{BootstrapError, BootstrapResult};
use crate::core::report::{UnitKind, UnitOutcome, UnitReport};

/// Fetch (unless already on disk), extract and delete the asset archive.
/// Never fails the run: errors are logged with a manual-recovery hint.
pub async fn install_assets(
    settings: &AssetSettings,
    assets_dir: &Path,
    downloader: &Downloader,
) -> UnitReport {
    info!("Downloading asset resources...");
    let target = extraction_target(assets_dir, &settings.extract_subdir);

    let outcome = match install(settings, assets_dir, &target, downloader).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("Error downloading or extracting assets: {}", e);
            for line in recovery_hint(settings, &target) {
                warn!("{}", line);
            }
            UnitOutcome::Failed(e.to_string())
        }
    };

    UnitReport::new(UnitKind::Assets, settings.archive_name.as_str(), outcome)
}

async fn install(
    settings: &AssetSettings,
    assets_dir: &Path,
    target: &Path,
    downloader: &Downloader,
) -> BootstrapResult<UnitOutcome> {
    let archive_path = assets_dir.join(&settings.archive_name);

    let outcome = if archive_path.is_file() {
        info!("Resource archive already exists: {:?}", archive_path);
        UnitOutcome::AlreadyPresent
    } else {
        let fetched = downloader
            .ensure(&settings.archive_url, &archive_path, None)
            .await;
        if !fetched.is_usable() {
            return Err(match UnitOutcome::from(&fetched) {
                UnitOutcome::Failed(reason) => BootstrapError::Other(reason),
                other => BootstrapError::Other(format!("{:?}", other)),
            });
        }
        UnitOutcome::Installed
    };

    info!("Extracting resources to {:?}", target);
    let count = match archive::extract_all(&archive_path, target).await {
        Ok(count) => count,
        Err(e) => {
            // Drop the unusable archive so the next run fetches a fresh copy.
            if let Err(remove_err) = tokio::fs::remove_file(&archive_path).await {
                warn!("Could not delete {:?}: {}", archive_path, remove_err);
            }
            return Err(e);
        }
    };
    info!("Extracted {} resource files", count);

    tokio::fs::remove_file(&archive_path)
        .await
        .map_err(|e| BootstrapError::io(&archive_path, e))?;
    info!("Deleted temporary file: {:?}", archive_path);

    Ok(outcome)
}

fn extraction_target(assets_dir: &Path, subdir: &str) -> PathBuf {
    subdir
        .split(['/', '\\'])
        .filter(|part| !part.is_empty())
        .fold(assets_dir.to_path_buf(), |acc, part| acc.join(part))
}

/// Manual-recovery instructions for when the archive cannot be installed.
fn recovery_hint(settings: &AssetSettings, target: &Path) -> Vec<String> {
    let mut lines = Vec::new();
    if !settings.recovery_sources.is_empty() {
        lines.push(format!(
            "Manually download resources from {}",
            settings.recovery_sources.join(" or ")
        ));
    }
    lines.push(format!(
        "Extract them to {} (e.g. sound/, music/, textures/)",
        target.display()
    ));
    lines
}

// ─── Library Installer ───
// Ordinary library archives, installed under `libraries/<path>` in
// manifest order.

pub mod primary;

use std::path::Path;

use tracing::{debug, info};

use crate::core::downloader::{Downloader, FetchOutcome};
use crate::core::report::{UnitKind, UnitOutcome, UnitReport};
use crate::core::version::Manifest;

pub use primary::install_primary_archive;

/// Fetch every descriptor's ordinary artifact. Descriptors without one are
/// not reported; failures never stop the loop.
pub async fn install_libraries(
    manifest: &Manifest,
    libs_dir: &Path,
    downloader: &Downloader,
) -> Vec<UnitReport> {
    info!("Downloading libraries...");
    let mut reports = Vec::new();

    for lib in &manifest.libraries {
        let Some(artifact) = lib.artifact() else {
            debug!("No ordinary artifact for {}", lib.label());
            continue;
        };

        let relative = artifact.relative_path();
        let dest = libs_dir.join(relative);
        let outcome = downloader
            .ensure(&artifact.url, &dest, artifact.expected_sha1())
            .await;

        match &outcome {
            FetchOutcome::AlreadyValid => info!("Library already exists and is valid: {}", relative),
            FetchOutcome::Downloaded { .. } => info!("Library installed: {}", relative),
            // The downloader already logged the failure.
            _ => {}
        }

        reports.push(UnitReport::new(
            UnitKind::Library,
            relative,
            UnitOutcome::from(&outcome),
        ));
    }

    info!(
        "Processed {} libraries ({} with an artifact)",
        manifest.libraries.len(),
        reports.len()
    );
    reports
}

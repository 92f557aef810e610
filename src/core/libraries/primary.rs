use std::path::Path;

use tracing::{info, warn};

use crate::core::downloader::Downloader;
use crate::core::error::{BootstrapError, BootstrapResult};
use crate::core::report::{UnitKind, UnitOutcome, UnitReport};
use crate::core::version::Manifest;

/// Put the primary client archive beside the program.
///
/// An archive left in the game directory is moved up first. When the
/// manifest declares a client download it is then ensured in place, which
/// also validates a relocated copy.
pub async fn install_primary_archive(
    manifest: &Manifest,
    game_dir: &Path,
    root: &Path,
    archive_name: &str,
    downloader: &Downloader,
) -> UnitReport {
    let target = root.join(archive_name);
    let stray = game_dir.join(archive_name);

    let mut outcome = if stray.is_file() {
        match relocate(&stray, &target).await {
            Ok(()) => {
                info!("Moved {} to {:?}", archive_name, target);
                UnitOutcome::Installed
            }
            Err(e) => {
                warn!("Could not move {:?} to {:?}: {}", stray, target, e);
                UnitOutcome::Failed(e.to_string())
            }
        }
    } else if target.is_file() {
        UnitOutcome::AlreadyPresent
    } else {
        UnitOutcome::Skipped(format!("{} not found", archive_name))
    };

    if let Some(client) = manifest.client_artifact() {
        let fetched = downloader
            .ensure(&client.url, &target, client.expected_sha1())
            .await;
        outcome = UnitOutcome::from(&fetched);
    } else if matches!(outcome, UnitOutcome::Skipped(_)) {
        warn!(
            "{} is missing and the manifest has no client download; place it in {:?}",
            archive_name, root
        );
    }

    UnitReport::new(UnitKind::PrimaryArchive, archive_name, outcome)
}

/// Rename, falling back to copy + delete across filesystems.
async fn relocate(from: &Path, to: &Path) -> BootstrapResult<()> {
    if tokio::fs::rename(from, to).await.is_ok() {
        return Ok(());
    }

    tokio::fs::copy(from, to)
        .await
        .map_err(|e| BootstrapError::io(to, e))?;
    tokio::fs::remove_file(from)
        .await
        .map_err(|e| BootstrapError::io(from, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Client;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn manifest(client_url: Option<String>) -> Manifest {
        let mut json = serde_json::json!({
            "mainClass": "net.minecraft.client.Minecraft",
            "minecraftArguments": ""
        });
        if let Some(url) = client_url {
            json["downloads"] = serde_json::json!({ "client": { "url": url } });
        }
        serde_json::from_value(json).unwrap()
    }

    #[tokio::test]
    async fn stray_archive_is_moved_to_program_dir() {
        let temp = tempfile::tempdir().unwrap();
        let game_dir = temp.path().join("minecraft");
        std::fs::create_dir_all(&game_dir).unwrap();
        std::fs::write(game_dir.join("a1.1.1.jar"), b"client").unwrap();

        let downloader = Downloader::with_client(Client::new());
        let report = install_primary_archive(
            &manifest(None),
            &game_dir,
            temp.path(),
            "a1.1.1.jar",
            &downloader,
        )
        .await;

        assert_eq!(report.outcome, UnitOutcome::Installed);
        assert!(!game_dir.join("a1.1.1.jar").exists());
        assert_eq!(std::fs::read(temp.path().join("a1.1.1.jar")).unwrap(), b"client");
    }

    #[tokio::test]
    async fn missing_archive_without_download_is_skipped() {
        let temp = tempfile::tempdir().unwrap();
        let downloader = Downloader::with_client(Client::new());
        let report = install_primary_archive(
            &manifest(None),
            &temp.path().join("minecraft"),
            temp.path(),
            "a1.1.1.jar",
            &downloader,
        )
        .await;

        assert!(matches!(report.outcome, UnitOutcome::Skipped(_)));
    }

    #[tokio::test]
    async fn declared_client_download_is_fetched() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/client.jar"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"jar".to_vec()))
            .mount(&server)
            .await;

        let temp = tempfile::tempdir().unwrap();
        let downloader = Downloader::with_client(Client::new());
        let report = install_primary_archive(
            &manifest(Some(format!("{}/client.jar", server.uri()))),
            &temp.path().join("minecraft"),
            temp.path(),
            "a1.1.1.jar",
            &downloader,
        )
        .await;

        assert_eq!(report.outcome, UnitOutcome::Installed);
        assert!(temp.path().join("a1.1.1.jar").is_file());
    }

    #[tokio::test]
    async fn offline_rerun_keeps_existing_archive() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/client.jar"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let temp = tempfile::tempdir().unwrap();
        std::fs::write(temp.path().join("a1.1.1.jar"), b"installed client").unwrap();
        let downloader = Downloader::with_client(Client::new());
        let report = install_primary_archive(
            &manifest(Some(format!("{}/client.jar", server.uri()))),
            &temp.path().join("minecraft"),
            temp.path(),
            "a1.1.1.jar",
            &downloader,
        )
        .await;

        assert!(report.outcome.is_failure());
        assert_eq!(
            std::fs::read(temp.path().join("a1.1.1.jar")).unwrap(),
            b"installed client"
        );
    }
}

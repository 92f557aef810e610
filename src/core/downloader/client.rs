use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use reqwest::Client;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, info};

use crate::core::error::{BootstrapError, BootstrapResult};
use crate::core::http::build_http_client;

use super::integrity;

/// Result of [`Downloader::ensure`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Local file already matched the expected digest; nothing was fetched.
    AlreadyValid,
    Downloaded { bytes: u64 },
    /// Transport error or non-success status. Any existing file at the
    /// destination is left as it was.
    DownloadFailed { reason: String },
    /// Body was written but did not match; the file has been deleted.
    IntegrityFailed { expected: String, actual: String },
}

impl FetchOutcome {
    /// `true` when the file at the destination can be used.
    pub fn is_usable(&self) -> bool {
        matches!(
            self,
            FetchOutcome::AlreadyValid | FetchOutcome::Downloaded { .. }
        )
    }
}

/// Sequential, SHA-1 validated downloader. One attempt per artifact.
pub struct Downloader {
    client: Client,
}

impl Downloader {
    pub fn new(user_agent: &str) -> BootstrapResult<Self> {
        Ok(Self {
            client: build_http_client(user_agent)?,
        })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Make sure `dest` holds the resource at `url`.
    ///
    /// With an expected digest a valid local copy short-circuits the
    /// network, and a mismatching download is deleted. Without one,
    /// whatever was downloaded is trusted.
    pub async fn ensure(&self, url: &str, dest: &Path, sha1_expected: Option<&str>) -> FetchOutcome {
        if let Some(expected) = sha1_expected {
            if integrity::verify(dest, expected).await {
                debug!("Already valid: {:?}", dest);
                return FetchOutcome::AlreadyValid;
            }
        }

        let bytes = match self.download_file(url, dest).await {
            Ok(bytes) => bytes,
            Err(e) => {
                error!("Error downloading {}: {}", url, e);
                return FetchOutcome::DownloadFailed {
                    reason: e.to_string(),
                };
            }
        };

        if let Some(expected) = sha1_expected {
            let actual = integrity::file_sha1(dest)
                .await
                .unwrap_or_else(|_| "<unreadable>".to_string());
            if !actual.eq_ignore_ascii_case(expected.trim()) {
                let mismatch = BootstrapError::Sha1Mismatch {
                    path: dest.to_path_buf(),
                    expected: expected.to_string(),
                    actual: actual.clone(),
                };
                error!("{}", mismatch);
                remove_partial(dest).await;
                return FetchOutcome::IntegrityFailed {
                    expected: expected.to_string(),
                    actual,
                };
            }
        }

        info!("Downloaded: {} ({} bytes)", url, bytes);
        FetchOutcome::Downloaded { bytes }
    }

    /// Stream `url` into a sibling `.part` file and move it over `dest`
    /// once the body is complete. Returns the number of bytes written.
    pub async fn download_file(&self, url: &str, dest: &Path) -> BootstrapResult<u64> {
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| BootstrapError::io(parent, e))?;
        }

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BootstrapError::DownloadFailed {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let part = part_path(dest);
        let written = match stream_body(response, &part).await {
            Ok(written) => written,
            Err(e) => {
                remove_partial(&part).await;
                return Err(e);
            }
        };

        if let Err(e) = tokio::fs::rename(&part, dest).await {
            remove_partial(&part).await;
            return Err(BootstrapError::io(dest, e));
        }

        debug!("Downloaded: {} -> {:?}", url, dest);
        Ok(written)
    }
}

fn part_path(dest: &Path) -> PathBuf {
    let mut name = dest
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".part");
    dest.with_file_name(name)
}

async fn stream_body(response: reqwest::Response, part: &Path) -> BootstrapResult<u64> {
    let mut file = tokio::fs::File::create(part)
        .await
        .map_err(|e| BootstrapError::io(part, e))?;

    let mut written = 0u64;
    let mut body = response.bytes_stream();
    while let Some(chunk) = body.next().await {
        let chunk = chunk?;
        file.write_all(&chunk)
            .await
            .map_err(|e| BootstrapError::io(part, e))?;
        written += chunk.len() as u64;
    }

    file.flush().await.map_err(|e| BootstrapError::io(part, e))?;
    Ok(written)
}

async fn remove_partial(path: &Path) {
    if path.is_file() {
        if let Err(e) = tokio::fs::remove_file(path).await {
            error!("Could not delete {:?}: {}", path, e);
        }
    }
}

use std::path::Path;

use sha1::{Digest, Sha1};
use tokio::io::AsyncReadExt;

use crate::core::error::{BootstrapError, BootstrapResult};

const READ_CHUNK: usize = 8192;

/// Hex-encoded SHA-1 of a file, read in fixed-size chunks.
pub async fn file_sha1(path: &Path) -> BootstrapResult<String> {
    let mut file = tokio::fs::File::open(path)
        .await
        .map_err(|e| BootstrapError::io(path, e))?;

    let mut hasher = Sha1::new();
    let mut buffer = vec![0u8; READ_CHUNK];
    loop {
        let read = file
            .read(&mut buffer)
            .await
            .map_err(|e| BootstrapError::io(path, e))?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// `true` iff `path` exists and its SHA-1 equals `expected`.
/// Hex case is ignored.
pub async fn verify(path: &Path, expected: &str) -> bool {
    if !path.is_file() {
        return false;
    }
    match file_sha1(path).await {
        Ok(actual) => actual.eq_ignore_ascii_case(expected.trim()),
        Err(_) => false,
    }
}

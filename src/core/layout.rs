use std::path::{Path, PathBuf};

use crate::core::config::BootstrapConfig;
use crate::core::error::{BootstrapError, BootstrapResult};

/// On-disk layout of an installation rooted at the program directory:
///
/// - `<game_dir>/libraries/` - ordinary library archives
/// - `<game_dir>/natives/`   - flattened native binaries
/// - `<game_dir>/natives/temp/` - staged native containers
/// - `<game_dir>/assets/`    - bulk asset archive target
#[derive(Debug, Clone)]
pub struct InstallLayout {
    root: PathBuf,
    game_dir: PathBuf,
}

impl InstallLayout {
    pub fn new(root: &Path, config: &BootstrapConfig) -> Self {
        Self {
            root: root.to_path_buf(),
            game_dir: root.join(&config.game_dir),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn game_dir(&self) -> &Path {
        &self.game_dir
    }

    pub fn libraries_dir(&self) -> PathBuf {
        self.game_dir.join("libraries")
    }

    pub fn natives_dir(&self) -> PathBuf {
        self.game_dir.join("natives")
    }

    pub fn natives_staging_dir(&self) -> PathBuf {
        self.natives_dir().join("temp")
    }

    pub fn assets_dir(&self) -> PathBuf {
        self.game_dir.join("assets")
    }

    /// Create every root before the first download.
    pub async fn prepare(&self) -> BootstrapResult<()> {
        for dir in [
            self.game_dir.clone(),
            self.libraries_dir(),
            self.natives_dir(),
            self.natives_staging_dir(),
            self.assets_dir(),
        ] {
            tokio::fs::create_dir_all(&dir)
                .await
                .map_err(|e| BootstrapError::io(&dir, e))?;
        }
        Ok(())
    }
}

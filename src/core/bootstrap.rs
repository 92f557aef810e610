// ─── Bootstrap Pipeline ───
// One sequential pass: manifest → libraries → natives → assets → primary
// archive → runtime → launch script. Only the manifest step can abort.

use std::path::{Path, PathBuf};

use tracing::{error, info};

use crate::core::assets::install_assets;
use crate::core::config::BootstrapConfig;
use crate::core::downloader::Downloader;
use crate::core::error::BootstrapResult;
use crate::core::java::RuntimeLocator;
use crate::core::launch::generate_launch_script;
use crate::core::layout::InstallLayout;
use crate::core::libraries::{install_libraries, install_primary_archive};
use crate::core::natives::install_natives;
use crate::core::report::{Summary, UnitKind, UnitOutcome, UnitReport};
use crate::core::version::Manifest;

pub struct Bootstrap {
    config: BootstrapConfig,
    layout: InstallLayout,
    locator: Option<RuntimeLocator>,
}

impl Bootstrap {
    pub fn new(root: &Path, config: BootstrapConfig) -> Self {
        let layout = InstallLayout::new(root, &config);
        Self {
            config,
            layout,
            locator: None,
        }
    }

    /// Replace the locator built from the `java` settings.
    pub fn with_locator(mut self, locator: RuntimeLocator) -> Self {
        self.locator = Some(locator);
        self
    }

    pub fn layout(&self) -> &InstallLayout {
        &self.layout
    }

    pub fn config(&self) -> &BootstrapConfig {
        &self.config
    }

    pub async fn run(self) -> BootstrapResult<Summary> {
        let Bootstrap {
            config,
            layout,
            locator,
        } = self;

        let manifest_path = layout.root().join(&config.manifest_file);
        let manifest = Manifest::load(&manifest_path).await?;

        let mut summary = Summary::default();

        if let Err(e) = layout.prepare().await {
            error!("Failed to create install directories: {}", e);
        }

        let downloader = Downloader::new(&config.user_agent)?;

        summary.extend(install_libraries(&manifest, &layout.libraries_dir(), &downloader).await);

        summary.extend(
            install_natives(
                &manifest,
                &layout.natives_dir(),
                &layout.natives_staging_dir(),
                &config.native_platform,
                &downloader,
            )
            .await,
        );

        summary.push(install_assets(&config.assets, &layout.assets_dir(), &downloader).await);

        summary.push(
            install_primary_archive(
                &manifest,
                layout.game_dir(),
                layout.root(),
                &config.primary_archive,
                &downloader,
            )
            .await,
        );

        let locator = locator.unwrap_or_else(|| RuntimeLocator::from_settings(&config.java));
        let (java, runtime_report) = locate_runtime(locator).await;
        summary.push(runtime_report);

        summary.push(generate_launch_script(&layout, &config, &manifest, java).await);

        summary.finish();
        summary.log();
        Ok(summary)
    }
}

async fn locate_runtime(locator: RuntimeLocator) -> (Option<PathBuf>, UnitReport) {
    info!("Searching for Java 8...");
    match tokio::task::spawn_blocking(move || locator.find()).await {
        Ok(Some(java)) => {
            let label = java.to_string_lossy().into_owned();
            (
                Some(java),
                UnitReport::new(UnitKind::Runtime, label, UnitOutcome::AlreadyPresent),
            )
        }
        Ok(None) => (
            None,
            UnitReport::new(
                UnitKind::Runtime,
                "java",
                UnitOutcome::Skipped("no Java 8 runtime found; using bare java".into()),
            ),
        ),
        Err(e) => {
            error!("Java search task failed: {}", e);
            (
                None,
                UnitReport::new(UnitKind::Runtime, "java", UnitOutcome::Failed(e.to_string())),
            )
        }
    }
}

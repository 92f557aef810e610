pub mod core;

use std::path::PathBuf;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use crate::core::bootstrap::Bootstrap;
use crate::core::config::BootstrapConfig;
use crate::core::report::UnitKind;

/// Overrides the program directory everything is installed into.
pub const ROOT_ENV: &str = "LEGACY_BOOTSTRAP_ROOT";

pub fn init_logging() {
    // Structured logging; RUST_LOG wins over the default filter.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,legacy_bootstrap_lib=debug")),
        )
        .try_init();
}

/// `$LEGACY_BOOTSTRAP_ROOT`, else the executable's directory, else the
/// current directory.
pub fn program_dir() -> PathBuf {
    if let Some(root) = std::env::var_os(ROOT_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(root);
    }

    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(PathBuf::from))
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

pub async fn run() -> ExitCode {
    init_logging();

    let root = program_dir();
    tracing::info!("legacy-bootstrap starting in {:?}", root);

    let config = BootstrapConfig::load(&root);
    match Bootstrap::new(&root, config).run().await {
        Ok(summary) => {
            tracing::info!(
                "All steps finished ({} failed); run {} to play",
                summary.failures().count(),
                summary
                    .of_kind(UnitKind::LaunchScript)
                    .next()
                    .map(|unit| unit.label.as_str())
                    .unwrap_or("the launch script")
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

pub mod arguments;
pub mod classpath;
pub mod script;

use std::path::PathBuf;

use crate::core::config::BootstrapConfig;
use crate::core::layout::InstallLayout;
use crate::core::report::UnitReport;
use crate::core::version::Manifest;

pub use arguments::render_game_arguments;
pub use classpath::Classpath;
pub use script::{render_script, write_script, ScriptInputs};

/// Build the classpath from what is installed now and write the start
/// script into the program directory.
pub async fn generate_launch_script(
    layout: &InstallLayout,
    config: &BootstrapConfig,
    manifest: &Manifest,
    java: Option<PathBuf>,
) -> UnitReport {
    let launch = &config.launch;
    let classpath = Classpath::discover(
        &layout.libraries_dir(),
        &launch.pinned_library,
        &config.primary_archive,
    );

    let inputs = ScriptInputs {
        primary_archive: config.primary_archive.clone(),
        main_class: manifest.main_class.clone(),
        game_arguments: render_game_arguments(&manifest.minecraft_arguments, launch),
        game_dir: config.game_dir.clone(),
        classpath,
        java,
    };

    write_script(layout.root(), launch.effective_flavor(), &inputs, launch).await
}

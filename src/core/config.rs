// ─── Bootstrap Configuration ───
// Every fixed URL, file name and literal used by the installer steps.
// Defaults reproduce the stock Alpha a1.1.1 setup; a `bootstrap.json`
// beside the program may override any field.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::http::DEFAULT_USER_AGENT;

pub const CONFIG_FILE: &str = "bootstrap.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    /// Manifest file name, resolved against the program directory.
    pub manifest_file: String,
    /// Game working directory, relative to the program directory.
    pub game_dir: String,
    /// File name of the primary client archive.
    pub primary_archive: String,
    pub user_agent: String,
    /// Key looked up in each library's `natives` map.
    pub native_platform: String,
    pub assets: AssetSettings,
    pub launch: LaunchSettings,
    pub java: JavaSearchSettings,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            manifest_file: "a1.1.1.json".into(),
            game_dir: "minecraft".into(),
            primary_archive: "a1.1.1.jar".into(),
            user_agent: DEFAULT_USER_AGENT.into(),
            native_platform: "windows".into(),
            assets: AssetSettings::default(),
            launch: LaunchSettings::default(),
            java: JavaSearchSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetSettings {
    pub archive_url: String,
    pub archive_name: String,
    /// Extraction target, relative to the assets root.
    pub extract_subdir: String,
    /// Printed when the archive cannot be installed automatically.
    pub recovery_sources: Vec<String>,
}

impl Default for AssetSettings {
    fn default() -> Self {
        Self {
            archive_url: "https://archive.org/download/alpha-1.1.1/resources.zip".into(),
            archive_name: "resources.zip".into(),
            extract_subdir: "virtual/legacy".into(),
            recovery_sources: vec![
                "https://minecraft.wiki/w/Resources".into(),
                "https://archive.org/download/minecraft-resources".into(),
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptFlavor {
    /// `start.bat` for cmd.exe.
    Batch,
    /// `start.sh` for a POSIX shell.
    Shell,
}

impl ScriptFlavor {
    pub fn host() -> Self {
        if cfg!(windows) {
            ScriptFlavor::Batch
        } else {
            ScriptFlavor::Shell
        }
    }

    pub fn default_file_name(self) -> &'static str {
        match self {
            ScriptFlavor::Batch => "start.bat",
            ScriptFlavor::Shell => "start.sh",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchSettings {
    /// `None` picks the flavor native to the host.
    pub flavor: Option<ScriptFlavor>,
    pub script_name: Option<String>,
    pub log_file: String,
    /// Always placed first on the classpath, relative to the libraries root.
    pub pinned_library: String,
    pub player_name: String,
    pub session_token: String,
    pub game_directory: String,
    pub assets_directory: String,
    pub openal_library: String,
    /// Used when no runtime was located.
    pub fallback_java: String,
}

impl Default for LaunchSettings {
    fn default() -> Self {
        Self {
            flavor: None,
            script_name: None,
            log_file: "log.log".into(),
            pinned_library:
                "org/lwjgl/lwjgl/lwjgl/2.9.3-grayscreenfix/lwjgl-2.9.3-grayscreenfix.jar".into(),
            player_name: "Player".into(),
            session_token: "token".into(),
            game_directory: "minecraft".into(),
            assets_directory: "minecraft/assets".into(),
            openal_library: "OpenAL32.dll".into(),
            fallback_java: "java".into(),
        }
    }
}

impl LaunchSettings {
    pub fn effective_flavor(&self) -> ScriptFlavor {
        self.flavor.unwrap_or_else(ScriptFlavor::host)
    }

    pub fn effective_script_name(&self) -> String {
        self.script_name
            .clone()
            .unwrap_or_else(|| self.effective_flavor().default_file_name().to_string())
    }
}

/// One conventional install location. Versioned templates get an update
/// number appended (`jdk1.8.0_` + `392`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallTemplate {
    /// `/`-separated, relative to a filesystem root.
    pub path: String,
    #[serde(default)]
    pub versioned: bool,
}

impl InstallTemplate {
    fn versioned(path: &str) -> Self {
        Self {
            path: path.into(),
            versioned: true,
        }
    }

    fn fixed(path: &str) -> Self {
        Self {
            path: path.into(),
            versioned: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JavaSearchSettings {
    pub home_env: String,
    /// Accept a runtime whose `-version` output contains any of these.
    pub version_markers: Vec<String>,
    pub install_templates: Vec<InstallTemplate>,
    /// Highest update number probed for versioned templates.
    pub newest_update: u32,
    /// Skip the filesystem scan entirely.
    pub scan_install_roots: bool,
}

impl Default for JavaSearchSettings {
    fn default() -> Self {
        Self {
            home_env: "JAVA_HOME".into(),
            version_markers: vec!["1.8".into(), "8u".into()],
            install_templates: default_install_templates(),
            newest_update: 500,
            scan_install_roots: true,
        }
    }
}

fn default_install_templates() -> Vec<InstallTemplate> {
    if cfg!(windows) {
        vec![
            InstallTemplate::versioned("Program Files/Java/jdk1.8.0_"),
            InstallTemplate::versioned("Program Files (x86)/Java/jdk1.8.0_"),
            InstallTemplate::versioned("Program Files/Java/jre1.8.0_"),
            InstallTemplate::versioned("Program Files (x86)/Java/jre1.8.0_"),
            InstallTemplate::versioned("Program Files/AdoptOpenJDK/jdk-8"),
            InstallTemplate::versioned("Program Files (x86)/AdoptOpenJDK/jdk-8"),
        ]
    } else {
        vec![
            InstallTemplate::fixed("usr/lib/jvm/java-8-openjdk"),
            InstallTemplate::fixed("usr/lib/jvm/java-8-openjdk-amd64"),
            InstallTemplate::fixed("usr/lib/jvm/java-1.8.0-openjdk"),
            InstallTemplate::versioned("usr/lib/jvm/jdk1.8.0_"),
            InstallTemplate::versioned("opt/java/jdk1.8.0_"),
            InstallTemplate::versioned("opt/jdk1.8.0_"),
        ]
    }
}

impl BootstrapConfig {
    /// Load `bootstrap.json` from `root`, or defaults when it is missing.
    /// A malformed file is reported and ignored.
    pub fn load(root: &Path) -> Self {
        let path = root.join(CONFIG_FILE);
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(_) => {
                debug!("No {} found, using defaults", CONFIG_FILE);
                return Self::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(config) => {
                debug!("Loaded configuration from {:?}", path);
                config
            }
            Err(e) => {
                warn!("Ignoring invalid configuration {:?}: {}", path, e);
                Self::default()
            }
        }
    }
}

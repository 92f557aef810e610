// ─── Version Manifest ───
// Parses the legacy version JSON that drives the whole bootstrap.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::core::error::{BootstrapError, BootstrapResult};

/// Root of a legacy (pre-1.13) version JSON.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default)]
    pub id: Option<String>,
    pub main_class: String,
    /// Space-separated template with `${...}` placeholders.
    pub minecraft_arguments: String,
    #[serde(default)]
    pub libraries: Vec<LibraryDescriptor>,
    #[serde(default)]
    pub downloads: Option<ClientDownloads>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClientDownloads {
    #[serde(default)]
    pub client: Option<ArtifactEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LibraryDescriptor {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub downloads: Option<LibraryDownloads>,
    /// Platform id (`windows`, `linux`, `osx`) to classifier name.
    #[serde(default)]
    pub natives: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LibraryDownloads {
    #[serde(default)]
    pub artifact: Option<ArtifactEntry>,
    #[serde(default)]
    pub classifiers: HashMap<String, ArtifactEntry>,
}

/// A downloadable file. `path` and `sha1` are optional in the wild.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ArtifactEntry {
    pub url: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub sha1: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
}

impl ArtifactEntry {
    /// Install path relative to the libraries root, defaulting to the
    /// final URL segment.
    pub fn relative_path(&self) -> &str {
        match self.path.as_deref() {
            Some(path) if !path.trim().is_empty() => path,
            _ => last_segment(&self.url),
        }
    }

    /// Final segment of [`relative_path`](Self::relative_path).
    pub fn file_name(&self) -> &str {
        last_segment(self.relative_path())
    }

    pub fn expected_sha1(&self) -> Option<&str> {
        self.sha1.as_deref().filter(|s| !s.trim().is_empty())
    }
}

fn last_segment(raw: &str) -> &str {
    raw.rsplit(['/', '\\']).next().unwrap_or(raw)
}

impl LibraryDescriptor {
    pub fn artifact(&self) -> Option<&ArtifactEntry> {
        self.downloads.as_ref()?.artifact.as_ref()
    }

    /// Whether the `natives` map names `platform` at all.
    pub fn declares_natives_for(&self, platform: &str) -> bool {
        self.natives
            .as_ref()
            .is_some_and(|natives| natives.contains_key(platform))
    }

    /// Classifier name for `platform` with `${arch}` expanded.
    pub fn native_classifier(&self, platform: &str) -> Option<String> {
        let raw = self.natives.as_ref()?.get(platform)?;
        let arch = if cfg!(target_pointer_width = "64") {
            "64"
        } else {
            "32"
        };
        Some(raw.replace("${arch}", arch))
    }

    /// Native artifact for `platform`. Falls back to the conventional
    /// `natives-<platform>` classifier when the mapped name is missing.
    pub fn native_artifact(&self, platform: &str) -> Option<&ArtifactEntry> {
        let classifiers = &self.downloads.as_ref()?.classifiers;
        let classifier = self.native_classifier(platform)?;
        classifiers
            .get(&classifier)
            .or_else(|| classifiers.get(&format!("natives-{}", platform)))
    }

    /// Name for log lines.
    pub fn label(&self) -> &str {
        if !self.name.is_empty() {
            return &self.name;
        }
        self.artifact()
            .map(ArtifactEntry::relative_path)
            .unwrap_or("<unnamed library>")
    }
}

impl Manifest {
    /// Read and parse the manifest. This is the only fatal step of a run.
    pub async fn load(path: &Path) -> BootstrapResult<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| BootstrapError::ManifestLoad {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let manifest: Manifest =
            serde_json::from_str(&raw).map_err(|e| BootstrapError::ManifestLoad {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        info!(
            "Loaded manifest {} ({} libraries, main class {})",
            manifest.id.as_deref().unwrap_or("<no id>"),
            manifest.libraries.len(),
            manifest.main_class
        );
        Ok(manifest)
    }

    pub fn client_artifact(&self) -> Option<&ArtifactEntry> {
        self.downloads.as_ref()?.client.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lwjgl_platform() -> LibraryDescriptor {
        serde_json::from_value(serde_json::json!({
            "name": "org.lwjgl.lwjgl:lwjgl-platform:2.9.0",
            "downloads": {
                "classifiers": {
                    "natives-windows": {
                        "url": "https://libraries.minecraft.net/org/lwjgl/lwjgl/lwjgl-platform/2.9.0/lwjgl-platform-2.9.0-natives-windows.jar",
                        "path": "org/lwjgl/lwjgl/lwjgl-platform/2.9.0/lwjgl-platform-2.9.0-natives-windows.jar",
                        "sha1": "d1b9d4d0e7a8d0e0b8fa9d0e0b8fa9d0e0b8fa9d"
                    }
                }
            },
            "natives": { "linux": "natives-linux", "windows": "natives-windows" }
        }))
        .unwrap()
    }

    #[test]
    fn deserialize_legacy_manifest() {
        let manifest: Manifest = serde_json::from_value(serde_json::json!({
            "id": "a1.1.1",
            "mainClass": "net.minecraft.launchwrapper.Launch",
            "minecraftArguments": "${auth_player_name} ${auth_session} --gameDir ${game_directory}",
            "libraries": [
                {
                    "name": "net.minecraft:launchwrapper:1.6",
                    "downloads": {
                        "artifact": {
                            "url": "https://libraries.minecraft.net/net/minecraft/launchwrapper/1.6/launchwrapper-1.6.jar",
                            "path": "net/minecraft/launchwrapper/1.6/launchwrapper-1.6.jar",
                            "sha1": "5150b9c2951f0fde987ce9c33496e26add1de224",
                            "size": 27787
                        }
                    }
                },
                { "name": "bare:entry:1.0" }
            ],
            "downloads": {
                "client": { "url": "https://example.com/client.jar", "sha1": "abc" }
            }
        }))
        .unwrap();

        assert_eq!(manifest.main_class, "net.minecraft.launchwrapper.Launch");
        assert_eq!(manifest.libraries.len(), 2);
        assert!(manifest.libraries[1].artifact().is_none());
        assert_eq!(
            manifest.client_artifact().map(|c| c.url.as_str()),
            Some("https://example.com/client.jar")
        );
    }

    #[test]
    fn artifact_without_path_uses_last_url_segment() {
        let entry = ArtifactEntry {
            url: "https://example.com/some/dir/thing-1.0.jar".into(),
            path: None,
            sha1: Some(String::new()),
            size: None,
        };
        assert_eq!(entry.relative_path(), "thing-1.0.jar");
        assert_eq!(entry.expected_sha1(), None);
    }

    #[test]
    fn file_name_flattens_nested_path() {
        let lib = lwjgl_platform();
        let native = lib.native_artifact("windows").unwrap();
        assert_eq!(
            native.file_name(),
            "lwjgl-platform-2.9.0-natives-windows.jar"
        );
    }

    #[test]
    fn natives_only_resolve_for_declared_platform() {
        let lib = lwjgl_platform();
        assert!(lib.declares_natives_for("windows"));
        assert!(!lib.declares_natives_for("osx"));
        // Declared for linux but no classifier download exists.
        assert!(lib.declares_natives_for("linux"));
        assert!(lib.native_artifact("linux").is_none());
    }

    #[test]
    fn arch_placeholder_is_expanded() {
        let lib: LibraryDescriptor = serde_json::from_value(serde_json::json!({
            "name": "tv.twitch:twitch-platform:5.16",
            "natives": { "windows": "natives-windows-${arch}" }
        }))
        .unwrap();
        let classifier = lib.native_classifier("windows").unwrap();
        assert!(!classifier.contains("${arch}"));
        assert!(classifier.starts_with("natives-windows-"));
    }

    #[tokio::test]
    async fn load_reports_unparsable_manifest() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("broken.json");
        std::fs::write(&path, b"{\"mainClass\": 1").unwrap();

        let err = Manifest::load(&path).await.unwrap_err();
        assert!(matches!(err, BootstrapError::ManifestLoad { .. }));
    }

    #[tokio::test]
    async fn load_reports_missing_manifest() {
        let temp = tempfile::tempdir().unwrap();
        let err = Manifest::load(&temp.path().join("absent.json"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("absent.json"));
    }
}

use std::path::Path;
use std::process::Command;

use tracing::debug;

/// Decides whether a candidate executable is an acceptable runtime.
pub trait VersionProbe: Send + Sync {
    fn matches(&self, java_bin: &Path) -> bool;
}

/// Runs `<java> -version` and looks for any of a set of version markers
/// (`1.8`, `8u`) in the combined output.
#[derive(Debug, Clone)]
pub struct MarkerProbe {
    markers: Vec<String>,
}

impl MarkerProbe {
    pub fn new(markers: Vec<String>) -> Self {
        Self { markers }
    }

    pub fn output_matches(&self, output: &str) -> bool {
        self.markers
            .iter()
            .filter(|marker| !marker.is_empty())
            .any(|marker| output.contains(marker.as_str()))
    }

    fn version_output(java_bin: &Path) -> Option<String> {
        let output = Command::new(java_bin).arg("-version").output().ok()?;
        if !output.status.success() {
            return None;
        }
        // `java -version` prints to stderr; some builds use stdout.
        Some(format!(
            "{}\n{}",
            String::from_utf8_lossy(&output.stderr),
            String::from_utf8_lossy(&output.stdout)
        ))
    }
}

impl VersionProbe for MarkerProbe {
    fn matches(&self, java_bin: &Path) -> bool {
        let Some(output) = Self::version_output(java_bin) else {
            return false;
        };
        debug!(
            "Probing {:?}: {}",
            java_bin,
            output.lines().next().unwrap_or("")
        );
        self.output_matches(&output)
    }
}

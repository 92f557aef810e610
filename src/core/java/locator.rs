// ─── Runtime Locator ───
// Brute-force search for a Java 8 executable: the environment-declared
// home first, then conventional install roots with a descending scan of
// update numbers. Sources and the version check are pluggable.

use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::core::config::{InstallTemplate, JavaSearchSettings};

use super::probe::{MarkerProbe, VersionProbe};

/// Yields candidate executable paths, best first.
pub trait CandidateSource: Send + Sync {
    fn name(&self) -> &str;
    fn candidates(&self) -> Box<dyn Iterator<Item = PathBuf> + '_>;
}

pub fn java_exe() -> &'static str {
    if cfg!(windows) {
        "java.exe"
    } else {
        "java"
    }
}

/// `$<var>/bin/java`, read when the locator runs.
pub struct JavaHomeSource {
    var: String,
}

impl JavaHomeSource {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl CandidateSource for JavaHomeSource {
    fn name(&self) -> &str {
        &self.var
    }

    fn candidates(&self) -> Box<dyn Iterator<Item = PathBuf> + '_> {
        let home = std::env::var_os(&self.var)
            .map(PathBuf::from)
            .filter(|home| !home.as_os_str().is_empty());
        Box::new(
            home.into_iter()
                .map(|home| home.join("bin").join(java_exe())),
        )
    }
}

/// Conventional install roots × templates × update numbers.
pub struct InstallRootScan {
    roots: Vec<PathBuf>,
    templates: Vec<InstallTemplate>,
    newest_update: u32,
}

impl InstallRootScan {
    pub fn new(roots: Vec<PathBuf>, templates: Vec<InstallTemplate>, newest_update: u32) -> Self {
        Self {
            roots,
            templates,
            newest_update,
        }
    }

    /// Every drive letter on Windows, `/` elsewhere.
    pub fn default_roots() -> Vec<PathBuf> {
        if cfg!(windows) {
            ('A'..='Z')
                .map(|letter| PathBuf::from(format!("{}:\\", letter)))
                .collect()
        } else {
            vec![PathBuf::from("/")]
        }
    }

    /// Candidates for one template below one root. The whole template is
    /// skipped when its parent directory does not exist.
    fn template_candidates(&self, root: &PathBuf, template: &InstallTemplate) -> Vec<PathBuf> {
        let mut parts: Vec<&str> = template
            .path
            .split(['/', '\\'])
            .filter(|part| !part.is_empty())
            .collect();
        let Some(leaf) = parts.pop() else {
            return Vec::new();
        };
        let parent = parts.iter().fold(root.clone(), |acc, part| acc.join(part));
        if !parent.is_dir() {
            return Vec::new();
        }

        let executable = |dir: PathBuf| dir.join("bin").join(java_exe());
        if template.versioned {
            (0..=self.newest_update)
                .rev()
                .map(|update| executable(parent.join(format!("{}{}", leaf, update))))
                .collect()
        } else {
            vec![executable(parent.join(leaf))]
        }
    }
}

impl CandidateSource for InstallRootScan {
    fn name(&self) -> &str {
        "install roots"
    }

    fn candidates(&self) -> Box<dyn Iterator<Item = PathBuf> + '_> {
        Box::new(
            self.roots
                .iter()
                .filter(|root| root.is_dir())
                .flat_map(move |root| {
                    self.templates
                        .iter()
                        .flat_map(move |template| self.template_candidates(root, template))
                }),
        )
    }
}

pub struct RuntimeLocator {
    sources: Vec<Box<dyn CandidateSource>>,
    probe: Box<dyn VersionProbe>,
}

impl RuntimeLocator {
    pub fn new(probe: Box<dyn VersionProbe>) -> Self {
        Self {
            sources: Vec::new(),
            probe,
        }
    }

    pub fn with_source(mut self, source: Box<dyn CandidateSource>) -> Self {
        self.sources.push(source);
        self
    }

    /// Environment home first, then the install-root scan.
    pub fn from_settings(settings: &JavaSearchSettings) -> Self {
        let probe = MarkerProbe::new(settings.version_markers.clone());
        let mut locator =
            Self::new(Box::new(probe)).with_source(Box::new(JavaHomeSource::new(&settings.home_env)));
        if settings.scan_install_roots {
            locator = locator.with_source(Box::new(InstallRootScan::new(
                InstallRootScan::default_roots(),
                settings.install_templates.clone(),
                settings.newest_update,
            )));
        }
        locator
    }

    /// First existing candidate accepted by the probe, or `None`.
    pub fn find(&self) -> Option<PathBuf> {
        for source in &self.sources {
            debug!("Searching for Java 8 via {}", source.name());
            for candidate in source.candidates() {
                if candidate.is_file() && self.probe.matches(&candidate) {
                    info!("Found Java 8 at: {:?}", candidate);
                    return Some(candidate);
                }
            }
        }

        warn!("Java 8 not found! Install JDK or JRE 8 (https://adoptium.net) or set JAVA_HOME");
        None
    }
}

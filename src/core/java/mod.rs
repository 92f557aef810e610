pub mod locator;
pub mod probe;

pub use locator::{java_exe, CandidateSource, InstallRootScan, JavaHomeSource, RuntimeLocator};
pub use probe::{MarkerProbe, VersionProbe};

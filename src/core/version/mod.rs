pub mod manifest;

pub use manifest::{ArtifactEntry, ClientDownloads, LibraryDescriptor, LibraryDownloads, Manifest};

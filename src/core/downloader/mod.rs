pub mod client;
pub mod integrity;

pub use client::{Downloader, FetchOutcome};
pub use integrity::{file_sha1, verify};
